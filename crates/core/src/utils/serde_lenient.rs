//! Lenient decoding for loosely typed backend fields.
//!
//! The backend hands out ids as JSON strings on some endpoints and as
//! integers on others, and aggregate counts come back as strings when they
//! are computed in SQL. Everything in the client works with `String` ids and
//! plain integer counts.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Str(String),
    Int(i64),
    UInt(u64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Str(s) => s,
            RawId::Int(i) => i.to_string(),
            RawId::UInt(u) => u.to_string(),
        }
    }
}

/// Deserialize an id that may be a string or an integer.
pub fn string_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer).map(String::from)
}

/// Deserialize an optional id that may be a string, an integer or null.
pub fn opt_string_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(u64),
    Float(f64),
    Str(String),
}

/// Deserialize a non-negative count given as a number, a numeric string or null.
///
/// Null and unparsable strings decode as zero.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawCount>::deserialize(deserializer)?;
    let value = match raw {
        None => 0,
        Some(RawCount::Int(i)) => i,
        Some(RawCount::Float(f)) if f.is_finite() && f >= 0.0 => f as u64,
        Some(RawCount::Float(_)) => 0,
        Some(RawCount::Str(s)) => s.trim().parse::<u64>().unwrap_or(0),
    };
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Deserialize a money amount where the backend may send null for "none yet".
///
/// Null decodes as zero. Numbers and numeric strings decode exactly.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Option::unwrap_or_default)
}
