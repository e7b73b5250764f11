//! Response envelope normalization.
//!
//! The backend wraps payloads inconsistently: `{success, data}`, bare arrays,
//! `{success, data: {sessions: [...]}}`, `{success, data: {session: {...}}}`,
//! `{success, data: {game, bankroll}}`, and auth payloads with the token at
//! the top level or nested under `data`. Every endpoint goes through this one
//! type instead of guessing the shape at each call site.

use log::error;
use serde::de::DeserializeOwned;
use serde_json::Value;

use bankrollgod_core::auth::User;
use bankrollgod_core::errors::{Error, Result};

/// A decoded 2xx response body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiEnvelope {
    body: Value,
}

impl ApiEnvelope {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// An empty body (204, or a 2xx with nothing in it).
    pub fn empty() -> Self {
        Self { body: Value::Null }
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// The `success` flag. Bodies without one count as successful.
    pub fn success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }

    pub fn message(&self) -> Option<&str> {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| self.body.get("error").and_then(Value::as_str))
    }

    /// Turns a 2xx body that says `success: false` into a rejection.
    pub fn into_result(self, status: u16) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        Err(Error::Rejected {
            status: Some(status),
            code: self
                .body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
            message: self.message().unwrap_or("Request failed").to_string(),
            details: Some(self.body.clone()),
        })
    }

    /// The payload: `data` when present, otherwise the body itself.
    pub fn data(&self) -> &Value {
        match self.body.get("data") {
            Some(data) => data,
            None => &self.body,
        }
    }

    /// A list found as the payload itself or under `key` inside it.
    /// A missing or null payload is an empty list.
    pub fn list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let data = self.data();
        let items = match data {
            Value::Array(_) => data,
            Value::Null => return Ok(Vec::new()),
            Value::Object(map) => match map.get(key) {
                Some(Value::Null) | None => return Ok(Vec::new()),
                Some(items) => items,
            },
            _ => return Err(unexpected_shape(key, &self.body)),
        };
        decode(items, key)
    }

    /// An object found under `key` inside the payload, or the payload itself.
    pub fn entity<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.optional_entity(key)?
            .ok_or_else(|| unexpected_shape(key, &self.body))
    }

    /// Like [`entity`](Self::entity), but a null payload is `None`.
    pub fn optional_entity<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let data = self.data();
        let value = match data.get(key) {
            Some(Value::Object(_)) => data.get(key),
            Some(Value::Null) => return Ok(None),
            _ if data.is_object() => Some(data),
            _ => None,
        };
        value.map(|v| decode(v, key)).transpose()
    }

    /// A named field, looked up in the payload first and then at the top level.
    pub fn field<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        [self.data().get(key), self.body.get(key)]
            .into_iter()
            .flatten()
            .find(|v| !v.is_null())
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Bearer token of an auth response, at the top level or under `data`
    /// as `token` or `access_token`.
    pub fn token(&self) -> Option<String> {
        let data = self.data();
        [
            self.body.get("token"),
            data.get("token"),
            data.get("access_token"),
        ]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|t| !t.is_empty())
        .map(str::to_string)
    }

    /// The user of an auth or profile response.
    pub fn user(&self) -> Result<Option<User>> {
        let data = self.data();
        let value = self
            .body
            .get("user")
            .or_else(|| data.get("user"))
            .or_else(|| data.get("email").map(|_| data));
        match value {
            Some(Value::Null) | None => Ok(None),
            Some(v) => decode(v, "user").map(Some),
        }
    }

    /// Decodes the whole body, for endpoints that answer at the top level.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        decode(&self.body, "body")
    }
}

fn decode<T: DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| {
        error!("Failed to decode '{}' from response: {} ({})", what, e, value);
        Error::from(e)
    })
}

fn unexpected_shape(key: &str, body: &Value) -> Error {
    error!("No '{}' in response: {}", key, body);
    Error::Unexpected(format!("Response did not contain '{}'", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankrollgod_core::bankrolls::Bankroll;
    use bankrollgod_core::games::Game;
    use bankrollgod_core::sessions::Session;
    use serde_json::json;

    #[test]
    fn test_list_shapes() {
        let wrapped = ApiEnvelope::new(json!({"success": true, "data": [{"id": 1, "name": "A"}]}));
        let bare = ApiEnvelope::new(json!([{"id": "1", "name": "A"}]));
        let nested = ApiEnvelope::new(json!({
            "success": true,
            "data": {"sessions": [{"id": 5, "bankroll_id": 1, "status": "running"}]}
        }));

        let a: Vec<Bankroll> = wrapped.list("bankrolls").unwrap();
        let b: Vec<Bankroll> = bare.list("bankrolls").unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].id, "1");

        let sessions: Vec<Session> = nested.list("sessions").unwrap();
        assert_eq!(sessions[0].id, "5");
        assert_eq!(sessions[0].bankroll_id.as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_list_is_empty() {
        let env = ApiEnvelope::new(json!({"success": true, "data": null}));
        assert!(env.list::<Session>("sessions").unwrap().is_empty());
        let env = ApiEnvelope::new(json!({"success": true, "data": {"sessions": null}}));
        assert!(env.list::<Session>("sessions").unwrap().is_empty());
    }

    #[test]
    fn test_entity_nested_or_flat() {
        let nested = ApiEnvelope::new(json!({
            "success": true,
            "data": {"session": {"id": 9, "bankroll_id": 2, "status": "paused"}}
        }));
        let flat = ApiEnvelope::new(json!({
            "success": true,
            "data": {"id": 9, "bankroll_id": 2, "status": "paused"}
        }));
        let a: Session = nested.entity("session").unwrap();
        let b: Session = flat.entity("session").unwrap();
        assert_eq!(a, b);

        let none = ApiEnvelope::new(json!({"success": true, "data": null}));
        assert_eq!(none.optional_entity::<Session>("session").unwrap(), None);
        assert!(none.entity::<Session>("session").is_err());
    }

    #[test]
    fn test_game_with_bankroll_parts() {
        let env = ApiEnvelope::new(json!({
            "success": true,
            "data": {
                "game": {"id": 3, "session_id": 9, "buy_in": "50.00", "entries": 2},
                "bankroll": {"id": 1, "name": "Main", "current_amount": 900}
            }
        }));
        let game: Game = env.entity("game").unwrap();
        let bankroll: Option<Bankroll> = env.field("bankroll");
        assert_eq!(game.entries, 2);
        assert_eq!(bankroll.unwrap().name, "Main");
    }

    #[test]
    fn test_auth_payload_shapes() {
        let top = ApiEnvelope::new(json!({
            "success": true,
            "token": "abc",
            "user": {"id": 1, "email": "a@b.c", "username": "a"}
        }));
        let nested = ApiEnvelope::new(json!({
            "success": true,
            "data": {"access_token": "abc", "user": {"id": "1", "email": "a@b.c"}}
        }));

        assert_eq!(top.token().as_deref(), Some("abc"));
        assert_eq!(nested.token().as_deref(), Some("abc"));
        assert_eq!(top.user().unwrap().unwrap().id, "1");
        assert_eq!(nested.user().unwrap().unwrap().email, "a@b.c");

        let profile = ApiEnvelope::new(json!({"success": true, "data": {"id": 1, "email": "a@b.c"}}));
        assert!(profile.user().unwrap().is_some());
        assert_eq!(ApiEnvelope::empty().token(), None);
    }

    #[test]
    fn test_success_false_becomes_rejection() {
        let env = ApiEnvelope::new(json!({
            "success": false,
            "error": "ACTIVE_SESSION_EXISTS",
            "message": "There is already an active session"
        }));
        assert_eq!(env.message(), Some("There is already an active session"));

        let err = env.into_result(200).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(err.status(), Some(200));

        assert!(ApiEnvelope::new(json!({"data": []})).into_result(200).is_ok());
    }

    #[test]
    fn test_field_prefers_payload() {
        let env = ApiEnvelope::new(json!({
            "success": true,
            "hasActiveSession": true,
            "data": {"count": 3}
        }));
        assert_eq!(env.field::<u32>("count"), Some(3));
        assert_eq!(env.field::<bool>("hasActiveSession"), Some(true));
        assert_eq!(env.field::<bool>("missing"), None);
    }
}
