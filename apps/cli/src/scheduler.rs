//! Polling loops for `watch` and `overlay`.
//!
//! Each loop ticks on a fixed interval and stops on Ctrl-C. Every poll goes
//! through a [`ViewController`], so a result is only shown while its request
//! is still the latest one. A failed poll is logged and retried on the next
//! tick, except for auth failures, which end the loop because every further
//! poll would fail the same way.

use std::future::Future;
use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use bankrollgod_core::errors::{Result, ValidationError};
use bankrollgod_core::overlay::{OverlayKind, OverlayQuery, OverlaySnapshot, BANKROLL_PARAM};
use bankrollgod_core::sessions::ActiveSessionMap;
use bankrollgod_core::view::{ErrorKind, ViewController, ViewState};

use crate::main_lib::AppState;
use crate::output;

/// Runs one poll through `view`.
///
/// Returns the loaded data, or `None` when the poll failed in a way the next
/// tick may fix. An auth failure is returned as an error.
async fn refresh<T, F, Fut>(name: &str, view: &ViewController<T>, load: F) -> anyhow::Result<Option<T>>
where
    T: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match view.load(load).await {
        ViewState::Loaded(data) => Ok(Some(data)),
        ViewState::Failed(error) if error.kind == ErrorKind::Unauthorized => {
            Err(anyhow!(error.message))
        }
        ViewState::Failed(error) if error.is_retryable() => {
            warn!("{} poll failed, retrying on the next tick: {}", name, error.message);
            Ok(None)
        }
        ViewState::Failed(error) => {
            warn!("{} poll rejected: {}", name, error.message);
            Ok(None)
        }
        ViewState::Idle | ViewState::Loading => Ok(None),
    }
}

/// Loads through `view` every `period` and renders each fresh result, until
/// Ctrl-C or an auth failure.
async fn run_until_interrupted<T, F, Fut, R>(
    name: &str,
    period: Duration,
    view: &ViewController<T>,
    mut load: F,
    render: R,
) -> anyhow::Result<()>
where
    T: Clone,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    R: Fn(&T),
{
    info!("{} polling every {}s, Ctrl-C to stop", name, period.as_secs());
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("{} stopped", name);
                return Ok(());
            }
            _ = ticker.tick() => {
                if let Some(data) = refresh(name, view, &mut load).await? {
                    render(&data);
                }
            }
        }
    }
}

fn render_projection(projection: &ActiveSessionMap) {
    let now = Utc::now();
    println!("-- {} --", now.format("%H:%M:%S"));
    if projection.is_empty() {
        println!("No active sessions");
    }
    for (bankroll_name, session) in projection {
        println!("{}: {}", bankroll_name, output::session_line(session, now));
    }
}

/// Prints the active session of every bankroll on each tick.
pub async fn watch_sessions(state: &AppState) -> anyhow::Result<()> {
    let view = ViewController::new();
    run_until_interrupted(
        "Session watch",
        state.config.session_poll,
        &view,
        move || async move {
            let bankrolls = state.bankroll_service.list_bankrolls().await?;
            state.session_service.load_active_sessions(&bankrolls).await
        },
        render_projection,
    )
    .await
}

/// Resolves the overlay source: a URL with `?bankroll=` or a bare id.
pub fn overlay_query(source: &str, kind: Option<OverlayKind>) -> Result<OverlayQuery> {
    let mut query = if source.contains("://") {
        OverlayQuery::from_url(source)?
    } else if source.trim().is_empty() {
        return Err(ValidationError::MissingField(BANKROLL_PARAM.to_string()).into());
    } else {
        OverlayQuery {
            bankroll_id: source.trim().to_string(),
            kind: None,
        }
    };
    if kind.is_some() {
        query.kind = kind;
    }
    Ok(query)
}

fn overlay_kinds(query: &OverlayQuery) -> Vec<OverlayKind> {
    query
        .kind
        .map(|kind| vec![kind])
        .unwrap_or_else(|| OverlayKind::ALL.to_vec())
}

fn render_overlay(query: &OverlayQuery, snapshot: &OverlaySnapshot) {
    for kind in overlay_kinds(query) {
        println!("{}", kind.render(snapshot));
    }
}

/// Renders overlay lines for one bankroll, once or on every tick.
pub async fn run_overlay(
    state: &AppState,
    source: &str,
    kind: Option<OverlayKind>,
    once: bool,
) -> anyhow::Result<()> {
    let query = overlay_query(source, kind)?;
    if once {
        let snapshot = state.overlay_service.snapshot(&query.bankroll_id).await?;
        render_overlay(&query, &snapshot);
        return Ok(());
    }
    let query = &query;
    let view = ViewController::new();
    run_until_interrupted(
        "Overlay",
        state.config.overlay_poll,
        &view,
        move || state.overlay_service.snapshot(&query.bankroll_id),
        |snapshot| render_overlay(query, snapshot),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_source_accepts_url_or_id() {
        let query = overlay_query("http://localhost:3000/obs/cashes?bankroll=7", None).unwrap();
        assert_eq!(query.bankroll_id, "7");
        assert_eq!(overlay_kinds(&query), vec![OverlayKind::Cashes]);

        let query = overlay_query(" 12 ", None).unwrap();
        assert_eq!(query.bankroll_id, "12");
        assert_eq!(overlay_kinds(&query).len(), OverlayKind::ALL.len());
    }

    #[test]
    fn explicit_kind_wins_over_url_path() {
        let query = overlay_query(
            "http://localhost:3000/obs/cashes?bankroll=7",
            Some(OverlayKind::Bankroll),
        )
        .unwrap();
        assert_eq!(overlay_kinds(&query), vec![OverlayKind::Bankroll]);
    }

    #[tokio::test]
    async fn refresh_returns_data_and_records_it_in_the_view() {
        let view = ViewController::new();
        let data = refresh("Test", &view, || async { Ok(3u32) }).await.unwrap();
        assert_eq!(data, Some(3));
        assert_eq!(view.state(), ViewState::Loaded(3));
    }

    #[tokio::test]
    async fn refresh_swallows_transient_failures() {
        let view: ViewController<u32> = ViewController::new();
        let data = refresh("Test", &view, || async {
            Err(bankrollgod_core::Error::unreachable("timed out"))
        })
        .await
        .unwrap();
        assert_eq!(data, None);
        assert_eq!(view.state().error().unwrap().kind, ErrorKind::Unreachable);
    }

    #[tokio::test]
    async fn refresh_stops_on_auth_failure() {
        let view: ViewController<u32> = ViewController::new();
        let result = refresh("Test", &view, || async {
            Err(bankrollgod_core::Error::Unauthorized("Token expired".to_string()))
        })
        .await;
        assert_eq!(result.unwrap_err().to_string(), "Token expired");
    }

    #[test]
    fn overlay_url_without_bankroll_is_rejected() {
        assert!(overlay_query("http://localhost:3000/obs/cashes", None).is_err());
        assert!(overlay_query("  ", None).is_err());
    }
}
