//! Overlay module - read-only snapshots for broadcast widgets.

mod overlay_model;
mod overlay_service;

#[cfg(test)]
mod overlay_service_tests;

pub use overlay_model::{OverlayKind, OverlayQuery, OverlaySnapshot, BANKROLL_PARAM};
pub use overlay_service::OverlayService;
