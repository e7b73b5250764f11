//! Client events module.
//!
//! Services emit client events after successful operations. Front ends
//! implement the sink to refresh the views that care about each event.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
