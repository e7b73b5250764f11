//! View state: load state machines and optimistic values.

mod optimistic;
mod view_state;

pub use optimistic::OptimisticValue;
pub use view_state::{ErrorKind, RequestTicket, ViewController, ViewError, ViewState};
