//! Admin session: the persisted record and the reactive state mirroring it.

mod state;
mod store;

pub use state::{AuthState, SessionState};
pub use store::{SESSION_KEY, SessionStore};
