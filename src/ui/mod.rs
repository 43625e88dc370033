//! Browser UI: one page plus a small JSON API over per-session state.

pub mod page;
pub mod server;
pub mod session;

pub use server::{configure, run, AppState};
pub use session::{MaskSpec, Session, SessionError, SessionState, SessionStore, SessionView};
