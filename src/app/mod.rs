//! App layer - pure state, command handlers, and the actor loop

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::AppState;
