//! Network layer - the actor that owns the session and talks to the backend

pub mod actor;

pub use actor::NetworkActor;
