//! Request client for the platform REST API
//!
//! One `ApiClient` per process. Authorization is an explicit per-call
//! parameter; the client never holds hidden default headers.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
