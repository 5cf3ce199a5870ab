//! Client-side authentication - token persistence, claim decoding, and the
//! session store that owns the authenticated identity.

pub mod claims;
pub mod session;
pub mod store;

pub use claims::Claims;
pub use session::{Identity, SessionStore};
pub use store::TokenStore;
