//! Request-level access control: which paths are public, who may call the
//! rest, and which browser origins may call at all.

pub mod cors;
pub mod filter;
pub mod policy;
pub mod secret;
pub mod session;

pub use cors::cors_policy;
pub use filter::SecurityFilter;
pub use policy::AccessPolicy;
pub use secret::secrets_match;
pub use session::{SessionStore, SESSION_COOKIE};
