//! Request identity and session cookies.
//!
//! Sign-in lives in an external service that sets the user cookie; this crate
//! only reads it to decide whether scores may be saved.

pub mod middleware;

pub use middleware::{ensure_session, Identity, SESSION_COOKIE_NAME, USER_COOKIE_NAME};
