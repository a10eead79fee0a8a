//! Business logic services.
//!
//! - `auth` - Password authentication for admins

pub mod auth;

pub use auth::{AuthError, AuthService};
