//! Session-related types for admin authentication.

/// Session-stored admin identity (shared with clients).
pub use brandgate_core::CurrentAdmin;

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
