//! Brandgate Core - Shared domain library.
//!
//! This crate provides the types and pure state machines used across all
//! Brandgate components:
//! - `server` - Storage/auth backend and HTML console
//! - `client` - Typed client, admin console store and public consumer flow
//! - `cli` - Command-line tools for migrations and queue management
//!
//! # Architecture
//!
//! The core crate contains only types and logic - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Ids, emails, links, site config and branding settings
//! - [`api`] - JSON bodies of the storage HTTP API
//! - [`queue`] - FIFO link queue
//! - [`auth_gate`] - Authentication state machine and route guard
//! - [`sequence`] - Generation tags for overlapping async requests

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth_gate;
pub mod queue;
pub mod sequence;
pub mod types;

pub use auth_gate::{ADMIN_FRAGMENT, AuthGate, AuthState, CurrentAdmin, Route, View};
pub use queue::LinkQueue;
pub use sequence::{RequestSequencer, Ticket};
pub use types::*;
