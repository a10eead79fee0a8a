//! Brandgate Client - Typed access to the Brandgate API.
//!
//! # Modules
//!
//! - [`backend`] - The storage/auth contract as an async trait
//! - [`http`] - `reqwest` implementation of that contract
//! - [`console`] - Admin console store (auth gate, config and queue cache)
//! - [`consumer`] - Public consumer flow (paced consume and redirect)
//! - [`branding`] - Branding session (logo, filter settings, AI feedback)
//!
//! The stores own their state behind a `std::sync::Mutex` that is never held
//! across an `.await`. Every backend call takes a ticket from a
//! [`RequestSequencer`](brandgate_core::RequestSequencer); a response whose
//! ticket has been superseded is dropped instead of overwriting newer state.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod branding;
pub mod console;
pub mod consumer;
pub mod error;
pub mod http;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod fake;

pub use backend::Backend;
pub use branding::BrandingSession;
pub use console::{AdminConsole, ConsoleSnapshot};
pub use consumer::{ConsumeOutcome, PublicConsumer};
pub use error::ClientError;
pub use http::HttpBackend;
