//! Brandgate server library.
//!
//! Serves the storage/auth JSON API consumed by `brandgate-client`, the
//! server-rendered public landing page, the admin console and the logo
//! branding preview. Exposed as a library so the router can be exercised
//! in tests without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod claude;
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
