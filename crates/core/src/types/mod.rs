//! Core domain types for Brandgate.
//!
//! Type-safe wrappers for ids, admin emails, redirect links, the landing page
//! configuration and branding preview settings.

pub mod branding;
pub mod email;
pub mod id;
pub mod link;
pub mod site_config;

pub use branding::{
    AiFeedback, DEFAULT_LOGO, LogoSettings, LogoUploadError, MAX_LOGO_BYTES, PreviewContext,
    PreviewVariant, is_image_data_url, logo_data_url, render_previews,
};
pub use email::{Email, EmailError};
pub use id::*;
pub use link::{LinkItem, LinkUrl, LinkUrlError};
pub use site_config::{DEFAULT_CAPTION, DEFAULT_IMAGE_URL, SiteConfig, SiteConfigError};
