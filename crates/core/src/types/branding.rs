//! Logo branding preview: filter settings, preview contexts and AI feedback.
//!
//! Everything here is client-local presentation state. Nothing in this module
//! is ever persisted by the storage backend.

use core::fmt;
use std::ops::RangeInclusive;

use base64::Engine;
use serde::{Deserialize, Serialize};

/// Logo shown before anything has been uploaded.
pub const DEFAULT_LOGO: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAEAAAABACAYAAACqaXHeAAAA3ElEQVR42u3b2xGDMAxEUfXfAdVCCwzosfJezeQ77AkkjixHUFRb3Vfcb152gY8CyQq9DqM6uCxEd3ApiOnwYwgqwUcgVMO3IKiHL0XYEr4EYVv4VISt4dMQrAG2h/+FcEr4zwjWAJMXJoGg8MmMAajdmu0Iis+mPUBbe03927n8PTf8PgPgDpBxnVIrv6ll+mqAkrsAAAAAAAAAAADwXQjZL4X5MwQADRFaYjRFaYuzMcLWGJujADAgwYgMAIzJMSjJqCzD0ozLc2CCIzMcmhKEiE1lGToDJCiqrR77U3/gs0ipMwAAAABJRU5ErkJggg==";

/// CSS-style visual filters applied to the logo in every preview.
///
/// Values are percentages, except `hue_rotate` which is in degrees. Every
/// field is kept inside its slider range (see the `*_RANGE` constants).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoSettings {
    /// Brightness in percent (100 = unchanged).
    pub brightness: f64,
    /// Contrast in percent (100 = unchanged).
    pub contrast: f64,
    /// Grayscale in percent (0 = full color).
    pub grayscale: f64,
    /// Scale in percent (100 = natural size).
    pub scale: f64,
    /// Hue rotation in degrees.
    pub hue_rotate: f64,
}

impl Default for LogoSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            grayscale: 0.0,
            scale: 100.0,
            hue_rotate: 0.0,
        }
    }
}

impl LogoSettings {
    pub const BRIGHTNESS_RANGE: RangeInclusive<f64> = 0.0..=200.0;
    pub const CONTRAST_RANGE: RangeInclusive<f64> = 0.0..=200.0;
    pub const GRAYSCALE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
    pub const SCALE_RANGE: RangeInclusive<f64> = 10.0..=200.0;
    pub const HUE_ROTATE_RANGE: RangeInclusive<f64> = 0.0..=360.0;

    /// Clamp every field into its slider range.
    ///
    /// Non-finite values fall back to the field's default.
    #[must_use]
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            brightness: clamp_to(self.brightness, &Self::BRIGHTNESS_RANGE, defaults.brightness),
            contrast: clamp_to(self.contrast, &Self::CONTRAST_RANGE, defaults.contrast),
            grayscale: clamp_to(self.grayscale, &Self::GRAYSCALE_RANGE, defaults.grayscale),
            scale: clamp_to(self.scale, &Self::SCALE_RANGE, defaults.scale),
            hue_rotate: clamp_to(self.hue_rotate, &Self::HUE_ROTATE_RANGE, defaults.hue_rotate),
        }
    }

    /// The CSS `filter` value for these settings.
    ///
    /// ```
    /// use brandgate_core::LogoSettings;
    ///
    /// assert_eq!(
    ///     LogoSettings::default().filter_css(),
    ///     "brightness(100%) contrast(100%) grayscale(0%) hue-rotate(0deg)"
    /// );
    /// ```
    #[must_use]
    pub fn filter_css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) grayscale({}%) hue-rotate({}deg)",
            self.brightness, self.contrast, self.grayscale, self.hue_rotate
        )
    }

    /// The CSS `transform` value for these settings.
    #[must_use]
    pub fn transform_css(&self) -> String {
        format!("scale({})", self.scale / 100.0)
    }

    /// Inline `style` attribute combining filter and transform.
    #[must_use]
    pub fn style_attr(&self) -> String {
        format!(
            "filter: {}; transform: {};",
            self.filter_css(),
            self.transform_css()
        )
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

/// Mock context a logo preview is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewContext {
    /// Site navigation bar.
    Navbar,
    /// Landing page hero banner.
    Hero,
    /// Mobile app icon.
    Icon,
    /// Dark dashboard sidebar.
    Sidebar,
}

impl PreviewContext {
    /// All contexts in display order.
    pub const ALL: [Self; 4] = [Self::Navbar, Self::Hero, Self::Icon, Self::Sidebar];

    /// Section label shown above the preview.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Navbar => "Site / Navbar",
            Self::Hero => "Landing Page Hero",
            Self::Icon => "App Icon",
            Self::Sidebar => "Dashboard Sidebar",
        }
    }

    /// Stable identifier, used for CSS classes and anchors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Navbar => "navbar",
            Self::Hero => "hero",
            Self::Icon => "icon",
            Self::Sidebar => "sidebar",
        }
    }

    /// Whether the logo is drawn inverted (white on a dark background).
    #[must_use]
    pub const fn inverted(self) -> bool {
        matches!(self, Self::Sidebar)
    }
}

impl fmt::Display for PreviewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered preview: where the logo goes and how it is styled.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewVariant {
    pub context: PreviewContext,
    /// Image source (`data:` URL or absolute URL).
    pub image: String,
    /// Inline style for the `<img>` element.
    pub style: String,
}

/// Produce the four preview variants for an image, in display order.
#[must_use]
pub fn render_previews(image: &str, settings: &LogoSettings) -> Vec<PreviewVariant> {
    let style = settings.clamped().style_attr();
    PreviewContext::ALL
        .iter()
        .map(|&context| PreviewVariant {
            context,
            image: image.to_owned(),
            style: style.clone(),
        })
        .collect()
}

/// AI-generated design feedback for a logo.
///
/// Replaced wholesale on every analysis; `suggestions` are kept in display
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiFeedback {
    /// Overall score as returned by the model.
    pub score: f64,
    /// Improvement suggestions, in display order.
    pub suggestions: Vec<String>,
}

/// Largest accepted logo upload.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// Errors that can occur when accepting an uploaded logo.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LogoUploadError {
    /// The content type is not `image/*`.
    #[error("not an image: {0:?}")]
    NotAnImage(String),
    /// The file is larger than [`MAX_LOGO_BYTES`].
    #[error("image must be at most {max} bytes")]
    TooLarge {
        /// Maximum allowed size.
        max: usize,
    },
}

/// Encode an uploaded image as a `data:<mime>;base64,...` URL.
///
/// # Errors
///
/// Returns an error if `content_type` is not `image/*` or the file exceeds
/// [`MAX_LOGO_BYTES`].
pub fn logo_data_url(content_type: &str, bytes: &[u8]) -> Result<String, LogoUploadError> {
    let mime = content_type.split(';').next().unwrap_or_default().trim();
    let subtype = mime.strip_prefix("image/").unwrap_or_default();
    if subtype.is_empty() {
        return Err(LogoUploadError::NotAnImage(mime.to_owned()));
    }
    if bytes.len() > MAX_LOGO_BYTES {
        return Err(LogoUploadError::TooLarge {
            max: MAX_LOGO_BYTES,
        });
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{encoded}"))
}

/// Whether `value` looks like an inline base64 image.
#[must_use]
pub fn is_image_data_url(value: &str) -> bool {
    value.starts_with("data:image/") && value.contains(";base64,")
}
