//! Public-facing display settings shown on the redirect landing page.

use serde::{Deserialize, Serialize};
use url::Url;

/// Image shown when no configuration has been saved yet.
pub const DEFAULT_IMAGE_URL: &str = "https://picsum.photos/400/200";

/// Caption shown when no configuration has been saved yet.
pub const DEFAULT_CAPTION: &str = "Clique abaixo para continuar para o seu destino exclusivo.";

/// Errors that can occur when validating a [`SiteConfig`] before saving.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteConfigError {
    /// The image URL is not an absolute URL.
    #[error("image URL must be an absolute URL: {0}")]
    InvalidImageUrl(String),
    /// The caption exceeds [`SiteConfig::MAX_CAPTION_LENGTH`].
    #[error("caption must be at most {max} characters")]
    CaptionTooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// Singleton landing page configuration.
///
/// Globally readable; saved wholesale by an authenticated admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Image displayed above the caption.
    pub image_url: String,
    /// Text displayed under the image.
    pub caption: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            image_url: DEFAULT_IMAGE_URL.to_owned(),
            caption: DEFAULT_CAPTION.to_owned(),
        }
    }
}

impl SiteConfig {
    /// Maximum caption length in characters.
    pub const MAX_CAPTION_LENGTH: usize = 500;

    /// Trim both fields and check them before persisting.
    ///
    /// Any absolute URL is accepted for the image, including `data:` URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the image URL does not parse as an absolute URL or
    /// the caption is too long.
    pub fn validated(self) -> Result<Self, SiteConfigError> {
        let image_url = self.image_url.trim().to_owned();
        let caption = self.caption.trim().to_owned();

        Url::parse(&image_url).map_err(|e| SiteConfigError::InvalidImageUrl(e.to_string()))?;

        if caption.chars().count() > Self::MAX_CAPTION_LENGTH {
            return Err(SiteConfigError::CaptionTooLong {
                max: Self::MAX_CAPTION_LENGTH,
            });
        }

        Ok(Self { image_url, caption })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.image_url, "https://picsum.photos/400/200");
        assert_eq!(
            config.caption,
            "Clique abaixo para continuar para o seu destino exclusivo."
        );
    }

    #[test]
    fn test_validated_trims() {
        let config = SiteConfig {
            image_url: "  https://cdn.example.com/banner.png ".to_owned(),
            caption: " Hello ".to_owned(),
        }
        .validated()
        .unwrap();
        assert_eq!(config.image_url, "https://cdn.example.com/banner.png");
        assert_eq!(config.caption, "Hello");
    }

    #[test]
    fn test_validated_rejects_relative_image() {
        let result = SiteConfig {
            image_url: "banner.png".to_owned(),
            caption: String::new(),
        }
        .validated();
        assert!(matches!(result, Err(SiteConfigError::InvalidImageUrl(_))));
    }

    #[test]
    fn test_validated_rejects_long_caption() {
        let result = SiteConfig {
            image_url: DEFAULT_IMAGE_URL.to_owned(),
            caption: "x".repeat(SiteConfig::MAX_CAPTION_LENGTH + 1),
        }
        .validated();
        assert!(matches!(
            result,
            Err(SiteConfigError::CaptionTooLong { .. })
        ));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(SiteConfig::default()).unwrap();
        assert_eq!(json["imageUrl"], DEFAULT_IMAGE_URL);
        assert!(json.get("caption").is_some());
    }
}
