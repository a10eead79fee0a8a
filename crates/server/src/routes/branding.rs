//! Logo branding preview (server-rendered).
//!
//! The page carries its own state: the current logo travels as a hidden
//! `data:` URL field, the filter settings as range inputs and the
//! confirmation step as a hidden flag. Each submit names an action.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use brandgate_core::{
    AiFeedback, DEFAULT_LOGO, LogoSettings, LogoUploadError, PreviewVariant, is_image_data_url,
    logo_data_url, render_previews,
};

use crate::error::AppError;
use crate::filters;
use crate::state::AppState;

/// Request body limit: one upload plus the hidden copy of the current logo.
const BODY_LIMIT_BYTES: usize = 6 * 1024 * 1024;

/// Branding page template.
#[derive(Template, WebTemplate)]
#[template(path = "branding.html")]
pub struct BrandingTemplate {
    pub logo: String,
    pub confirmed: bool,
    pub sliders: Vec<Slider>,
    pub previews: Vec<PreviewVariant>,
    pub feedback: Option<AiFeedback>,
    pub analysis_enabled: bool,
    pub error: Option<String>,
}

/// One range input of the controls panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub name: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub value: f64,
}

fn sliders(settings: &LogoSettings) -> Vec<Slider> {
    let slider = |name, label, unit, range: std::ops::RangeInclusive<f64>, value| Slider {
        name,
        label,
        unit,
        min: *range.start(),
        max: *range.end(),
        value,
    };

    vec![
        slider("brightness", "Brilho", "%", LogoSettings::BRIGHTNESS_RANGE, settings.brightness),
        slider("contrast", "Contraste", "%", LogoSettings::CONTRAST_RANGE, settings.contrast),
        slider("grayscale", "Escala de cinza", "%", LogoSettings::GRAYSCALE_RANGE, settings.grayscale),
        slider("scale", "Tamanho", "%", LogoSettings::SCALE_RANGE, settings.scale),
        slider("hue_rotate", "Matiz", "°", LogoSettings::HUE_ROTATE_RANGE, settings.hue_rotate),
    ]
}

/// What a submit asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrandingAction {
    /// Re-render with the submitted settings.
    #[default]
    Preview,
    /// Leave the identity confirmation screen for the editor.
    Confirm,
    /// Back to the confirmation screen.
    Back,
    /// Ask the model for design feedback.
    Analyze,
    /// Restore the default logo.
    Reset,
}

impl BrandingAction {
    fn parse(s: &str) -> Self {
        match s {
            "confirm" => Self::Confirm,
            "back" => Self::Back,
            "analyze" => Self::Analyze,
            "reset" => Self::Reset,
            _ => Self::Preview,
        }
    }
}

/// Decoded branding form.
#[derive(Debug, Default)]
struct BrandingForm {
    upload: Option<(String, Vec<u8>)>,
    logo_data: Option<String>,
    confirmed: bool,
    settings: LogoSettings,
    action: BrandingAction,
}

/// Query string accepted by `GET /branding`.
#[derive(Debug, Default, Deserialize)]
pub struct BrandingQuery {
    pub brightness: Option<f64>,
    pub contrast: Option<f64>,
    pub grayscale: Option<f64>,
    pub scale: Option<f64>,
    pub hue_rotate: Option<f64>,
    #[serde(default)]
    pub confirmed: bool,
}

impl BrandingQuery {
    fn settings(&self) -> LogoSettings {
        let d = LogoSettings::default();
        LogoSettings {
            brightness: self.brightness.unwrap_or(d.brightness),
            contrast: self.contrast.unwrap_or(d.contrast),
            grayscale: self.grayscale.unwrap_or(d.grayscale),
            scale: self.scale.unwrap_or(d.scale),
            hue_rotate: self.hue_rotate.unwrap_or(d.hue_rotate),
        }
        .clamped()
    }
}

/// Build the branding router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/branding", get(page).post(submit))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

fn render(
    state: &AppState,
    logo: String,
    confirmed: bool,
    settings: &LogoSettings,
    feedback: Option<AiFeedback>,
    error: Option<String>,
) -> BrandingTemplate {
    BrandingTemplate {
        previews: render_previews(&logo, settings),
        sliders: sliders(settings),
        logo,
        confirmed,
        feedback,
        analysis_enabled: state.claude().is_some(),
        error,
    }
}

/// GET /branding
async fn page(State(state): State<AppState>, Query(query): Query<BrandingQuery>) -> BrandingTemplate {
    render(
        &state,
        DEFAULT_LOGO.to_owned(),
        query.confirmed,
        &query.settings(),
        None,
        None,
    )
}

/// POST /branding
async fn submit(State(state): State<AppState>, multipart: Multipart) -> Result<Response, AppError> {
    let form = read_form(multipart).await?;
    let settings = form.settings.clamped();
    let mut confirmed = form.confirmed;
    let mut feedback = None;
    let mut error = None;

    let mut logo = form
        .logo_data
        .filter(|data| is_image_data_url(data))
        .unwrap_or_else(|| DEFAULT_LOGO.to_owned());

    // A new upload replaces the logo and goes back to the confirmation step.
    if let Some((content_type, bytes)) = form.upload {
        match upload_to_data_url(&content_type, &bytes) {
            Ok(data_url) => {
                logo = data_url;
                confirmed = false;
            }
            Err(message) => error = Some(message),
        }
    }

    match form.action {
        BrandingAction::Preview => {}
        BrandingAction::Confirm => confirmed = true,
        BrandingAction::Back => confirmed = false,
        BrandingAction::Reset => {
            logo = DEFAULT_LOGO.to_owned();
            confirmed = false;
        }
        BrandingAction::Analyze => match state.claude() {
            Some(claude) => match claude.analyze_logo(&logo).await {
                Ok(result) => feedback = Some(result),
                Err(e) => tracing::warn!(error = %e, "Logo analysis failed"),
            },
            None => error = Some("Análise com IA indisponível neste servidor.".to_owned()),
        },
    }

    Ok(render(&state, logo, confirmed, &settings, feedback, error).into_response())
}

async fn read_form(mut multipart: Multipart) -> Result<BrandingForm, AppError> {
    let mut form = BrandingForm::default();
    let bad_request = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("invalid form data: {e}"))
    };

    while let Some(field) = multipart.next_field().await.map_err(bad_request)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "logo" => {
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(bad_request)?;
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.upload = Some((content_type, bytes.to_vec()));
                }
            }
            "logo_data" => form.logo_data = Some(field.text().await.map_err(bad_request)?),
            "confirmed" => form.confirmed = field.text().await.map_err(bad_request)? == "true",
            "action" => form.action = BrandingAction::parse(&field.text().await.map_err(bad_request)?),
            "brightness" | "contrast" | "grayscale" | "scale" | "hue_rotate" => {
                let text = field.text().await.map_err(bad_request)?;
                let Ok(value) = text.trim().parse::<f64>() else {
                    continue;
                };
                let s = &mut form.settings;
                match name.as_str() {
                    "brightness" => s.brightness = value,
                    "contrast" => s.contrast = value,
                    "grayscale" => s.grayscale = value,
                    "scale" => s.scale = value,
                    _ => s.hue_rotate = value,
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Turn an uploaded file into a `data:` URL.
///
/// Returns the user-facing message when the file is not an acceptable image.
fn upload_to_data_url(content_type: &str, bytes: &[u8]) -> Result<String, String> {
    logo_data_url(content_type, bytes).map_err(|e| match e {
        LogoUploadError::NotAnImage(_) => "Envie um arquivo de imagem (PNG, JPG, SVG...).".to_owned(),
        LogoUploadError::TooLarge { max } => {
            format!("A imagem excede o limite de {} MB.", max / (1024 * 1024))
        }
    })
}
