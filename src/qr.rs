//! QR codes linking kiosk content to external resources

use qrcode::{render::svg, QrCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Smallest accepted image width, in pixels
pub const MIN_WIDTH: u32 = 32;
/// Largest accepted image width, in pixels
pub const MAX_WIDTH: u32 = 2048;

/// Rendering options for generated QR codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrOptions {
    /// Minimum width and height of the image, in pixels
    pub width: u32,
    /// Quiet zone around the code; any non-zero margin enables it
    pub margin: u32,
    pub dark: String,
    pub light: String,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            width: 200,
            margin: 2,
            dark: "#000000".to_string(),
            light: "#FFFFFF".to_string(),
        }
    }
}

/// Add an `https://` scheme to URLs entered without one.
/// Blank input yields `None`.
pub fn normalize_url(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("https://{}", url))
    }
}

/// Encode `text` as an SVG document
pub fn generate_svg(text: &str, options: &QrOptions) -> Result<String, String> {
    if text.trim().is_empty() {
        return Err("Text cannot be empty".to_string());
    }

    if !(MIN_WIDTH..=MAX_WIDTH).contains(&options.width) {
        return Err(format!(
            "Width must be between {} and {} pixels, got {}",
            MIN_WIDTH, MAX_WIDTH, options.width
        ));
    }

    let code = QrCode::new(text.as_bytes())
        .map_err(|e| format!("Failed to generate QR code: {}", e))?;

    debug!("Encoded QR code for {} bytes at width {}", text.len(), options.width);

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(options.width, options.width)
        .quiet_zone(options.margin > 0)
        .dark_color(svg::Color(&options.dark))
        .light_color(svg::Color(&options.light))
        .build())
}

/// Normalize a URL and encode it, `Ok(None)` for blank input
pub fn generate_svg_from_url(url: &str, options: &QrOptions) -> Result<Option<String>, String> {
    match normalize_url(url) {
        Some(url) => generate_svg(&url, options).map(Some),
        None => Ok(None),
    }
}
