//! Renders payload text as a QR code image.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::utils::error::AppError;

const MIN_DIMENSION: u32 = 192;

/// SVG markup for `payload`, medium error correction.
pub fn render_svg(payload: &str) -> Result<String, AppError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| AppError::QrEncoding(e.to_string()))?;

    Ok(code
        .render::<svg::Color<'_>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_svg_document() {
        let svg = render_svg(r#"{"tokenId":"abc"}"#).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_oversized_payload_is_an_error() {
        let huge = "x".repeat(8_000);
        let err = render_svg(&huge).unwrap_err();
        assert_eq!(err.code(), "QR_ENCODING_ERROR");
    }
}
