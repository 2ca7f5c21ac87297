//! Raster encoding for transport

use crate::error::VisionError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::RgbImage;

/// Requested response format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Lossless WebP raster
    #[default]
    Webp,
    /// PNG raster
    Png,
    /// WebP raster plus traced SVG
    Svg,
}

impl OutputFormat {
    /// Parse from form field string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "webp" => Some(Self::Webp),
            "png" => Some(Self::Png),
            "svg" => Some(Self::Svg),
            _ => None,
        }
    }

    pub fn wants_vector(&self) -> bool {
        *self == Self::Svg
    }

    /// MIME type of the raster part of the response
    pub fn raster_mime(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Webp | Self::Svg => "image/webp",
        }
    }

    /// Encode `image` as this format's raster and wrap it in a data URL
    pub fn encode_data_url(&self, image: &RgbImage) -> Result<String, VisionError> {
        let bytes = match self {
            Self::Png => encode_png(image)?,
            Self::Webp | Self::Svg => encode_webp(image)?,
        };
        Ok(to_data_url(self.raster_mime(), &bytes))
    }
}

pub fn encode_webp(image: &RgbImage) -> Result<Vec<u8>, VisionError> {
    let mut bytes = Vec::new();
    image
        .write_with_encoder(WebPEncoder::new_lossless(&mut bytes))
        .map_err(|e| VisionError::EncodingError(format!("WebP: {}", e)))?;
    Ok(bytes)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, VisionError> {
    let mut bytes = Vec::new();
    image
        .write_with_encoder(PngEncoder::new(&mut bytes))
        .map_err(|e| VisionError::EncodingError(format!("PNG: {}", e)))?;
    Ok(bytes)
}

/// `data:<mime>;base64,<payload>`
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_tone() -> RgbImage {
        RgbImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    fn decode_data_url(url: &str) -> image::DynamicImage {
        let payload = url.split_once(',').unwrap().1;
        let bytes = STANDARD.decode(payload).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("WEBP"), Some(OutputFormat::Webp));
        assert_eq!(OutputFormat::from_str("svg"), Some(OutputFormat::Svg));
        assert_eq!(OutputFormat::from_str("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_str("jpeg"), None);
        assert!(OutputFormat::Svg.wants_vector());
        assert!(!OutputFormat::Webp.wants_vector());
    }

    #[test]
    fn test_webp_is_lossless() {
        let img = two_tone();
        let url = OutputFormat::Webp.encode_data_url(&img).unwrap();
        assert!(url.starts_with("data:image/webp;base64,"));
        assert_eq!(decode_data_url(&url).to_rgb8(), img);
    }

    #[test]
    fn test_png_round_trip() {
        let img = two_tone();
        let url = OutputFormat::Png.encode_data_url(&img).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_url(&url).to_rgb8(), img);
    }

    #[test]
    fn test_data_url_format() {
        assert_eq!(to_data_url("image/png", b"abc"), "data:image/png;base64,YWJj");
    }
}
