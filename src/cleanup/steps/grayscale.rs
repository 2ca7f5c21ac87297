use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// BT.601 luma weights in 14-bit fixed point (they sum to 1 << 14)
const WEIGHT_R: u32 = 4899;
const WEIGHT_G: u32 = 9617;
const WEIGHT_B: u32 = 1868;
const SHIFT: u32 = 14;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Collapse any raster into a single 8-bit intensity plane.
/// Single-channel input is copied as-is, colour input is luminance-weighted.
pub fn apply(image: &DynamicImage) -> GrayImage {
    match image {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        // Already single-channel: drop alpha / rescale depth without weighting
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_) => image.to_luma8(),
        DynamicImage::ImageRgb8(rgb) => weighted(rgb),
        other => weighted(&other.to_rgb8()),
    }
}

fn weighted(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    })
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = WEIGHT_R * r as u32 + WEIGHT_G * g as u32 + WEIGHT_B * b as u32 + ROUND;
    (sum >> SHIFT) as u8
}
