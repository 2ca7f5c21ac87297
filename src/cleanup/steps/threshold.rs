use crate::cleanup::BinaryMask;
use image::GrayImage;

/// Default global threshold. Detector output encodes line confidence as
/// high intensity, so only strong responses become foreground.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Fixed global binarization: foreground iff `intensity > threshold`
pub fn apply(gray: &GrayImage, threshold: u8) -> BinaryMask {
    BinaryMask::from_fn(gray.width(), gray.height(), |x, y| {
        gray.get_pixel(x, y).0[0] > threshold
    })
}
