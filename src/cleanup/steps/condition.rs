use crate::cleanup::BinaryMask;
use crate::cleanup::StructuringElement;
use image::{GrayImage, Luma};
use imageproc::morphology::grayscale_dilate;

/// Canonical value for line pixels
pub const INK: u8 = 0;
/// Canonical value for background pixels
pub const PAPER: u8 = 255;

/// Dilate once with `element`, then render as dark lines on light paper
pub fn apply(mask: &BinaryMask, element: &StructuringElement) -> GrayImage {
    render(&dilate(mask, element))
}

/// Binary dilation: a cell becomes foreground when any cell under the
/// element footprint anchored on it is foreground. Footprint cells outside
/// the grid are ignored, so borders never grow spurious ink.
pub fn dilate(mask: &BinaryMask, element: &StructuringElement) -> BinaryMask {
    BinaryMask::from_image(grayscale_dilate(mask.as_image(), &element.kernel()))
}

/// Map foreground to [`INK`] and background to [`PAPER`]
pub fn render(mask: &BinaryMask) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.is_foreground(x, y) {
            Luma([INK])
        } else {
            Luma([PAPER])
        }
    })
}

/// Inverse of [`render`]: ink cells become foreground again
#[cfg(test)]
pub fn read_canonical(raster: &GrayImage) -> BinaryMask {
    BinaryMask::from_fn(raster.width(), raster.height(), |x, y| {
        raster.get_pixel(x, y).0[0] == INK
    })
}
