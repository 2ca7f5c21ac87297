//! Structuring element used by the line conditioner

use image::{GrayImage, Luma};
use imageproc::morphology::Mask;

use super::mask::FOREGROUND;

/// Rectangular, all-foreground structuring element with an anchor cell.
///
/// The footprint around a target cell `(x, y)` covers
/// `(x + i - anchor_x, y + j - anchor_y)` for `i < width`, `j < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuringElement {
    width: u32,
    height: u32,
    anchor_x: u32,
    anchor_y: u32,
}

impl StructuringElement {
    /// 2x2 kernel anchored at (1, 1): grows lines one pixel right and down,
    /// bridging single-pixel gaps without over-thickening.
    pub const LINE: StructuringElement = StructuringElement::square(2);

    /// Square kernel of side `size` with the anchor at `size / 2`
    pub const fn square(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            anchor_x: size / 2,
            anchor_y: size / 2,
        }
    }

    /// imageproc mask with the same footprint and anchor
    pub fn kernel(&self) -> Mask {
        let footprint = GrayImage::from_pixel(self.width, self.height, Luma([FOREGROUND]));
        Mask::from_image(&footprint, self.anchor_x as u8, self.anchor_y as u8)
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self::LINE
    }
}
