use image::{GrayImage, Luma};

/// Sample value stored for foreground cells
pub const FOREGROUND: u8 = 255;
/// Sample value stored for background cells
pub const BACKGROUND: u8 = 0;

/// Two-valued grid congruent to the raster that produced it.
///
/// Backed by a `GrayImage` holding only [`FOREGROUND`] and [`BACKGROUND`],
/// so it can be handed straight to `imageproc` routines that treat
/// non-zero pixels as foreground.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    cells: GrayImage,
}

impl BinaryMask {
    /// All-background mask of the given size
    #[cfg(test)]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: GrayImage::new(width, height),
        }
    }

    /// Build a mask by evaluating `f` at every cell
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        Self {
            cells: GrayImage::from_fn(width, height, |x, y| Luma([to_sample(f(x, y))])),
        }
    }

    /// Wrap an image produced by an imageproc routine on mask cells.
    /// Any non-zero sample counts as foreground.
    pub fn from_image(image: GrayImage) -> Self {
        let mut cells = image;
        for pixel in cells.pixels_mut() {
            pixel.0[0] = to_sample(pixel.0[0] != BACKGROUND);
        }
        Self { cells }
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    #[cfg(test)]
    pub fn dimensions(&self) -> (u32, u32) {
        self.cells.dimensions()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.cells.get_pixel(x, y).0[0] == FOREGROUND
    }

    #[cfg(test)]
    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        self.cells.put_pixel(x, y, Luma([to_sample(foreground)]));
    }

    /// Number of foreground cells
    #[cfg(test)]
    pub fn foreground_count(&self) -> usize {
        self.cells.pixels().filter(|p| p.0[0] == FOREGROUND).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.pixels().any(|p| p.0[0] == FOREGROUND)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.cells
    }
}

fn to_sample(foreground: bool) -> u8 {
    if foreground {
        FOREGROUND
    } else {
        BACKGROUND
    }
}
