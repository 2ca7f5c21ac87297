use crate::cleanup::mask::{BinaryMask, BACKGROUND};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// Default minimum component area in pixels
pub const DEFAULT_MIN_AREA: u32 = 20;

/// Label map with a one-pixel background border around the mask
type LabelMap = ImageBuffer<Luma<u32>, Vec<u32>>;

/// Filtered mask plus component bookkeeping from the same labeling pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeckleOutcome {
    pub mask: BinaryMask,
    /// 8-connected components in the input mask
    pub components_before: usize,
    /// Components that reached `min_area`
    pub components_after: usize,
}

/// Remove 8-connected foreground components smaller than `min_area`.
/// A component of exactly `min_area` pixels is kept.
pub fn apply(mask: &BinaryMask, min_area: u32) -> SpeckleOutcome {
    if mask.is_empty() {
        return SpeckleOutcome {
            mask: mask.clone(),
            components_before: 0,
            components_after: 0,
        };
    }

    let labels = label(mask);
    let areas = component_areas(&labels);

    let filtered = BinaryMask::from_fn(mask.width(), mask.height(), |x, y| {
        match labels.get_pixel(x + 1, y + 1).0[0] {
            0 => false,
            id => areas[id as usize] >= min_area,
        }
    });

    let present = || areas.iter().skip(1).filter(|&&area| area > 0);
    SpeckleOutcome {
        mask: filtered,
        components_before: present().count(),
        components_after: present().filter(|&&area| area >= min_area).count(),
    }
}

/// Number of 8-connected foreground components
#[cfg(test)]
pub fn count_components(mask: &BinaryMask) -> usize {
    apply(mask, 0).components_before
}

/// Label on a copy padded with background so imageproc's union-find always
/// has more slots than labels (a lone foreground pixel would otherwise
/// take label 1 in a single-slot table).
fn label(mask: &BinaryMask) -> LabelMap {
    let mut padded = GrayImage::from_pixel(mask.width() + 2, mask.height() + 2, Luma([BACKGROUND]));
    image::imageops::replace(&mut padded, mask.as_image(), 1, 1);
    connected_components(&padded, Connectivity::Eight, Luma([BACKGROUND]))
}

/// Pixel count per label; index 0 is background and stays zero
fn component_areas(labels: &LabelMap) -> Vec<u32> {
    let max_label = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0);
    let mut areas = vec![0u32; max_label as usize + 1];

    for pixel in labels.pixels() {
        let id = pixel.0[0];
        if id != 0 {
            areas[id as usize] += 1;
        }
    }

    areas
}
