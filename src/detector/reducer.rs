use image::{GrayImage, imageops};
use tracing::debug;

use super::segmentation::Segmenter;
use crate::models::PixelRect;

/// Smoothing passes applied before thresholding
const SMOOTHING_PASSES: usize = 5;
/// Gaussian sigma of one pass (an 11x11 kernel)
const SMOOTHING_SIGMA: f32 = 2.0;
/// Fixed binary threshold after smoothing
const BLOB_THRESHOLD: u8 = 50;

/// Minimum component area in pixels for a scan resolution
///
/// Barcodes have a roughly fixed physical size, so their pixel area grows
/// with dpi. Unknown resolutions are not filtered.
pub fn min_blob_area(dpi: Option<u32>) -> u64 {
    match dpi {
        None => 0,
        Some(d) if d < 400 => 840,
        Some(d) if d < 600 => 1900,
        Some(_) => 2400,
    }
}

/// Shrinks a coarse cell to the bounding box of the tube it contains
pub struct SegmentationReducer<'a, S: Segmenter + ?Sized> {
    segmenter: &'a S,
    min_area: u64,
}

impl<'a, S: Segmenter + ?Sized> SegmentationReducer<'a, S> {
    /// Reducer for a scan taken at `dpi`
    pub fn new(segmenter: &'a S, dpi: Option<u32>) -> Self {
        Self {
            segmenter,
            min_area: min_blob_area(dpi),
        }
    }

    /// Tight rectangle of the largest qualifying blob in `candidate`, in image
    /// coordinates, or [`PixelRect::EMPTY`] when the cell holds nothing.
    pub fn reduce(&self, gray: &GrayImage, candidate: PixelRect) -> PixelRect {
        let crop = imageops::crop_imm(
            gray,
            candidate.x,
            candidate.y,
            candidate.width,
            candidate.height,
        )
        .to_image();
        if crop.width() == 0 || crop.height() == 0 {
            return PixelRect::EMPTY;
        }

        let mut smoothed = crop;
        for _ in 0..SMOOTHING_PASSES {
            smoothed = self.segmenter.smooth(&smoothed, SMOOTHING_SIGMA);
        }
        let binary = self.segmenter.threshold(&smoothed, BLOB_THRESHOLD);

        let largest = self
            .segmenter
            .components(&binary)
            .into_iter()
            .filter(|c| c.area >= self.min_area)
            .max_by_key(|c| c.bounds.area());

        match largest {
            Some(component) => component.bounds.offset(candidate.x, candidate.y),
            None => {
                debug!(%candidate, "could not reduce candidate to a blob");
                PixelRect::EMPTY
            }
        }
    }
}
