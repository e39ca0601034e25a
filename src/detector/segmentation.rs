use image::{GrayImage, Luma, imageops};

use super::connected_components::{Component, find_foreground_regions};

/// Pixel-level primitives used to locate tube blobs
///
/// The reducer only decides how often to call these and how to pick among the
/// components; any implementation producing equivalent masks can be swapped in.
pub trait Segmenter: Send + Sync {
    /// Gaussian smoothing with standard deviation `sigma`
    fn smooth(&self, image: &GrayImage, sigma: f32) -> GrayImage;

    /// Binary threshold: pixels above `level` become 255, the rest 0
    fn threshold(&self, image: &GrayImage, level: u8) -> GrayImage;

    /// Foreground components of a binary image
    fn components(&self, binary: &GrayImage) -> Vec<Component>;
}

/// Default [`Segmenter`] built on `image::imageops` and union-find labelling
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobSegmenter;

impl Segmenter for BlobSegmenter {
    fn smooth(&self, image: &GrayImage, sigma: f32) -> GrayImage {
        imageops::blur(image, sigma)
    }

    fn threshold(&self, image: &GrayImage, level: u8) -> GrayImage {
        let mut out = image.clone();
        for px in out.pixels_mut() {
            *px = Luma([if px[0] > level { 255 } else { 0 }]);
        }
        out
    }

    fn components(&self, binary: &GrayImage) -> Vec<Component> {
        find_foreground_regions(binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let img = GrayImage::from_raw(3, 1, vec![50, 51, 200]).unwrap();
        let bin = BlobSegmenter.threshold(&img, 50);
        assert_eq!(bin.into_raw(), vec![0, 255, 255]);
    }

    #[test]
    fn test_smooth_keeps_uniform_image() {
        let img = GrayImage::from_pixel(16, 16, Luma([120]));
        let out = BlobSegmenter.smooth(&img, 2.0);
        assert_eq!(out.dimensions(), (16, 16));
        assert!(out.pixels().all(|p| (p[0] as i32 - 120).abs() <= 1));
    }
}
