use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage};
use tracing::debug;

use crate::error::ImageError;
use crate::utils::grayscale::{rgb_to_grayscale_parallel, rgba_to_grayscale_parallel};

/// Pixel layouts the pipeline accepts, resolved once when an image is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit luminance
    Gray8,
    /// 8-bit R, G, B
    Rgb24,
    /// 8-bit R, G, B plus an ignored fourth byte
    Rgba32,
}

impl PixelFormat {
    /// Map a bit depth to a format; only 8, 24 and 32 bpp are supported.
    pub fn from_bits_per_pixel(bits: u16) -> Result<Self, ImageError> {
        match bits {
            8 => Ok(PixelFormat::Gray8),
            24 => Ok(PixelFormat::Rgb24),
            32 => Ok(PixelFormat::Rgba32),
            other => Err(ImageError::UnsupportedBitDepth(other)),
        }
    }

    /// Bytes per pixel
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
            PixelFormat::Rgba32 => 4,
        }
    }
}

/// A scanned rack image as delivered by the acquisition or file layer
#[derive(Debug, Clone)]
pub struct ScanImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    dpi: Option<u32>,
    pixels: Vec<u8>,
}

impl ScanImage {
    /// Wrap a tightly packed pixel buffer, checking its size against the format.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            dpi: None,
            pixels,
        })
    }

    /// Load an image file through the `image` crate
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let (width, height) = GenericImageView::dimensions(&img);
        debug!(path = %path.display(), width, height, "loaded scan");
        Self::from_dynamic(img)
    }

    /// Convert an in-memory image; luminance stays 8-bit gray, everything else becomes RGB.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, ImageError> {
        match img {
            DynamicImage::ImageLuma8(gray) => {
                let (width, height) = gray.dimensions();
                Self::new(width, height, PixelFormat::Gray8, gray.into_raw())
            }
            DynamicImage::ImageRgba8(rgba) => {
                let (width, height) = rgba.dimensions();
                Self::new(width, height, PixelFormat::Rgba32, rgba.into_raw())
            }
            other => {
                let rgb = other.to_rgb8();
                let (width, height) = rgb.dimensions();
                Self::new(width, height, PixelFormat::Rgb24, rgb.into_raw())
            }
        }
    }

    /// Attach the scan resolution used for resolution-dependent thresholds
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = Some(dpi);
        self
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Scan resolution, if known
    pub fn dpi(&self) -> Option<u32> {
        self.dpi
    }

    /// Raw pixel bytes
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Luminance copy of the scan, the shared working image of a decode run
    pub fn grayscale(&self) -> Result<GrayImage, ImageError> {
        let (w, h) = (self.width as usize, self.height as usize);
        let gray = match self.format {
            PixelFormat::Gray8 => self.pixels.clone(),
            PixelFormat::Rgb24 => rgb_to_grayscale_parallel(&self.pixels, w, h),
            PixelFormat::Rgba32 => rgba_to_grayscale_parallel(&self.pixels, w, h),
        };
        let actual = gray.len();
        GrayImage::from_raw(self.width, self.height, gray).ok_or(ImageError::BufferSize {
            expected: w * h,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_depth_resolution() {
        assert_eq!(PixelFormat::from_bits_per_pixel(8).unwrap(), PixelFormat::Gray8);
        assert_eq!(PixelFormat::from_bits_per_pixel(24).unwrap(), PixelFormat::Rgb24);
        assert_eq!(PixelFormat::from_bits_per_pixel(32).unwrap(), PixelFormat::Rgba32);
        assert!(matches!(
            PixelFormat::from_bits_per_pixel(16),
            Err(ImageError::UnsupportedBitDepth(16))
        ));
    }

    #[test]
    fn test_buffer_validation() {
        assert!(ScanImage::new(0, 10, PixelFormat::Gray8, vec![]).is_err());
        assert!(matches!(
            ScanImage::new(2, 2, PixelFormat::Rgb24, vec![0; 11]),
            Err(ImageError::BufferSize { expected: 12, actual: 11 })
        ));
        assert!(ScanImage::new(2, 2, PixelFormat::Rgb24, vec![0; 12]).is_ok());
    }

    #[test]
    fn test_grayscale_per_format() {
        let rgb = ScanImage::new(2, 1, PixelFormat::Rgb24, vec![255, 255, 255, 0, 0, 0]).unwrap();
        let gray = rgb.grayscale().unwrap();
        assert!(gray.get_pixel(0, 0)[0] >= 254);
        assert_eq!(gray.get_pixel(1, 0)[0], 0);

        let rgba = ScanImage::new(1, 1, PixelFormat::Rgba32, vec![0, 255, 0, 7]).unwrap();
        assert!(rgba.grayscale().unwrap().get_pixel(0, 0)[0] > 100);

        let luma = ScanImage::new(1, 1, PixelFormat::Gray8, vec![42]).unwrap();
        assert_eq!(luma.grayscale().unwrap().get_pixel(0, 0)[0], 42);
    }

    #[test]
    fn test_from_dynamic_keeps_luma() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(4, 3));
        let scan = ScanImage::from_dynamic(img).unwrap().with_dpi(600);
        assert_eq!(scan.format(), PixelFormat::Gray8);
        assert_eq!((scan.width(), scan.height(), scan.dpi()), (4, 3, Some(600)));
    }
}
