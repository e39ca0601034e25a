//! Error types for fallible constructors
//!
//! Expected decode conditions (nothing to decode, nothing decoded, position
//! mismatch) are reported through [`crate::DecodeStatus`], not through these.

use thiserror::Error;

use crate::models::{PixelRect, Point};

/// Problems with a pixel buffer or image file
#[derive(Error, Debug)]
pub enum ImageError {
    /// Width or height is zero
    #[error("image has empty dimensions {width}x{height}")]
    EmptyDimensions {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Buffer length does not match width x height x bytes per pixel
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Bytes required by the declared geometry
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Bit depth outside the supported set
    #[error("unsupported bit depth: {0} bpp")]
    UnsupportedBitDepth(u16),

    /// File could not be read or decoded
    #[error("failed to load image: {0}")]
    Load(#[from] image::ImageError),
}

/// Invalid well geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// Rectangle with zero width or height
    #[error("well {label} has an empty rectangle {rect}")]
    EmptyRectangle {
        /// Well label
        label: String,
        /// Offending rectangle
        rect: PixelRect,
    },
}

/// Invalid decoder configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A fractional option is outside (0, 1]
    #[error("{name} must be in (0, 1], got {value}")]
    FactorOutOfRange {
        /// Option name
        name: &'static str,
        /// Supplied value
        value: f64,
    },

    /// min_edge_factor exceeds max_edge_factor
    #[error("min_edge_factor {min} exceeds max_edge_factor {max}")]
    EdgeFactorsInverted {
        /// Supplied minimum
        min: f64,
        /// Supplied maximum
        max: f64,
    },

    /// Initial scale divisor of zero
    #[error("shrink must be at least 1")]
    ZeroShrink,

    /// Worker threads could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A decoded symbol whose centre falls inside no candidate cell
#[derive(Error, Debug, Clone, PartialEq)]
#[error("decoded message {:?} at ({:.1}, {:.1}) lies in no grid cell", .message, .centroid.x, .centroid.y)]
pub struct PositionError {
    /// Message of the unattributed symbol
    pub message: String,
    /// Centre of its top-left and bottom-right corners
    pub centroid: Point,
}

/// Unrecognised name for an enumerated setting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
