use image::GrayImage;

use crate::models::{DecodeOptions, Point};

/// Per-attempt parameters handed to a [`SymbolDecoder`]
///
/// Edge lengths are in pixels of the unscaled crop; `scale` is the divisor
/// the decoder should shrink the crop by before scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    /// Shrink divisor for this attempt (1 = full resolution)
    pub scale: u32,
    /// Shortest symbol edge to accept
    pub min_edge: u32,
    /// Longest symbol edge to accept
    pub max_edge: u32,
    /// Pixels between scan lines
    pub scan_gap: u32,
    /// Maximum deviation from a right angle, in degrees
    pub square_deviation: u32,
    /// Minimum edge strength
    pub edge_threshold: u32,
    /// Maximum error corrections per symbol
    pub max_corrections: u32,
}

impl ScanParams {
    /// Derive attempt parameters from the options and the crop size
    pub fn from_options(options: &DecodeOptions, width: u32, height: u32, scale: u32) -> Self {
        let short = width.min(height) as f64;
        let long = width.max(height) as f64;
        Self {
            scale,
            min_edge: (options.min_edge_factor * short) as u32,
            max_edge: (options.max_edge_factor * long) as u32,
            scan_gap: ((options.scan_gap_factor * long) as u32).max(1),
            square_deviation: options.square_deviation,
            edge_threshold: options.edge_threshold,
            max_corrections: options.max_corrections,
        }
    }
}

/// A symbol found by a [`SymbolDecoder`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSymbol {
    /// Decoded text
    pub message: String,
    /// Corners relative to the region passed in, ordered top-left,
    /// top-right, bottom-right, bottom-left
    pub corners: [Point; 4],
}

impl DecodedSymbol {
    /// Symbol with the given message and corners
    pub fn new(message: impl Into<String>, corners: [Point; 4]) -> Self {
        Self {
            message: message.into(),
            corners,
        }
    }

    /// Same symbol with every corner shifted by (dx, dy)
    pub fn translated(mut self, dx: f32, dy: f32) -> Self {
        for corner in &mut self.corners {
            *corner = corner.translate(dx, dy);
        }
        self
    }
}

/// Matrix barcode decoding backend
///
/// Implementations must be safe to call from many worker threads at once;
/// each call gets its own region and shares nothing else.
pub trait SymbolDecoder: Send + Sync {
    /// Decode at most one symbol from `region`
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol>;
}

impl<T: SymbolDecoder + ?Sized> SymbolDecoder for &T {
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol> {
        (**self).decode(region, params)
    }
}

impl<T: SymbolDecoder + ?Sized> SymbolDecoder for Box<T> {
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol> {
        (**self).decode(region, params)
    }
}
