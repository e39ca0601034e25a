//! tubescan - concurrent DataMatrix decoding for test tube racks
//!
//! Takes a scan of a whole rack and decodes the barcode on every tube:
//! - Wells are declared as labelled rectangles, or generated from a
//!   rows x cols grid over a bounding box
//! - Each well is decoded on a dedicated worker pool, retrying at
//!   increasing scale divisors
//! - Duplicate messages are resolved first-writer-wins
//! - In full-pallet mode each unique message is mapped back to its rack
//!   position, honouring the scan orientation and barcode side
//!
//! The matrix symbol decoder itself is supplied by the caller through
//! [`SymbolDecoder`].
//!
//! # Example
//! ```
//! use image::GrayImage;
//! use tubescan::{
//!     BarcodePosition, DecodeOptions, DecodeStatus, DecodedSymbol, Decoder, DecoderConfig,
//!     Orientation, PixelFormat, PixelRect, ScanImage, ScanParams, SymbolDecoder, partition,
//! };
//!
//! struct NoBarcodes;
//!
//! impl SymbolDecoder for NoBarcodes {
//!     fn decode(&self, _region: &GrayImage, _params: &ScanParams) -> Option<DecodedSymbol> {
//!         None
//!     }
//! }
//!
//! let image = ScanImage::new(1200, 800, PixelFormat::Gray8, vec![0; 1200 * 800]).unwrap();
//! let wells = partition(
//!     PixelRect::new(0, 0, 1200, 800),
//!     8,
//!     12,
//!     Orientation::Landscape,
//!     BarcodePosition::TubeBottoms,
//! );
//! let decoder = Decoder::new(NoBarcodes, DecodeOptions::default(), DecoderConfig::default()).unwrap();
//! let report = decoder.decode_wells(&image, &wells);
//! assert_eq!(report.status(), DecodeStatus::NothingDecoded);
//! assert_eq!(report.attempted(), 96);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Per-well decoding: tasks, registry, worker pool, configuration
pub mod decoder;
/// Tube blob detection used by full-pallet mode
pub mod detector;
/// Error types for fallible constructors
pub mod error;
/// Rack geometry: partitioning, labels, position mapping
pub mod grid;
/// Core data structures (ScanImage, WellRectangle, DecodeOptions, etc.)
pub mod models;
/// Decode orchestration and run reports
pub mod pipeline;
/// Utility functions (grayscale conversion)
pub mod utils;

pub use decoder::{
    DecodeOutcome, DecodedSymbol, DecoderConfig, Registration, RegistryEntries, ScanParams,
    SymbolDecoder, WellResult,
};
pub use detector::{BlobSegmenter, Segmenter};
pub use error::{ConfigError, GeometryError, ImageError, ParseEnumError, PositionError};
pub use grid::{CellGaps, GridCell, PalletAssignment, label_for_position, partition};
pub use models::{
    BarcodePosition, DecodeOptions, Orientation, PalletSize, PixelFormat, PixelRect, Point,
    ScanImage, WellProfile, WellRectangle,
};
pub use pipeline::{DecodeReport, DecodeStatus, Decoder, PalletLayout};
