//! Tube blob detection for full-pallet decoding
//!
//! This module locates the barcode-bearing blob inside each coarse grid cell:
//! - Connected component labelling of thresholded crops
//! - The pluggable segmentation primitives (smooth, threshold, components)
//! - The reduction policy that picks the blob and tightens the cell

/// Union-find labelling of foreground regions
pub mod connected_components;
/// Shrinks a candidate cell to its largest qualifying blob
pub mod reducer;
/// Segmentation primitives and the default implementation
pub mod segmentation;

pub use reducer::SegmentationReducer;
pub use segmentation::{BlobSegmenter, Segmenter};
