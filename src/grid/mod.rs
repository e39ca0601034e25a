//! Rack geometry
//!
//! - Partitioning a bounding box into labelled well cells
//! - The label policy for each scan orientation and barcode side
//! - Attributing decoded symbols back to cells (full-pallet mode)

/// Rack address labels
pub mod labels;
/// Centroid-in-cell attribution of decoded symbols
pub mod mapper;
/// Bounding box to cell partitioning
pub mod partition;

pub use labels::{base_label, label_for_position};
pub use mapper::{DecodedRegion, PalletAssignment, PositionMapper};
pub use partition::{CellGaps, GridCell, GridPartitioner, MAX_GRID_CELLS, partition};
