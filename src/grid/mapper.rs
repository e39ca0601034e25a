use super::partition::GridCell;
use crate::error::PositionError;
use crate::models::Point;

/// A decoded symbol to attribute to a rack position
#[derive(Debug, Clone, Copy)]
pub struct DecodedRegion<'a> {
    /// Decoded message
    pub message: &'a str,
    /// Corners in image coordinates: top-left, top-right, bottom-right, bottom-left
    pub corners: &'a [Point; 4],
}

impl DecodedRegion<'_> {
    /// Centre of the top-left and bottom-right corners
    pub fn centroid(&self) -> Point {
        self.corners[0].midpoint(&self.corners[2])
    }
}

/// A message placed at its logical rack position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PalletAssignment {
    /// Rack row
    pub row: u32,
    /// Physical rack column, `cols - 1 - image column`
    ///
    /// The scanner sees the rack mirrored, so this is the same index a
    /// [`crate::WellProfile`] is keyed by. It does not follow `label`, whose
    /// column depends on orientation and barcode side: a tube-tops landscape
    /// scan labels image cell (0, 0) "A1" while its column here is `cols - 1`.
    pub col: u32,
    /// Rack label
    pub label: String,
    /// Decoded message
    pub message: String,
}

/// Attributes decoded symbols to the candidate cells they were found in
pub struct PositionMapper<'a> {
    candidates: &'a [GridCell],
}

impl<'a> PositionMapper<'a> {
    /// Mapper over the candidate cells that were dispatched for decoding
    pub fn new(candidates: &'a [GridCell]) -> Self {
        Self { candidates }
    }

    /// First candidate whose rectangle strictly contains `p`
    pub fn locate(&self, p: Point) -> Option<&'a GridCell> {
        self.candidates.iter().find(|c| c.rect.strictly_contains(p))
    }

    /// Place every decoded region; a single unattributable region fails the
    /// whole mapping since it means the grid model does not match the scan.
    pub fn map_decoded_regions<'r, I>(&self, decoded: I) -> Result<Vec<PalletAssignment>, PositionError>
    where
        I: IntoIterator<Item = DecodedRegion<'r>>,
    {
        decoded
            .into_iter()
            .map(|region| {
                let centroid = region.centroid();
                let cell = self.locate(centroid).ok_or_else(|| PositionError {
                    message: region.message.to_string(),
                    centroid,
                })?;
                Ok(PalletAssignment {
                    row: cell.row,
                    col: cell.logical_col,
                    label: cell.label.clone(),
                    message: region.message.to_string(),
                })
            })
            .collect()
    }
}
