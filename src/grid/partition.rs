use tracing::warn;

use super::labels::label_for_position;
use crate::error::GeometryError;
use crate::models::{BarcodePosition, Orientation, PixelRect, WellRectangle};

/// Largest grid the partitioner will lay out
pub const MAX_GRID_CELLS: u32 = 1 << 16;

/// Spacing between tubes, as fractions of the cell size, trimmed symmetrically
/// from each cell before it is cropped
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellGaps {
    /// Fraction of the cell width removed (half on each side)
    pub horizontal: f32,
    /// Fraction of the cell height removed (half on each side)
    pub vertical: f32,
}

impl CellGaps {
    /// Same gap fraction on both axes
    pub fn uniform(fraction: f32) -> Self {
        Self {
            horizontal: fraction,
            vertical: fraction,
        }
    }
}

/// One cell of the rack grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Image-grid row, top to bottom
    pub row: u32,
    /// Image-grid column, left to right
    pub col: u32,
    /// Physical column; the scan mirrors the rack horizontally
    pub logical_col: u32,
    /// Pixel region after gap trimming
    pub rect: PixelRect,
    /// Rack label
    pub label: String,
}

impl GridCell {
    /// Well rectangle covering this cell
    pub fn to_well(&self) -> Result<WellRectangle, GeometryError> {
        WellRectangle::from_rect(self.label.clone(), self.rect)
    }
}

/// Splits a rack bounding box into `rows x cols` equal cells
#[derive(Debug, Clone)]
pub struct GridPartitioner {
    bounding_box: PixelRect,
    rows: u32,
    cols: u32,
    orientation: Orientation,
    barcode_position: BarcodePosition,
    gaps: CellGaps,
}

impl GridPartitioner {
    /// Partitioner without gap trimming
    pub fn new(
        bounding_box: PixelRect,
        rows: u32,
        cols: u32,
        orientation: Orientation,
        barcode_position: BarcodePosition,
    ) -> Self {
        Self {
            bounding_box,
            rows,
            cols,
            orientation,
            barcode_position,
            gaps: CellGaps::default(),
        }
    }

    /// Trim every cell by the given gap fractions
    pub fn with_gaps(mut self, gaps: CellGaps) -> Self {
        self.gaps = gaps;
        self
    }

    /// Cells in row-major image order, or an empty vector when the grid cannot
    /// be laid out inside the bounding box.
    pub fn cells(&self) -> Vec<GridCell> {
        let (rows, cols, bbox) = (self.rows, self.cols, self.bounding_box);
        if rows == 0 || cols == 0 {
            warn!(rows, cols, "grid has no cells");
            return Vec::new();
        }
        let count = match rows.checked_mul(cols) {
            Some(count) if count <= MAX_GRID_CELLS => count,
            _ => {
                warn!(rows, cols, max = MAX_GRID_CELLS, "grid has too many cells");
                return Vec::new();
            }
        };
        let gaps_valid = (0.0..1.0).contains(&self.gaps.horizontal)
            && (0.0..1.0).contains(&self.gaps.vertical);
        if !gaps_valid {
            warn!(gaps = ?self.gaps, "gap fractions must be in [0, 1)");
            return Vec::new();
        }

        // Origins are floor(i * extent / n) so truncated cells never overlap.
        let gap_w = (bbox.width as f32 / cols as f32 * self.gaps.horizontal) as u32;
        let gap_h = (bbox.height as f32 / rows as f32 * self.gaps.vertical) as u32;
        let width = (bbox.width / cols).saturating_sub(gap_w);
        let height = (bbox.height / rows).saturating_sub(gap_h);
        let origin = |start: u32, extent: u32, i: u32, n: u32| {
            (start as u64 + i as u64 * extent as u64 / n as u64) as u32
        };

        let mut cells = Vec::with_capacity(count as usize);
        for row in 0..rows {
            let top = origin(bbox.y, bbox.height, row, rows) + gap_h / 2;
            for col in 0..cols {
                let left = origin(bbox.x, bbox.width, col, cols) + gap_w / 2;
                let rect = PixelRect::new(left, top, width, height);
                let label =
                    label_for_position(row, col, cols, self.orientation, self.barcode_position);

                if rect.is_empty() {
                    warn!(%label, %rect, "well rectangle has no area");
                    return Vec::new();
                }
                if !bbox.contains_rect(&rect) {
                    warn!(%label, %rect, %bbox, "well rectangle outside bounding box");
                    return Vec::new();
                }

                cells.push(GridCell {
                    row,
                    col,
                    logical_col: cols - 1 - col,
                    rect,
                    label,
                });
            }
        }
        cells
    }

    /// Cells as labelled well rectangles
    pub fn wells(&self) -> Vec<WellRectangle> {
        self.cells()
            .iter()
            .filter_map(|cell| cell.to_well().ok())
            .collect()
    }
}

/// Well rectangles for a `rows x cols` rack filling `bounding_box`
///
/// Returns an empty vector (with a warning) when any cell would fall outside
/// the box or have no area; callers treat that as nothing to decode.
pub fn partition(
    bounding_box: PixelRect,
    rows: u32,
    cols: u32,
    orientation: Orientation,
    barcode_position: BarcodePosition,
) -> Vec<WellRectangle> {
    GridPartitioner::new(bounding_box, rows, cols, orientation, barcode_position).wells()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap(a: &PixelRect, b: &PixelRect) -> u64 {
        let w = a.right().min(b.right()).saturating_sub(a.x.max(b.x) as u64);
        let h = a.bottom().min(b.bottom()).saturating_sub(a.y.max(b.y) as u64);
        w * h
    }

    #[test]
    fn test_96_well_rack() {
        let bbox = PixelRect::new(0, 0, 1200, 800);
        let wells = partition(
            bbox,
            8,
            12,
            Orientation::Landscape,
            BarcodePosition::TubeBottoms,
        );
        assert_eq!(wells.len(), 96);
        assert!(wells.iter().all(|w| w.rect().width == 100 && w.rect().height == 100));
        assert_eq!(wells[0].label(), "A12");
        assert_eq!(wells[0].rect(), PixelRect::new(0, 0, 100, 100));
        assert_eq!(wells[11].label(), "A1");
        assert_eq!(wells[95].label(), "H1");
        assert_eq!(wells[95].rect(), PixelRect::new(1100, 700, 100, 100));
    }

    #[test]
    fn test_partition_coverage() {
        let boxes = [
            PixelRect::new(0, 0, 1200, 800),
            PixelRect::new(37, 11, 1199, 799),
            PixelRect::new(5, 5, 97, 61),
            PixelRect::new(0, 0, 13, 13),
        ];
        for bbox in boxes {
            for (rows, cols) in [(1, 1), (8, 12), (12, 12), (9, 9), (3, 7)] {
                let partitioner = GridPartitioner::new(
                    bbox,
                    rows,
                    cols,
                    Orientation::Landscape,
                    BarcodePosition::TubeTops,
                );
                let cells = partitioner.cells();
                assert_eq!(cells.len(), (rows * cols) as usize, "{} {}x{}", bbox, rows, cols);
                for (i, a) in cells.iter().enumerate() {
                    assert!(bbox.contains_rect(&a.rect));
                    for b in &cells[i + 1..] {
                        assert_eq!(overlap(&a.rect, &b.rect), 0, "{} vs {}", a.rect, b.rect);
                    }
                }
            }
        }
    }

    #[test]
    fn test_gaps_shrink_around_center() {
        let cells = GridPartitioner::new(
            PixelRect::new(0, 0, 1200, 800),
            8,
            12,
            Orientation::Landscape,
            BarcodePosition::TubeTops,
        )
        .with_gaps(CellGaps::uniform(0.2))
        .cells();
        assert_eq!(cells.len(), 96);
        assert_eq!(cells[0].rect, PixelRect::new(10, 10, 80, 80));
        assert_eq!(cells[13].rect, PixelRect::new(110, 110, 80, 80));
    }

    #[test]
    fn test_mirrored_logical_column() {
        let cells = GridPartitioner::new(
            PixelRect::new(0, 0, 1200, 800),
            8,
            12,
            Orientation::Landscape,
            BarcodePosition::TubeTops,
        )
        .cells();
        assert_eq!((cells[0].col, cells[0].logical_col), (0, 11));
        assert_eq!((cells[11].col, cells[11].logical_col), (11, 0));
    }

    #[test]
    fn test_invalid_grids_are_empty() {
        let bbox = PixelRect::new(0, 0, 100, 100);
        let p = |rows, cols| {
            GridPartitioner::new(bbox, rows, cols, Orientation::Landscape, BarcodePosition::TubeTops)
        };
        assert!(p(0, 12).cells().is_empty());
        assert!(p(8, 0).cells().is_empty());
        // cells narrower than a pixel
        assert!(p(1, 200).cells().is_empty());
        assert!(p(8, 12).with_gaps(CellGaps::uniform(1.0)).cells().is_empty());
        assert!(p(8, 12).with_gaps(CellGaps::uniform(-0.1)).cells().is_empty());
    }

    #[test]
    fn test_oversized_grids_are_empty() {
        let bbox = PixelRect::new(0, 0, 100_000, 100_000);
        let p = |rows, cols| {
            GridPartitioner::new(bbox, rows, cols, Orientation::Landscape, BarcodePosition::TubeTops)
        };
        // rows * cols overflows u32
        assert!(p(70_000, 70_000).cells().is_empty());
        assert!(p(1_000, 1_000).cells().is_empty());
        assert_eq!(p(256, 256).cells().len(), MAX_GRID_CELLS as usize);
    }
}
