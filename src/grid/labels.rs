use crate::models::{BarcodePosition, Orientation};

/// Row letters: A..Z, then AA, AB, ... so every index gets a distinct prefix
fn row_letters(row: u32) -> String {
    let mut letters = Vec::new();
    let mut n = row;
    loop {
        letters.push((b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Canonical rack address: row letter followed by the 1-based column
pub fn base_label(row: u32, col: u32) -> String {
    format!("{}{}", row_letters(row), col + 1)
}

/// Label of image-grid cell (`row`, `col`) for a rack scanned in the given
/// orientation from the given face.
///
/// | barcode side | orientation | label |
/// |---|---|---|
/// | tops | landscape | base(row, col) |
/// | tops | portrait | base(cols-1-col, row) |
/// | bottoms | landscape | base(row, cols-1-col) |
/// | bottoms | portrait | base(col, row) |
pub fn label_for_position(
    row: u32,
    col: u32,
    cols: u32,
    orientation: Orientation,
    barcode_position: BarcodePosition,
) -> String {
    match (barcode_position, orientation) {
        (BarcodePosition::TubeTops, Orientation::Landscape) => base_label(row, col),
        (BarcodePosition::TubeTops, Orientation::Portrait) => base_label(cols - 1 - col, row),
        (BarcodePosition::TubeBottoms, Orientation::Landscape) => {
            base_label(row, cols - 1 - col)
        }
        (BarcodePosition::TubeBottoms, Orientation::Portrait) => base_label(col, row),
    }
}
