use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

/// Rotation of the rack in the scan relative to its canonical addressing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Rows run along the image's long side
    Landscape,
    /// Rows run along the image's short side
    Portrait,
}

/// Which face of the tubes carries the imaged barcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarcodePosition {
    /// Barcodes are on the caps, scanned from above
    TubeTops,
    /// Barcodes are on the bottoms, scanned from below
    TubeBottoms,
}

impl FromStr for Orientation {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            _ => Err(ParseEnumError::new("orientation", s)),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
        })
    }
}

impl FromStr for BarcodePosition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(BarcodePosition::TubeTops),
            "bottom" => Ok(BarcodePosition::TubeBottoms),
            _ => Err(ParseEnumError::new("barcode position", s)),
        }
    }
}

impl fmt::Display for BarcodePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BarcodePosition::TubeTops => "top",
            BarcodePosition::TubeBottoms => "bottom",
        })
    }
}

/// Standard rack geometries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PalletSize {
    /// 8 rows by 12 columns (96 wells)
    Rows8Cols12,
    /// 10 x 10
    Rows10Cols10,
    /// 12 x 12
    Rows12Cols12,
    /// 9 x 9
    Rows9Cols9,
    /// Single tube
    Rows1Cols1,
}

impl PalletSize {
    /// Number of rows
    pub fn rows(&self) -> u32 {
        self.dimensions().0
    }

    /// Number of columns
    pub fn cols(&self) -> u32 {
        self.dimensions().1
    }

    fn dimensions(&self) -> (u32, u32) {
        match self {
            PalletSize::Rows8Cols12 => (8, 12),
            PalletSize::Rows10Cols10 => (10, 10),
            PalletSize::Rows12Cols12 => (12, 12),
            PalletSize::Rows9Cols9 => (9, 9),
            PalletSize::Rows1Cols1 => (1, 1),
        }
    }
}

impl FromStr for PalletSize {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "8x12" => Ok(PalletSize::Rows8Cols12),
            "10x10" => Ok(PalletSize::Rows10Cols10),
            "12x12" => Ok(PalletSize::Rows12Cols12),
            "9x9" => Ok(PalletSize::Rows9Cols9),
            "1x1" => Ok(PalletSize::Rows1Cols1),
            _ => Err(ParseEnumError::new("pallet size", s)),
        }
    }
}

impl fmt::Display for PalletSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows(), self.cols())
    }
}

/// Per-position enable mask for full-pallet decoding
///
/// Indexed by logical position `row * cols + logical_col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellProfile {
    rows: u32,
    cols: u32,
    enabled: Vec<bool>,
}

impl WellProfile {
    /// Profile with every position enabled
    pub fn all(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            enabled: vec![true; rows as usize * cols as usize],
        }
    }

    /// Profile with no position enabled
    pub fn none(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            enabled: vec![false; rows as usize * cols as usize],
        }
    }

    /// Rows covered by the mask
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Columns covered by the mask
    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    /// Enable or disable one logical position
    pub fn set(&mut self, row: u32, col: u32, enabled: bool) {
        if row < self.rows && col < self.cols {
            let idx = self.index(row, col);
            self.enabled[idx] = enabled;
        }
    }

    /// Whether the logical position is enabled; out-of-range positions are not.
    pub fn is_enabled(&self, row: u32, col: u32) -> bool {
        row < self.rows && col < self.cols && self.enabled[self.index(row, col)]
    }

    /// Number of enabled positions
    pub fn enabled_count(&self) -> usize {
        self.enabled.iter().filter(|&&e| e).count()
    }
}
