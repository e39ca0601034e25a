#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use image::GrayImage;
use tubescan::{DecodedSymbol, PixelFormat, Point, ScanImage, ScanParams, SymbolDecoder};

/// Pixels at or above this level belong to a synthetic tube label
pub const LABEL_LEVEL: u8 = 100;

/// Bounding box of the label pixels in `region` as (x0, y0, x1, y1), inclusive
fn label_bounds(region: &GrayImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in region.enumerate_pixels() {
        if p[0] < LABEL_LEVEL {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

fn corners(x0: u32, y0: u32, x1: u32, y1: u32) -> [Point; 4] {
    let (x0, y0, x1, y1) = (x0 as f32, y0 as f32, x1 as f32, y1 as f32);
    [
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// "Decodes" a bright square: the message is its intensity, the corners its extent
pub struct ContentDecoder;

impl SymbolDecoder for ContentDecoder {
    fn decode(&self, region: &GrayImage, _params: &ScanParams) -> Option<DecodedSymbol> {
        let (x0, y0, x1, y1) = label_bounds(region)?;
        let value = region.get_pixel((x0 + x1) / 2, (y0 + y1) / 2)[0];
        Some(DecodedSymbol::new(format!("TUBE-{}", value), corners(x0, y0, x1, y1)))
    }
}

/// Succeeds only once the scale divisor reaches `min_scale`
pub struct ScaleGatedDecoder {
    pub min_scale: u32,
    pub calls: AtomicUsize,
}

impl ScaleGatedDecoder {
    pub fn new(min_scale: u32) -> Self {
        Self {
            min_scale,
            calls: AtomicUsize::new(0),
        }
    }
}

impl SymbolDecoder for ScaleGatedDecoder {
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if params.scale < self.min_scale {
            return None;
        }
        ContentDecoder.decode(region, params)
    }
}

/// Never finds anything; counts how often it was asked
#[derive(Default)]
pub struct FailingDecoder {
    pub calls: AtomicUsize,
}

impl SymbolDecoder for FailingDecoder {
    fn decode(&self, _region: &GrayImage, _params: &ScanParams) -> Option<DecodedSymbol> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        None
    }
}

/// Panics on a label of intensity `poison`, decodes everything else
pub struct PanickingDecoder {
    pub poison: u8,
}

impl SymbolDecoder for PanickingDecoder {
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol> {
        let symbol = ContentDecoder.decode(region, params)?;
        if symbol.message == format!("TUBE-{}", self.poison) {
            panic!("corrupt symbol in region");
        }
        Some(symbol)
    }
}

/// Reports every symbol with both reference corners at the region origin, so
/// its centroid sits on the well boundary
pub struct BoundaryDecoder;

impl SymbolDecoder for BoundaryDecoder {
    fn decode(&self, region: &GrayImage, params: &ScanParams) -> Option<DecodedSymbol> {
        let symbol = ContentDecoder.decode(region, params)?;
        let origin = Point::new(0.0, 0.0);
        Some(DecodedSymbol::new(symbol.message, [origin; 4]))
    }
}

/// Dark rack scan with bright square labels
///
/// Each entry of `tubes` is (row, col, intensity); the label is a
/// `label` px square centred in its `cell` px cell.
pub fn rack_scan(rows: u32, cols: u32, cell: u32, label: u32, tubes: &[(u32, u32, u8)]) -> ScanImage {
    let (width, height) = (cols * cell, rows * cell);
    let mut gray = GrayImage::new(width, height);
    let inset = (cell - label) / 2;
    for &(row, col, value) in tubes {
        let (left, top) = (col * cell + inset, row * cell + inset);
        for y in top..top + label {
            for x in left..left + label {
                gray.put_pixel(x, y, image::Luma([value]));
            }
        }
    }
    ScanImage::new(width, height, PixelFormat::Gray8, gray.into_raw()).unwrap()
}

/// Same scan as [`rack_scan`], expanded to 24-bit RGB
pub fn rack_scan_rgb(rows: u32, cols: u32, cell: u32, label: u32, tubes: &[(u32, u32, u8)]) -> ScanImage {
    let gray = rack_scan(rows, cols, cell, label, tubes);
    let rgb: Vec<u8> = gray.pixels().iter().flat_map(|&v| [v, v, v]).collect();
    ScanImage::new(gray.width(), gray.height(), PixelFormat::Rgb24, rgb).unwrap()
}

/// Install a test subscriber once; honours RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
