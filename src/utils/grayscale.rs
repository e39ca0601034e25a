/// Luminance conversion for scanned racks
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
///
/// Rows are converted in parallel; a full-rack scan at 600 dpi is large
/// enough for this to matter and it runs once per decode run.
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline]
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let lum = (COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8;
    lum.min(255) as u8
}

/// Convert a packed image with `channels` bytes per pixel (R, G, B first)
fn to_grayscale_parallel(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let src = &pixels[y * width * channels..(y + 1) * width * channels];
        for (out, px) in row.iter_mut().zip(src.chunks_exact(channels)) {
            *out = luminance(px[0], px[1], px[2]);
        }
    });

    gray
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgb, width, height, 3)
}

/// Convert RGBA to grayscale using parallel processing (ignores the fourth byte)
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgba, width, height, 4)
}
