//! Utility functions for image processing
//!
//! - Grayscale conversion (RGB/RGBA to luminance) for the shared working image

pub mod grayscale;
