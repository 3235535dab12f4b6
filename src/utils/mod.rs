//! Utility functions for image processing
//!
//! This module provides helper functions for QR code detection:
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Binarization (adaptive integral-image threshold and Otsu's method)
//! - Geometry (perspective transforms, angle and containment tests)

pub mod binarization;
pub mod geometry;
pub mod grayscale;
