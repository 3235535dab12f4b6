/// Convert RGB/RGBA buffers to luminance
/// Y = 0.299*R + 0.587*G + 0.114*B
/// Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
use rayon::prelude::*;

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

/// Images below this many pixels are converted on the calling thread
const PARALLEL_THRESHOLD: usize = 1 << 18;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8) as u8
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgb, width * height, 3)
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgba, width * height, 4)
}

fn to_grayscale(pixels: &[u8], pixel_count: usize, channels: usize) -> Vec<u8> {
    let src = &pixels[..(pixel_count * channels).min(pixels.len())];
    let mut gray = vec![0u8; src.len() / channels];
    if gray.len() >= PARALLEL_THRESHOLD {
        gray.par_iter_mut()
            .zip(src.par_chunks_exact(channels))
            .for_each(|(out, px)| *out = luma(px[0], px[1], px[2]));
    } else {
        for (out, px) in gray.iter_mut().zip(src.chunks_exact(channels)) {
            *out = luma(px[0], px[1], px[2]);
        }
    }
    gray
}
