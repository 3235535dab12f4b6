use crate::models::BitMatrix;

/// Percentage below the local mean a pixel must fall to count as dark
const ADAPTIVE_BIAS_PERCENT: u64 = 12;

/// Window side used when none is configured: an eighth of the short side, at least 15, odd
pub fn default_window(width: usize, height: usize) -> usize {
    (width.min(height) / 8).max(15) | 1
}

/// Locally adaptive threshold over a square window using an integral image.
/// Returns a BitMatrix where true = black, false = white
pub fn adaptive_binarize(gray: &[u8], width: usize, height: usize, window: usize) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);
    if width == 0 || height == 0 {
        return binary;
    }
    let half = (window | 1) / 2;
    let stride = width + 1;

    let mut integral = vec![0u64; stride * (height + 1)];
    for y in 0..height {
        let mut row_sum = 0u64;
        for x in 0..width {
            row_sum += gray[y * width + x] as u64;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
        }
    }

    for y in 0..height {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(height);
        for x in 0..width {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(width);
            let sum = integral[y1 * stride + x1] + integral[y0 * stride + x0]
                - integral[y0 * stride + x1]
                - integral[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            let value = gray[y * width + x] as u64;
            if value * count * 100 <= sum * (100 - ADAPTIVE_BIAS_PERCENT) {
                binary.set(x, y, true);
            }
        }
    }

    binary
}

/// Convert grayscale image to binary using Otsu's thresholding method
/// Returns a BitMatrix where true = black, false = white
pub fn otsu_binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    threshold_binarize(gray, width, height, calculate_otsu_threshold(gray))
}

/// Calculate Otsu's optimal threshold
fn calculate_otsu_threshold(gray: &[u8]) -> u8 {
    let mut histogram = [0u64; 256];
    for &pixel in gray {
        histogram[pixel as usize] += 1;
    }

    let total = gray.len() as f64;
    let total_sum: f64 = histogram
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut below_count = 0.0f64;
    let mut below_sum = 0.0f64;
    let mut max_variance = 0.0f64;
    let mut optimal_threshold = 128u8;

    // Threshold t splits pixels into [0, t) and [t, 255]
    for t in 1..=255usize {
        below_count += histogram[t - 1] as f64;
        below_sum += (t - 1) as f64 * histogram[t - 1] as f64;
        let above_count = total - below_count;
        if below_count == 0.0 || above_count == 0.0 {
            continue;
        }
        let mean_below = below_sum / below_count;
        let mean_above = (total_sum - below_sum) / above_count;
        let variance = below_count * above_count * (mean_below - mean_above).powi(2);
        if variance > max_variance {
            max_variance = variance;
            optimal_threshold = t as u8;
        }
    }

    optimal_threshold
}

/// Simple global threshold binarization
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if gray[y * width + x] < threshold {
                binary.set(x, y, true);
            }
        }
    }

    binary
}
