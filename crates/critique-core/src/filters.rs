//! Grayscale filter kernels and pixel statistics
//!
//! Pure functions over an intensity plane (`&[f32]`, 0-255 scale, row-major).
//! Convolutions replicate the border row/column and parallelize over rows
//! with rayon; none of them mutate their input.

use rayon::prelude::*;

/// 5x5 binomial Gaussian kernel (separable), weights summing to 1.
const GAUSS_5: [f32; 5] = [0.0625, 0.25, 0.375, 0.25, 0.0625];

/// Gradient magnitude at or above this is a strong edge.
const EDGE_HIGH: f32 = 150.0;
/// Gradient magnitude at or above this is a weak edge candidate.
const EDGE_LOW: f32 = 50.0;

/// Mean of an intensity plane.
pub fn mean(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Population standard deviation of an intensity plane.
pub fn std_dev(values: &[f32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0f64, 0.0f64), |(s, s2), &v| {
        let v = v as f64;
        (s + v, s2 + v * v)
    });
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0).sqrt()
}

/// Mean absolute difference between two equally-sized planes.
pub fn mean_abs_diff(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x - y).abs() as f64)
        .sum::<f64>()
        / a.len() as f64
}

/// Variance of the 4-neighbor Laplacian response.
///
/// Kernel is [[0,1,0],[1,-4,1],[0,1,0]] with replicated borders; the
/// variance of the response is the classic focus measure: sharp edges
/// produce large positive and negative excursions, defocus flattens them.
pub fn laplacian_variance(luma: &[f32], width: u32, height: u32) -> f64 {
    let w = width as usize;
    let h = height as usize;
    debug_assert_eq!(luma.len(), w * h);

    let (sum, sum_sq) = (0..h)
        .into_par_iter()
        .map(|y| {
            let up = y.saturating_sub(1);
            let down = (y + 1).min(h - 1);
            let mut s = 0.0f64;
            let mut s2 = 0.0f64;
            for x in 0..w {
                let left = x.saturating_sub(1);
                let right = (x + 1).min(w - 1);
                let v = (luma[up * w + x]
                    + luma[down * w + x]
                    + luma[y * w + left]
                    + luma[y * w + right]
                    - 4.0 * luma[y * w + x]) as f64;
                s += v;
                s2 += v * v;
            }
            (s, s2)
        })
        .reduce(|| (0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1));

    let n = (w * h) as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// 5x5 Gaussian blur (separable binomial kernel, replicated borders).
pub fn gaussian_blur_5x5(luma: &[f32], width: u32, height: u32) -> Vec<f32> {
    let w = width as usize;
    let h = height as usize;
    debug_assert_eq!(luma.len(), w * h);

    // Horizontal pass
    let mut horizontal = vec![0.0f32; w * h];
    horizontal
        .par_chunks_exact_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let src = &luma[y * w..(y + 1) * w];
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &weight) in GAUSS_5.iter().enumerate() {
                    let xi = (x + k).saturating_sub(2).min(w - 1);
                    acc += weight * src[xi];
                }
                *out = acc;
            }
        });

    // Vertical pass
    let mut blurred = vec![0.0f32; w * h];
    blurred
        .par_chunks_exact_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            for (k, &weight) in GAUSS_5.iter().enumerate() {
                let yi = (y + k).saturating_sub(2).min(h - 1);
                let src = &horizontal[yi * w..(yi + 1) * w];
                for (out, &v) in row.iter_mut().zip(src.iter()) {
                    *out += weight * v;
                }
            }
        });

    blurred
}

/// Fraction of pixels that lie on an edge, via a Canny-style detector:
/// Sobel gradients, non-maximum suppression along the gradient direction,
/// then a 50/150 double threshold where weak candidates survive only next
/// to a strong edge.
pub fn edge_density(luma: &[f32], width: u32, height: u32) -> f64 {
    let w = width as usize;
    let h = height as usize;
    debug_assert_eq!(luma.len(), w * h);

    if w < 3 || h < 3 {
        return 0.0;
    }

    // Sobel gradients (L1 magnitude) and quantized direction sector.
    // Border pixels carry zero magnitude.
    let mut magnitude = vec![0.0f32; w * h];
    let mut sector = vec![0u8; w * h];
    magnitude[w..w * (h - 1)]
        .par_chunks_exact_mut(w)
        .zip(sector[w..w * (h - 1)].par_chunks_exact_mut(w))
        .enumerate()
        .for_each(|(i, (mag_row, sec_row))| {
            let y = i + 1;
            for x in 1..w - 1 {
                let tl = luma[(y - 1) * w + x - 1];
                let tc = luma[(y - 1) * w + x];
                let tr = luma[(y - 1) * w + x + 1];
                let ml = luma[y * w + x - 1];
                let mr = luma[y * w + x + 1];
                let bl = luma[(y + 1) * w + x - 1];
                let bc = luma[(y + 1) * w + x];
                let br = luma[(y + 1) * w + x + 1];

                let gx = (tr + 2.0 * mr + br) - (tl + 2.0 * ml + bl);
                let gy = (bl + 2.0 * bc + br) - (tl + 2.0 * tc + tr);

                mag_row[x] = gx.abs() + gy.abs();
                sec_row[x] = direction_sector(gx, gy);
            }
        });

    // Non-maximum suppression: keep only local maxima along the gradient.
    let thinned: Vec<u8> = (0..h)
        .into_par_iter()
        .flat_map_iter(|y| {
            let magnitude = &magnitude;
            let sector = &sector;
            (0..w).map(move |x| {
                if y == 0 || y == h - 1 || x == 0 || x == w - 1 {
                    return 0u8;
                }
                let idx = y * w + x;
                let mag = magnitude[idx];
                if mag < EDGE_LOW {
                    return 0;
                }
                let (a, b) = match sector[idx] {
                    0 => (magnitude[idx - 1], magnitude[idx + 1]),
                    1 => (magnitude[(y - 1) * w + x + 1], magnitude[(y + 1) * w + x - 1]),
                    2 => (magnitude[(y - 1) * w + x], magnitude[(y + 1) * w + x]),
                    _ => (magnitude[(y - 1) * w + x - 1], magnitude[(y + 1) * w + x + 1]),
                };
                if mag < a || mag < b {
                    0
                } else if mag >= EDGE_HIGH {
                    2
                } else {
                    1
                }
            })
        })
        .collect();

    // Weak candidates count only when an 8-neighbor is strong.
    let edge_count: u64 = (1..h - 1)
        .into_par_iter()
        .map(|y| {
            let mut count = 0u64;
            for x in 1..w - 1 {
                match thinned[y * w + x] {
                    2 => count += 1,
                    1 => {
                        let strong_neighbor = (y - 1..=y + 1).any(|ny| {
                            (x - 1..=x + 1).any(|nx| thinned[ny * w + nx] == 2)
                        });
                        if strong_neighbor {
                            count += 1;
                        }
                    }
                    _ => {}
                }
            }
            count
        })
        .sum();

    edge_count as f64 / (w * h) as f64
}

/// Quantize a gradient vector into one of four sampling directions:
/// 0 = horizontal, 1 = 45 degrees, 2 = vertical, 3 = 135 degrees.
fn direction_sector(gx: f32, gy: f32) -> u8 {
    let angle = gy.atan2(gx).to_degrees();
    let angle = if angle < 0.0 { angle + 180.0 } else { angle };
    if !(22.5..157.5).contains(&angle) {
        0
    } else if angle < 67.5 {
        1
    } else if angle < 112.5 {
        2
    } else {
        3
    }
}
