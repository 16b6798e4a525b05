//! The uniform in-memory image representation
//!
//! Every metric consumes a `Raster`: a tightly-packed 8-bit pixel grid with
//! one (grayscale) or three (RGB) channels. Decoders and the RAW bridge both
//! normalize into this shape, so the evaluators never see file formats.

use crate::error::{AssessError, Result};

/// Rec.601 luma weights, matching the grayscale conversion the thresholds
/// were calibrated against.
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Decoded pixel grid (rows x columns x channels), samples 0-255.
///
/// Immutable once constructed; evaluators only ever borrow it.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl Raster {
    /// Build a raster from an interleaved buffer with 1 or 3 channels.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(AssessError::invalid_input(format!(
                "raster dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(AssessError::invalid_input(format!(
                "raster must have 1 or 3 channels, got {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(AssessError::invalid_input(format!(
                "raster buffer size mismatch: expected {}, got {}",
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Build an RGB raster from an interleaved RGBRGB... buffer.
    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 3, data)
    }

    /// Build a single-channel raster from a grayscale buffer.
    pub fn from_gray8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 1, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn total_pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether channel-based metrics (color balance, saturation) apply.
    pub fn is_color(&self) -> bool {
        self.channels == 3
    }

    /// Grayscale intensity plane on the 0-255 scale.
    ///
    /// Single-channel rasters convert losslessly; RGB uses Rec.601 weights.
    pub fn luma(&self) -> Vec<f32> {
        match self.channels {
            1 => self.data.iter().map(|&v| v as f32).collect(),
            _ => self
                .data
                .chunks_exact(3)
                .map(|px| LUMA_R * px[0] as f32 + LUMA_G * px[1] as f32 + LUMA_B * px[2] as f32)
                .collect(),
        }
    }

    /// Per-channel means (R, G, B). `None` for grayscale rasters.
    pub fn channel_means(&self) -> Option<[f64; 3]> {
        if self.channels != 3 {
            return None;
        }
        let mut sums = [0.0f64; 3];
        for px in self.data.chunks_exact(3) {
            sums[0] += px[0] as f64;
            sums[1] += px[1] as f64;
            sums[2] += px[2] as f64;
        }
        let n = self.total_pixels() as f64;
        Some([sums[0] / n, sums[1] / n, sums[2] / n])
    }

    /// HSV saturation plane on the 0-255 scale. `None` for grayscale rasters.
    ///
    /// S = (max - min) / max * 255, with S = 0 for black pixels, matching the
    /// common byte-scale HSV convention.
    pub fn saturation_channel(&self) -> Option<Vec<f32>> {
        if self.channels != 3 {
            return None;
        }
        let sat = self
            .data
            .chunks_exact(3)
            .map(|px| {
                let max = px[0].max(px[1]).max(px[2]) as f32;
                let min = px[0].min(px[1]).min(px[2]) as f32;
                if max == 0.0 {
                    0.0
                } else {
                    (max - min) / max * 255.0
                }
            })
            .collect();
        Some(sat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_raster() {
        assert!(Raster::from_rgb8(0, 0, vec![]).is_err());
        assert!(Raster::from_gray8(4, 0, vec![]).is_err());
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let err = Raster::from_rgb8(2, 2, vec![0u8; 11]).unwrap_err();
        assert!(matches!(err, AssessError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_bad_channel_count() {
        assert!(Raster::new(2, 2, 4, vec![0u8; 16]).is_err());
    }

    #[test]
    fn test_luma_gray_passthrough() {
        let r = Raster::from_gray8(2, 1, vec![10, 200]).unwrap();
        assert_eq!(r.luma(), vec![10.0, 200.0]);
    }

    #[test]
    fn test_luma_weights_sum_to_white() {
        let r = Raster::from_rgb8(1, 1, vec![255, 255, 255]).unwrap();
        let luma = r.luma();
        assert!((luma[0] - 255.0).abs() < 0.1);
    }

    #[test]
    fn test_channel_means() {
        let r = Raster::from_rgb8(2, 1, vec![10, 20, 30, 30, 40, 50]).unwrap();
        let means = r.channel_means().unwrap();
        assert_eq!(means, [20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_channel_means_not_applicable_for_gray() {
        let r = Raster::from_gray8(2, 1, vec![1, 2]).unwrap();
        assert!(r.channel_means().is_none());
        assert!(r.saturation_channel().is_none());
    }

    #[test]
    fn test_saturation_of_pure_red() {
        let r = Raster::from_rgb8(1, 1, vec![255, 0, 0]).unwrap();
        let sat = r.saturation_channel().unwrap();
        assert!((sat[0] - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_saturation_of_gray_pixel_is_zero() {
        let r = Raster::from_rgb8(1, 1, vec![130, 130, 130]).unwrap();
        assert_eq!(r.saturation_channel().unwrap()[0], 0.0);
    }

    #[test]
    fn test_saturation_of_black_is_zero() {
        let r = Raster::from_rgb8(1, 1, vec![0, 0, 0]).unwrap();
        assert_eq!(r.saturation_channel().unwrap()[0], 0.0);
    }
}
