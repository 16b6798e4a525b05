//! RAW file decoding using LibRaw
//!
//! This crate isolates the rsraw/rsraw-sys dependencies so the assessment
//! engine does not rebuild LibRaw bindings when the scoring code changes.
//!
//! Output contract: camera-white-balanced, full-resolution, 8-bit RGB with
//! no automatic brightness adjustment, so exposure metrics see the capture
//! as it was recorded.

use std::path::Path;

/// Decoded RAW image data
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGB samples, 0-255
    pub data: Vec<u8>,

    /// Number of channels (always 3 for RGB output)
    pub channels: u8,
}

/// List of supported RAW file extensions
pub const RAW_EXTENSIONS: &[&str] = &[
    "arw", "cr2", "cr3", "nef", "dng", "raf", "orf", "rw2", "pef", "srw", "x3f", "3fr", "fff",
    "iiq", "k25", "kdc", "mef", "mos", "mrw", "nrw", "ptx", "r3d", "raw", "rwl", "rwz", "sr2",
    "srf",
];

/// Check if a file extension is a supported RAW format
pub fn is_raw_extension(ext: &str) -> bool {
    RAW_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

/// Decode a RAW file using rsraw (LibRaw wrapper)
pub fn decode_raw<P: AsRef<Path>>(path: P) -> Result<DecodedRaw, String> {
    use rsraw::{RawImage, BIT_DEPTH_8};

    // Read file into buffer
    let data =
        std::fs::read(path.as_ref()).map_err(|e| format!("Failed to read RAW file: {}", e))?;

    // Open RAW file
    let mut raw = RawImage::open(&data).map_err(|e| format!("Failed to open RAW file: {:?}", e))?;

    // Configure LibRaw processing parameters via low-level access
    // SAFETY: rsraw provides safe AsMut access to libraw_data_t
    {
        let libraw_data: &mut rsraw_sys::libraw_data_t = raw.as_mut();
        // AHD demosaic: 0 = linear, 1 = VNG, 2 = PPG, 3 = AHD
        libraw_data.params.user_qual = 3;
        // Preserve exposure as captured; brightness is a metric, not a correction
        libraw_data.params.no_auto_bright = 1;
        // Use camera white balance if available
        libraw_data.params.use_camera_wb = 1;
    }

    // Unpack the RAW data (modifies raw in place)
    raw.unpack()
        .map_err(|e| format!("Failed to unpack RAW data: {:?}", e))?;

    // Process to 8-bit output; the engine's raster model is 0-255
    let processed = raw
        .process::<BIT_DEPTH_8>()
        .map_err(|e| format!("Failed to process RAW: {:?}", e))?;

    let width = processed.width();
    let height = processed.height();
    let channels = processed.colors() as u8;

    // ProcessedImage<BIT_DEPTH_8> derefs to &[u8]
    let pixel_data: &[u8] = &processed;
    let data = pack_rgb8(pixel_data, width, height, channels)?;

    Ok(DecodedRaw {
        width,
        height,
        data,
        channels: 3,
    })
}

/// Normalize processed RAW samples to a tightly-packed RGB8 buffer.
/// Uses parallel processing via rayon for large images
fn pack_rgb8(pixel_data: &[u8], width: u32, height: u32, channels: u8) -> Result<Vec<u8>, String> {
    use rayon::prelude::*;

    let pixel_count = (width * height) as usize;
    let expected_len = pixel_count * channels as usize;

    if pixel_data.len() < expected_len {
        return Err(format!(
            "RAW buffer size mismatch: expected at least {}, got {}",
            expected_len,
            pixel_data.len()
        ));
    }

    let rgb_data = if channels == 3 {
        pixel_data[..expected_len].to_vec()
    } else if channels == 4 {
        // RGBA data: drop alpha channel
        pixel_data[..pixel_count * 4]
            .par_chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect()
    } else if channels == 1 {
        // Grayscale sensor: expand to RGB
        pixel_data[..pixel_count]
            .par_iter()
            .flat_map(|&gray| [gray, gray, gray])
            .collect()
    } else {
        return Err(format!("Unexpected RAW channel count: {}", channels));
    };

    Ok(rgb_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_raw_extension() {
        assert!(is_raw_extension("cr2"));
        assert!(is_raw_extension("CR2"));
        assert!(is_raw_extension("nef"));
        assert!(is_raw_extension("arw"));
        assert!(is_raw_extension("dng"));
        assert!(!is_raw_extension("tiff"));
        assert!(!is_raw_extension("png"));
        assert!(!is_raw_extension("jpg"));
    }

    #[test]
    fn test_pack_rgb8_drops_alpha() {
        let rgba = vec![10u8, 20, 30, 255, 40, 50, 60, 255];
        let rgb = pack_rgb8(&rgba, 2, 1, 4).unwrap();
        assert_eq!(rgb, vec![10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_pack_rgb8_expands_gray() {
        let gray = vec![7u8, 9];
        let rgb = pack_rgb8(&gray, 2, 1, 1).unwrap();
        assert_eq!(rgb, vec![7, 7, 7, 9, 9, 9]);
    }

    #[test]
    fn test_pack_rgb8_rejects_short_buffer() {
        let short = vec![0u8; 5];
        assert!(pack_rgb8(&short, 2, 1, 3).is_err());
    }
}
