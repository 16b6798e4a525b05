//! Image decoders for various formats
//!
//! Support for JPEG, PNG, TIFF, and camera RAW inputs. Every decoder
//! normalizes into the engine's 8-bit `Raster`; grayscale sources stay
//! single-channel so the color metrics can degrade gracefully.

use crate::error::{AssessError, Result};
use crate::raster::Raster;
use std::path::Path;

/// Non-RAW file extensions the decoders understand.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff"];

/// RAW extensions handled by the LibRaw bridge.
pub use critique_raw::RAW_EXTENSIONS;

/// Whether a file extension is decodable, RAW formats included.
pub fn is_supported_extension(ext: &str) -> bool {
    let lower = ext.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&lower.as_str()) || critique_raw::is_raw_extension(&lower)
}

/// Decode an image from a file path
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| AssessError::decode(path.display().to_string(), "no file extension"))?;

    match extension.as_str() {
        "tif" | "tiff" => decode_tiff(path),
        "png" => decode_png(path),
        "jpg" | "jpeg" => decode_jpeg(path),
        // RAW formats (via critique-raw/LibRaw)
        ext if critique_raw::is_raw_extension(ext) => decode_raw(path),
        other => Err(AssessError::decode(
            path.display().to_string(),
            format!("unsupported file format: {}", other),
        )),
    }
}

fn decode_err(path: &Path, message: impl std::fmt::Display) -> AssessError {
    AssessError::decode(path.display().to_string(), message.to_string())
}

// =============================================================================
// TIFF
// =============================================================================

/// Trait for TIFF sample types that can be quantized to the 0-255 scale
trait TiffValue: Copy {
    fn to_u8(self) -> u8;
}

impl TiffValue for u8 {
    #[inline]
    fn to_u8(self) -> u8 {
        self
    }
}

impl TiffValue for u16 {
    #[inline]
    fn to_u8(self) -> u8 {
        // 257 = 65535 / 255, so full scale maps to full scale
        (self / 257) as u8
    }
}

impl TiffValue for u32 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self / (u32::MAX / 255)) as u8
    }
}

impl TiffValue for u64 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self / (u64::MAX / 255)) as u8
    }
}

impl TiffValue for f32 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl TiffValue for f64 {
    #[inline]
    fn to_u8(self) -> u8 {
        (self.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

/// Decode a TIFF file
fn decode_tiff(path: &Path) -> Result<Raster> {
    use std::fs::File;
    use std::io::BufReader;
    use tiff::decoder::Limits;

    let file = File::open(path).map_err(|e| decode_err(path, e))?;

    // Generous limits for large scans and stitched panoramas
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1GB
    limits.ifd_value_size = 1024 * 1024 * 1024;
    limits.intermediate_buffer_size = 1024 * 1024 * 1024;

    let mut decoder = tiff::decoder::Decoder::new(BufReader::new(file))
        .map_err(|e| decode_err(path, e))?
        .with_limits(limits);

    let (width, height) = decoder.dimensions().map_err(|e| decode_err(path, e))?;
    let color_type = decoder.colortype().map_err(|e| decode_err(path, e))?;
    let image_data = decoder.read_image().map_err(|e| decode_err(path, e))?;

    let (data, channels) = match image_data {
        tiff::decoder::DecodingResult::U8(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::U16(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::U32(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::U64(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::F32(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::F64(buf) => {
            quantize_tiff_buffer(path, &buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::F16(buf) => {
            let f32_buf: Vec<f32> = buf.iter().map(|&v| v.to_f32()).collect();
            quantize_tiff_buffer(path, &f32_buf, width, height, color_type)?
        }
        tiff::decoder::DecodingResult::I8(_)
        | tiff::decoder::DecodingResult::I16(_)
        | tiff::decoder::DecodingResult::I32(_)
        | tiff::decoder::DecodingResult::I64(_) => {
            return Err(decode_err(path, "signed integer TIFF formats not supported"));
        }
    };

    Raster::new(width, height, channels, data)
}

/// Generic TIFF buffer quantizer - handles all numeric sample types
fn quantize_tiff_buffer<T: TiffValue>(
    path: &Path,
    buf: &[T],
    width: u32,
    height: u32,
    color_type: tiff::ColorType,
) -> Result<(Vec<u8>, u8)> {
    let channels: u32 = match color_type {
        tiff::ColorType::Gray(_) => 1,
        tiff::ColorType::RGB(_) => 3,
        tiff::ColorType::RGBA(_) => 4,
        other => {
            return Err(decode_err(
                path,
                format!("unsupported TIFF color type: {:?}", other),
            ))
        }
    };

    let expected_len = (width * height * channels) as usize;
    if buf.len() != expected_len {
        return Err(decode_err(
            path,
            format!(
                "TIFF buffer size mismatch: expected {}, got {}",
                expected_len,
                buf.len()
            ),
        ));
    }

    match channels {
        4 => {
            // RGBA: drop alpha channel
            let mut rgb = Vec::with_capacity((width * height * 3) as usize);
            for px in buf.chunks_exact(4) {
                rgb.push(px[0].to_u8());
                rgb.push(px[1].to_u8());
                rgb.push(px[2].to_u8());
            }
            Ok((rgb, 3))
        }
        _ => {
            // Grayscale stays single-channel; RGB converts directly
            let data: Vec<u8> = buf.iter().map(|&v| v.to_u8()).collect();
            Ok((data, channels as u8))
        }
    }
}

// =============================================================================
// PNG
// =============================================================================

/// Decode a PNG file
fn decode_png(path: &Path) -> Result<Raster> {
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path).map_err(|e| decode_err(path, e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder.read_info().map_err(|e| decode_err(path, e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| decode_err(path, "failed to determine PNG buffer size"))?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader.next_frame(&mut buf).map_err(|e| decode_err(path, e))?;
    let bytes = &buf[..frame_info.buffer_size()];

    let (data, channels) = match (color_type, bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => (bytes.to_vec(), 1),
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => (quantize_be16(bytes), 1),
        (png::ColorType::Rgb, png::BitDepth::Eight) => (bytes.to_vec(), 3),
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => (quantize_be16(bytes), 3),
        (png::ColorType::Rgba, png::BitDepth::Eight) => (drop_alpha8(bytes), 3),
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => (drop_alpha8(&quantize_be16(bytes)), 3),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            (bytes.chunks_exact(2).map(|px| px[0]).collect(), 1)
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Sixteen) => {
            (quantize_be16(bytes).chunks_exact(2).map(|px| px[0]).collect(), 1)
        }
        (png::ColorType::Indexed, _) => {
            return Err(decode_err(path, "indexed PNG not supported"));
        }
        (color, depth) => {
            return Err(decode_err(
                path,
                format!("unsupported PNG format: {:?} with bit depth {:?}", color, depth),
            ));
        }
    };

    Raster::new(width, height, channels, data)
}

/// Quantize big-endian 16-bit samples down to 8 bits
fn quantize_be16(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(2)
        .map(|pair| (u16::from_be_bytes([pair[0], pair[1]]) / 257) as u8)
        .collect()
}

/// Drop the alpha channel from an interleaved RGBA8 buffer
fn drop_alpha8(bytes: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(bytes.len() / 4 * 3);
    for px in bytes.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

// =============================================================================
// JPEG
// =============================================================================

/// Decode a JPEG file
fn decode_jpeg(path: &Path) -> Result<Raster> {
    use std::fs::File;
    use std::io::BufReader;

    let file = File::open(path).map_err(|e| decode_err(path, e))?;
    let mut decoder = jpeg_decoder::Decoder::new(BufReader::new(file));
    let pixels = decoder.decode().map_err(|e| decode_err(path, e))?;
    let info = decoder
        .info()
        .ok_or_else(|| decode_err(path, "missing JPEG header info"))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let (data, channels) = match info.pixel_format {
        jpeg_decoder::PixelFormat::L8 => (pixels, 1),
        jpeg_decoder::PixelFormat::RGB24 => (pixels, 3),
        jpeg_decoder::PixelFormat::L16 => (quantize_be16(&pixels), 1),
        jpeg_decoder::PixelFormat::CMYK32 => {
            return Err(decode_err(path, "CMYK JPEG not supported"));
        }
    };

    Raster::new(width, height, channels, data)
}

// =============================================================================
// RAW
// =============================================================================

/// Decode a RAW file using critique-raw (LibRaw wrapper)
fn decode_raw(path: &Path) -> Result<Raster> {
    let raw = critique_raw::decode_raw(path).map_err(|e| decode_err(path, e))?;
    Raster::from_rgb8(raw.width, raw.height, raw.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("JPEG"));
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("tiff"));
        assert!(is_supported_extension("cr2"));
        assert!(is_supported_extension("nef"));
        assert!(!is_supported_extension("txt"));
        assert!(!is_supported_extension("gif"));
    }

    #[test]
    fn test_decode_rejects_missing_extension() {
        let err = decode_image("/tmp/no_extension").unwrap_err();
        assert!(matches!(err, AssessError::Decode { .. }));
    }

    #[test]
    fn test_decode_rejects_unknown_extension() {
        let err = decode_image("/tmp/file.xyz").unwrap_err();
        assert!(matches!(err, AssessError::Decode { .. }));
    }

    #[test]
    fn test_quantize_be16_full_scale() {
        let bytes = [0xFF, 0xFF, 0x00, 0x00, 0x80, 0x80];
        let out = quantize_be16(&bytes);
        assert_eq!(out, vec![255, 0, 128]);
    }

    #[test]
    fn test_drop_alpha() {
        let rgba = [1u8, 2, 3, 255, 4, 5, 6, 0];
        assert_eq!(drop_alpha8(&rgba), vec![1, 2, 3, 4, 5, 6]);
    }
}
