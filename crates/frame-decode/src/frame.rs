//! Video frame types and decoding

use image::imageops::{self, FilterType};
use tracing::debug;

use crate::FrameError;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self { data, width, height }
    }

    /// Convert to grayscale
    pub fn to_grayscale(&self) -> Vec<u8> {
        let mut gray = Vec::with_capacity((self.width * self.height) as usize);
        for pixel in self.data.chunks_exact(3) {
            // Luminance formula: 0.299*R + 0.587*G + 0.114*B
            let y = (pixel[0] as f32 * 0.299
                   + pixel[1] as f32 * 0.587
                   + pixel[2] as f32 * 0.114) as u8;
            gray.push(y);
        }
        gray
    }

    /// Mean grayscale brightness (0-255)
    pub fn mean_brightness(&self) -> f64 {
        let gray = self.to_grayscale();
        if gray.is_empty() {
            return 0.0;
        }
        let sum: u64 = gray.iter().map(|&v| v as u64).sum();
        sum as f64 / gray.len() as f64
    }
}

/// Frame downscaled for processing, with its source dimensions
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Frame at processing resolution
    pub frame: VideoFrame,
    /// Width of the encoded image
    pub original_width: u32,
    /// Height of the encoded image
    pub original_height: u32,
}

impl DecodedFrame {
    /// Horizontal factor from processing to original coordinates
    pub fn scale_x(&self) -> f64 {
        self.original_width as f64 / self.frame.width as f64
    }

    /// Vertical factor from processing to original coordinates
    pub fn scale_y(&self) -> f64 {
        self.original_height as f64 / self.frame.height as f64
    }
}

/// Decode an encoded image and resize it to `width` x `height`
pub fn decode(bytes: &[u8], width: u32, height: u32) -> Result<DecodedFrame, FrameError> {
    if bytes.is_empty() {
        return Err(FrameError::Empty);
    }
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimensions { width, height });
    }

    let img = image::load_from_memory(bytes)?;
    let rgb = img.to_rgb8();
    let (original_width, original_height) = rgb.dimensions();
    if original_width == 0 || original_height == 0 {
        return Err(FrameError::InvalidDimensions {
            width: original_width,
            height: original_height,
        });
    }

    let resized = imageops::resize(&rgb, width, height, FilterType::Triangle);
    debug!(
        "Decoded {}x{} frame, resized to {}x{}",
        original_width, original_height, width, height
    );

    Ok(DecodedFrame {
        frame: VideoFrame::new(resized.into_raw(), width, height),
        original_width,
        original_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(width: u32, height: u32, value: u8) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([value, value, value]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_and_resize() {
        let bytes = encode_png(640, 480, 128);
        let decoded = decode(&bytes, 320, 240).unwrap();

        assert_eq!(decoded.original_width, 640);
        assert_eq!(decoded.original_height, 480);
        assert_eq!(decoded.frame.width, 320);
        assert_eq!(decoded.frame.height, 240);
        assert_eq!(decoded.frame.data.len(), 320 * 240 * 3);
        assert!((decoded.scale_x() - 2.0).abs() < 1e-9);
        assert!((decoded.scale_y() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(decode(&[], 320, 240), Err(FrameError::Empty)));
    }

    #[test]
    fn test_garbage_input() {
        let result = decode(b"definitely not an image", 320, 240);
        assert!(matches!(result, Err(FrameError::Decode(_))));
    }

    #[test]
    fn test_zero_target_dimensions() {
        let bytes = encode_png(8, 8, 0);
        assert!(matches!(
            decode(&bytes, 0, 240),
            Err(FrameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_brightness() {
        let dark = decode(&encode_png(16, 16, 10), 8, 8).unwrap();
        let bright = decode(&encode_png(16, 16, 250), 8, 8).unwrap();

        assert!(dark.frame.mean_brightness() < 50.0);
        assert!(bright.frame.mean_brightness() > 200.0);
    }

    #[test]
    fn test_grayscale_luminance() {
        let frame = VideoFrame::new(vec![255, 0, 0, 0, 255, 0], 2, 1);
        let gray = frame.to_grayscale();
        assert_eq!(gray, vec![76, 149]);
    }
}
