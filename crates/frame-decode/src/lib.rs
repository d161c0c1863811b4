//! Frame Decoding
//!
//! Turns encoded still frames (JPEG/PNG bytes from a webcam client) into
//! RGB `VideoFrame`s at a fixed processing resolution:
//! - Format sniffing and decode via the `image` crate
//! - Downscale for faster landmark detection
//! - Scale factors back to the original resolution
//! - Mean brightness for lighting feedback

pub mod frame;

pub use frame::{decode, DecodedFrame, VideoFrame};

use thiserror::Error;

/// Default processing width (pixels)
pub const PROCESSING_WIDTH: u32 = 320;

/// Default processing height (pixels)
pub const PROCESSING_HEIGHT: u32 = 240;

/// Frame decoding errors
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("No image data provided")]
    Empty,

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}
