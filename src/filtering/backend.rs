//! Filter backend trait and shared types.
//!
//! The [`FilterBackend`] trait is the seam between tintbox's session logic
//! and the library that does the actual pixel work. The engine never touches
//! pixels; it hands a [`RawImage`] plus mapped parameter values to a backend
//! and stores whatever comes back.
//!
//! The production implementation is
//! [`RasterBackend`](super::raster::RasterBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::catalog::FilterKind;
use super::mapping::ParameterValues;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// An owned RGBA8 pixel buffer with its dimensions.
///
/// This is the only image currency the core understands. Shells produce one
/// when the user picks a picture, backends produce one per applied filter,
/// and stores consume one on save. The buffer is opaque here — nothing in
/// the core interprets pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Build an image from an RGBA8 buffer.
    ///
    /// Returns `None` when the buffer length does not match
    /// `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the image, returning its buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }
}

/// Trait for image processing backends.
///
/// `apply` transforms `source` with `filter` using the concrete parameter
/// values the [mapper](super::mapping::map_parameters) produced. A backend
/// that cannot produce usable output (degenerate geometry, unsupported
/// filter) must fail with [`BackendError::ProcessingFailed`] rather than
/// returning the input unchanged — callers rely on an explicit signal.
///
/// `Sync` so one backend instance can serve parallel one-shot runs.
pub trait FilterBackend: Sync {
    fn apply(
        &self,
        source: &RawImage,
        filter: FilterKind,
        params: &ParameterValues,
    ) -> Result<RawImage, BackendError>;
}

/// A shared reference to a backend is itself a backend.
impl<B: FilterBackend + ?Sized> FilterBackend for &B {
    fn apply(
        &self,
        source: &RawImage,
        filter: FilterKind,
        params: &ParameterValues,
    ) -> Result<RawImage, BackendError> {
        (**self).apply(source, filter, params)
    }
}
