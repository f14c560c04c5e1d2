//! Production filter backend built on the `image` crate.
//!
//! The heavy pixel work is delegated to `image` — tintbox composes its
//! primitives rather than reimplementing filter math.
//!
//! ## Crate mapping
//!
//! | Filter | image-crate realization |
//! |---|---|
//! | Sepia Tone | per-pixel blend toward the classic sepia weights |
//! | Unsharp Mask | `imageops::unsharpen`, sigma rides the intensity |
//! | Crystallize | mosaic: Triangle downscale + Nearest upscale |
//! | Pixellate | mosaic: Nearest downscale + Nearest upscale |
//! | Gaussian Blur | `imageops::fast_blur`, sigma derived from radius |
//! | Edges | grayscale + `imageops::filter3x3` Laplacian |
//! | Vignette | radial falloff blend toward black |
//!
//! Decode and encode (used by the CLI shell and the disk store) also live
//! here, so the rest of the crate never sees an `image` type.

use super::backend::{BackendError, FilterBackend, RawImage};
use super::catalog::{FilterKind, ParameterKind};
use super::mapping::ParameterValues;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use std::path::Path;

/// Filter backend delegating to the `image` crate.
///
/// Output dimensions always equal input dimensions. Degenerate geometry
/// (a mosaic cell that rounds to zero pixels) is an explicit
/// [`BackendError::ProcessingFailed`], never a silent no-op.
pub struct RasterBackend;

impl RasterBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterBackend for RasterBackend {
    fn apply(
        &self,
        source: &RawImage,
        filter: FilterKind,
        params: &ParameterValues,
    ) -> Result<RawImage, BackendError> {
        let rgba = to_buffer(source)?;
        let out = match filter {
            FilterKind::SepiaTone => sepia(&rgba, require(params, ParameterKind::Intensity)?),
            FilterKind::UnsharpMask => {
                unsharp_mask(&rgba, require(params, ParameterKind::Intensity)?)
            }
            FilterKind::Crystallize => {
                mosaic(&rgba, require(params, ParameterKind::Scale)?, FilterType::Triangle)?
            }
            FilterKind::Pixellate => {
                mosaic(&rgba, require(params, ParameterKind::Scale)?, FilterType::Nearest)?
            }
            FilterKind::GaussianBlur => {
                gaussian_blur(&rgba, require(params, ParameterKind::Radius)?)
            }
            FilterKind::Edges => edges(&rgba, require(params, ParameterKind::Scale)?),
            FilterKind::Vignette => vignette(&rgba, require(params, ParameterKind::Intensity)?),
        };
        from_buffer(out)
    }
}

/// Fetch a parameter value the catalog promises for this filter.
///
/// A miss means the caller bypassed the mapper — surfaced as a processing
/// failure rather than a panic.
fn require(params: &ParameterValues, kind: ParameterKind) -> Result<f32, BackendError> {
    params
        .get(kind)
        .ok_or_else(|| BackendError::ProcessingFailed(format!("missing {kind} parameter")))
}

fn to_buffer(source: &RawImage) -> Result<RgbaImage, BackendError> {
    RgbaImage::from_raw(source.width(), source.height(), source.pixels().to_vec()).ok_or_else(
        || BackendError::ProcessingFailed("source buffer does not match its dimensions".into()),
    )
}

fn from_buffer(buffer: RgbaImage) -> Result<RawImage, BackendError> {
    let (width, height) = buffer.dimensions();
    RawImage::from_rgba8(width, height, buffer.into_raw())
        .ok_or_else(|| BackendError::ProcessingFailed("backend produced an empty image".into()))
}

fn lerp(from: u8, to: f32, t: f32) -> u8 {
    (from as f32 + (to - from as f32) * t).round().clamp(0.0, 255.0) as u8
}

/// Blend each pixel toward the classic sepia weighting by `intensity`.
fn sepia(img: &RgbaImage, intensity: f32) -> RgbaImage {
    let mut out = img.clone();
    for Rgba([r, g, b, _]) in out.pixels_mut() {
        let (rf, gf, bf) = (*r as f32, *g as f32, *b as f32);
        let sr = (0.393 * rf + 0.769 * gf + 0.189 * bf).min(255.0);
        let sg = (0.349 * rf + 0.686 * gf + 0.168 * bf).min(255.0);
        let sb = (0.272 * rf + 0.534 * gf + 0.131 * bf).min(255.0);
        *r = lerp(*r, sr, intensity);
        *g = lerp(*g, sg, intensity);
        *b = lerp(*b, sb, intensity);
    }
    out
}

fn unsharp_mask(img: &RgbaImage, intensity: f32) -> RgbaImage {
    // Sigma spans 0.5 (light, the thumbnail-grade setting) to 3.0 at full
    // strength. Threshold 0 sharpens every pixel.
    let sigma = 0.5 + 2.5 * intensity;
    imageops::unsharpen(img, sigma, 0)
}

/// Downscale to one pixel per cell, then blow back up with Nearest.
///
/// The cell edge in pixels is the rounded scale value; a cell that rounds
/// to zero is degenerate geometry and fails explicitly.
fn mosaic(img: &RgbaImage, scale: f32, down: FilterType) -> Result<RgbaImage, BackendError> {
    let cell = scale.round() as u32;
    if cell == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "mosaic cell size rounds to zero (scale {scale})"
        )));
    }
    let (width, height) = img.dimensions();
    let cells_w = (width / cell).max(1);
    let cells_h = (height / cell).max(1);
    let small = imageops::resize(img, cells_w, cells_h, down);
    Ok(imageops::resize(&small, width, height, FilterType::Nearest))
}

fn gaussian_blur(img: &RgbaImage, radius: f32) -> RgbaImage {
    // Conventional radius ≈ 3σ. Radius 0 is the identity.
    if radius <= 0.0 {
        return img.clone();
    }
    imageops::fast_blur(img, radius / 3.0)
}

/// Laplacian edge response on the luma channel, gain riding the scale.
fn edges(img: &RgbaImage, scale: f32) -> RgbaImage {
    let gain = scale / 2.0;
    #[rustfmt::skip]
    let kernel = [
        -gain, -gain, -gain,
        -gain, 8.0 * gain, -gain,
        -gain, -gain, -gain,
    ];
    let gray = imageops::grayscale(img);
    let response = imageops::filter3x3(&gray, &kernel);

    let mut out = RgbaImage::new(img.width(), img.height());
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let v = response.get_pixel(x, y).0[0];
        *pixel = Rgba([v, v, v, 255]);
    }
    out
}

/// Darken toward the frame corners; pixels inside the inner radius are
/// untouched, the falloff eases out to the corners.
fn vignette(img: &RgbaImage, intensity: f32) -> RgbaImage {
    const INNER: f32 = 0.3;

    let (width, height) = img.dimensions();
    let cx = (width.saturating_sub(1)) as f32 / 2.0;
    let cy = (height.saturating_sub(1)) as f32 / 2.0;
    let half_diagonal = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut out = img.clone();
    for (x, y, Rgba([r, g, b, _])) in out.enumerate_pixels_mut() {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let distance = (dx * dx + dy * dy).sqrt() / half_diagonal;
        let t = ((distance - INNER) / (1.0 - INNER)).clamp(0.0, 1.0);
        let falloff = t * t * (3.0 - 2.0 * t);
        let factor = 1.0 - intensity * falloff;
        *r = (*r as f32 * factor).round() as u8;
        *g = (*g as f32 * factor).round() as u8;
        *b = (*b as f32 * factor).round() as u8;
    }
    out
}

/// Load and decode an image file into the core's RGBA8 currency.
pub fn load_raw(path: &Path) -> Result<RawImage, BackendError> {
    let decoded = ImageReader::open(path)
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
    let rgba = decoded.into_rgba8();
    from_buffer(rgba)
}

/// Encode an image to `path`, choosing the format from the extension.
///
/// JPEG cannot carry an alpha channel, so the buffer is flattened to RGB
/// for that format.
pub fn save_raw(image: &RawImage, path: &Path) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let format = match ext.as_str() {
        "png" => ImageFormat::Png,
        "jpg" | "jpeg" => ImageFormat::Jpeg,
        "webp" => ImageFormat::WebP,
        "tif" | "tiff" => ImageFormat::Tiff,
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {other:?}"
            )));
        }
    };

    let buffer = to_buffer(image)?;
    let dynamic = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(buffer).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(buffer)
    };
    dynamic.save_with_format(path, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::mapping::{Strength, map_parameters};

    /// An 8x8 horizontal gradient, fully opaque.
    fn gradient() -> RawImage {
        let mut pixels = Vec::with_capacity(8 * 8 * 4);
        for y in 0..8u32 {
            for x in 0..8u32 {
                let v = (x * 32 + y) as u8;
                pixels.extend_from_slice(&[v, v.wrapping_add(10), v.wrapping_add(20), 255]);
            }
        }
        RawImage::from_rgba8(8, 8, pixels).unwrap()
    }

    fn white(width: u32, height: u32) -> RawImage {
        RawImage::from_rgba8(width, height, vec![255; (width * height * 4) as usize]).unwrap()
    }

    fn pixel(img: &RawImage, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * img.width() + x) * 4) as usize;
        img.pixels()[idx..idx + 4].try_into().unwrap()
    }

    #[test]
    fn every_filter_preserves_dimensions() {
        let backend = RasterBackend::new();
        let source = gradient();
        for filter in FilterKind::ALL {
            let params = map_parameters(filter, Strength::new(0.5));
            let out = backend.apply(&source, filter, &params).unwrap();
            assert_eq!((out.width(), out.height()), (8, 8), "{filter}");
        }
    }

    #[test]
    fn sepia_at_zero_intensity_is_identity() {
        let backend = RasterBackend::new();
        let source = gradient();
        let params = map_parameters(FilterKind::SepiaTone, Strength::new(0.0));
        let out = backend.apply(&source, FilterKind::SepiaTone, &params).unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn sepia_at_full_intensity_tones_the_image() {
        let backend = RasterBackend::new();
        let source = white(4, 4);
        let params = map_parameters(FilterKind::SepiaTone, Strength::new(1.0));
        let out = backend.apply(&source, FilterKind::SepiaTone, &params).unwrap();

        // White saturates the red and green weights; blue lands lower.
        let [r, g, b, a] = pixel(&out, 0, 0);
        assert_eq!(a, 255);
        assert_eq!((r, g), (255, 255));
        assert!(b < g, "expected warm tone, got {:?}", [r, g, b]);
    }

    #[test]
    fn blur_at_zero_radius_is_identity() {
        let backend = RasterBackend::new();
        let source = gradient();
        let params = map_parameters(FilterKind::GaussianBlur, Strength::new(0.0));
        let out = backend
            .apply(&source, FilterKind::GaussianBlur, &params)
            .unwrap();
        assert_eq!(out, source);
    }

    #[test]
    fn pixellate_produces_uniform_cells() {
        let backend = RasterBackend::new();
        let source = gradient();
        // Strength 0.4 → scale 4 → 4px cells on an 8x8 image.
        let params = map_parameters(FilterKind::Pixellate, Strength::new(0.4));
        let out = backend.apply(&source, FilterKind::Pixellate, &params).unwrap();

        for (bx, by) in [(0, 0), (4, 0), (0, 4), (4, 4)] {
            let anchor = pixel(&out, bx, by);
            for dx in 0..4 {
                for dy in 0..4 {
                    assert_eq!(pixel(&out, bx + dx, by + dy), anchor, "cell at ({bx},{by})");
                }
            }
        }
    }

    #[test]
    fn mosaic_rejects_zero_cell_size() {
        let backend = RasterBackend::new();
        let source = gradient();
        for filter in [FilterKind::Pixellate, FilterKind::Crystallize] {
            // Strength 0.0 → scale 0 → degenerate cell.
            let params = map_parameters(filter, Strength::new(0.0));
            let err = backend.apply(&source, filter, &params).unwrap_err();
            assert!(matches!(err, BackendError::ProcessingFailed(_)), "{filter}");
        }
    }

    #[test]
    fn edges_on_flat_image_are_black() {
        let backend = RasterBackend::new();
        let source = white(6, 6);
        let params = map_parameters(FilterKind::Edges, Strength::new(0.8));
        let out = backend.apply(&source, FilterKind::Edges, &params).unwrap();

        // Uniform luma has zero Laplacian response everywhere.
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(pixel(&out, x, y), [0, 0, 0, 255]);
            }
        }
    }

    #[test]
    fn vignette_darkens_corners_not_center() {
        let backend = RasterBackend::new();
        let source = white(9, 9);
        let params = map_parameters(FilterKind::Vignette, Strength::new(1.0));
        let out = backend.apply(&source, FilterKind::Vignette, &params).unwrap();

        assert_eq!(pixel(&out, 4, 4), [255, 255, 255, 255]);
        assert_eq!(pixel(&out, 0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn applying_twice_gives_identical_output() {
        let backend = RasterBackend::new();
        let source = gradient();
        for filter in FilterKind::ALL {
            let params = map_parameters(filter, Strength::new(0.7));
            let once = backend.apply(&source, filter, &params).unwrap();
            let twice = backend.apply(&source, filter, &params).unwrap();
            assert_eq!(once, twice, "{filter} is not deterministic");
        }
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = save_raw(&white(2, 2), &tmp.path().join("out.bmp")).unwrap_err();
        assert!(matches!(err, BackendError::ProcessingFailed(_)));
    }

    #[test]
    fn save_and_load_round_trip_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.png");
        let source = gradient();

        save_raw(&source, &path).unwrap();
        let loaded = load_raw(&path).unwrap();
        // PNG is lossless: the buffer survives byte-for-byte.
        assert_eq!(loaded, source);
    }

    #[test]
    fn load_nonexistent_file_errors() {
        let err = load_raw(Path::new("/nonexistent/photo.png")).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
