//! Logo configuration, loading and rounded-corner processing.

use crate::error::QrError;
use image::{Rgb, RgbaImage};
use std::path::PathBuf;

/// Appearance of the embedded logo.
///
/// Immutable once constructed. The corner radius is never configured here:
/// it is always derived as a tenth of the logo edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoConfig {
    /// Stroke width of the outer border, in pixels at the default 400px
    /// canvas edge; the compositor scales it down proportionally on
    /// smaller canvases.
    pub border_width: u32,
    /// Color of the outer border.
    pub border_color: Rgb<u8>,
    /// The logo edge is the canvas edge divided by this fraction. Must be
    /// at least 2 so the logo never exceeds half the canvas; keeping it at
    /// the default of 5 is recommended so the overlay stays well inside
    /// what error correction can absorb.
    pub logo_fraction: u32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            border_width: 5,
            border_color: Rgb([255, 255, 255]),
            logo_fraction: 5,
        }
    }
}

impl LogoConfig {
    /// Builds a config with an explicit border color and logo fraction,
    /// keeping the default border width.
    pub fn new(border_color: Rgb<u8>, logo_fraction: u32) -> Self {
        Self { border_color, logo_fraction, ..Self::default() }
    }

    /// Checks the invariants that must hold before any drawing starts.
    pub fn validate(&self) -> Result<(), QrError> {
        if self.logo_fraction < 2 {
            return Err(QrError::InvalidArgument(format!(
                "logo fraction must be at least 2, got {}; the logo may cover at most half the canvas",
                self.logo_fraction
            )));
        }
        Ok(())
    }
}

/// Where the logo raster comes from.
///
/// Replaces the file/stream overload family of a typical API with one sum
/// type; every variant ends up as an in-memory RGBA buffer.
#[derive(Debug, Clone)]
pub enum LogoSource {
    /// Read and decode an image file.
    Path(PathBuf),
    /// Decode in-memory encoded bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// Use an already decoded raster as-is.
    Image(RgbaImage),
}

impl LogoSource {
    /// Loads the logo into an RGBA buffer.
    ///
    /// A missing file is an [`QrError::InvalidArgument`]; bytes that fail
    /// to decode are a [`QrError::Composition`]. File handles are closed
    /// when this returns, on success and failure alike.
    pub fn load(&self) -> Result<RgbaImage, QrError> {
        match self {
            LogoSource::Path(path) => {
                if !path.exists() {
                    return Err(QrError::InvalidArgument(format!(
                        "logo file does not exist: {}",
                        path.display()
                    )));
                }
                let img = image::open(path).map_err(|err| {
                    QrError::Composition(format!(
                        "cannot read logo file {}: {err}",
                        path.display()
                    ))
                })?;
                Ok(img.to_rgba8())
            }
            LogoSource::Bytes(bytes) => {
                let img = image::load_from_memory(bytes).map_err(|err| {
                    QrError::Composition(format!("cannot decode logo bytes: {err}"))
                })?;
                Ok(img.to_rgba8())
            }
            LogoSource::Image(img) => Ok(img.clone()),
        }
    }
}

/// Clips a logo to a rounded rectangle covering its full extent, corner
/// radius `width / 10`.
///
/// Returns a new image of identical dimensions: pixels outside the rounded
/// region become fully transparent, pixels inside keep their color and
/// alpha, and boundary pixels get coverage-based partial alpha (signed
/// distance to the rounded boundary, half-pixel linear ramp). The input is
/// not mutated.
///
/// # Errors
///
/// [`QrError::InvalidArgument`] if either dimension is zero.
pub fn clip_round(logo: &RgbaImage) -> Result<RgbaImage, QrError> {
    let (w, h) = logo.dimensions();
    if w == 0 || h == 0 {
        return Err(QrError::InvalidArgument(
            "logo image must have non-zero width and height".into(),
        ));
    }
    let radius = (w / 10) as f32;

    let mut out = logo.clone();
    for (px, py, pixel) in out.enumerate_pixels_mut() {
        let d = rounded_rect_distance(
            px as f32 + 0.5,
            py as f32 + 0.5,
            0.0,
            0.0,
            w as f32,
            h as f32,
            radius,
        );
        let coverage = fill_coverage(d);
        if coverage < 1.0 {
            pixel.0[3] = (pixel.0[3] as f32 * coverage).round() as u8;
        }
    }
    Ok(out)
}

/// Signed distance from point `(px, py)` to the boundary of the rounded
/// rectangle at `(x, y)` of size `(w, h)` with corner radius `r`.
/// Negative inside, positive outside.
pub(crate) fn rounded_rect_distance(
    px: f32,
    py: f32,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    r: f32,
) -> f32 {
    let cx = x + w / 2.0;
    let cy = y + h / 2.0;
    let qx = (px - cx).abs() - (w / 2.0 - r);
    let qy = (py - cy).abs() - (h / 2.0 - r);
    let ox = qx.max(0.0);
    let oy = qy.max(0.0);
    (ox * ox + oy * oy).sqrt() + qx.max(qy).min(0.0) - r
}

/// Coverage of a pixel centered at distance `d` from the boundary, for a
/// filled shape. Half-pixel linear ramp around the edge.
pub(crate) fn fill_coverage(d: f32) -> f32 {
    (0.5 - d).clamp(0.0, 1.0)
}

/// Coverage for a stroked boundary of the given width, centered on the
/// shape outline.
pub(crate) fn stroke_coverage(d: f32, stroke_width: f32) -> f32 {
    (0.5 - (d.abs() - stroke_width / 2.0)).clamp(0.0, 1.0)
}
