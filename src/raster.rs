//! Rasterization of a module matrix into an RGBA pixel buffer.

use crate::error::QrError;
use crate::matrix::ModuleMatrix;
use image::{Rgb, Rgba, RgbaImage};
use tracing::debug;

/// Default foreground for dark modules.
pub const DARK: Rgb<u8> = Rgb([0, 0, 0]);
/// Default background for light modules.
pub const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// Renders a module matrix as a fully opaque square raster of
/// `edge_length x edge_length` pixels, dark modules black and light modules
/// white.
///
/// Scaling is deterministic nearest-neighbor: pixel `(px, py)` shows module
/// `(px * w / edge, py * h / edge)` with integer division, so module
/// `(x, y)` occupies exactly the pixel rectangle
/// `[x*edge/w, (x+1)*edge/w) x [y*edge/h, (y+1)*edge/h)`. When the edge
/// length is not a multiple of the module count, neighboring modules map to
/// pixel blocks differing by one pixel.
///
/// # Errors
///
/// [`QrError::InvalidArgument`] if `edge_length` is zero or the matrix is
/// empty.
pub fn render(matrix: &ModuleMatrix, edge_length: u32) -> Result<RgbaImage, QrError> {
    render_colored(matrix, edge_length, DARK, LIGHT)
}

/// Same as [`render`] with explicit module colors.
///
/// Low-contrast palettes reduce scan reliability; the black/white defaults
/// of [`render`] are the safe choice.
pub fn render_colored(
    matrix: &ModuleMatrix,
    edge_length: u32,
    dark: Rgb<u8>,
    light: Rgb<u8>,
) -> Result<RgbaImage, QrError> {
    if edge_length == 0 {
        return Err(QrError::InvalidArgument(
            "edge length must be a positive number of pixels".into(),
        ));
    }
    if matrix.is_empty() {
        return Err(QrError::InvalidArgument("module matrix is empty".into()));
    }

    let dark = Rgba([dark.0[0], dark.0[1], dark.0[2], 255]);
    let light = Rgba([light.0[0], light.0[1], light.0[2], 255]);
    let (w, h) = (matrix.width(), matrix.height());
    let edge = edge_length as usize;

    let mut img = RgbaImage::new(edge_length, edge_length);
    for (px, py, pixel) in img.enumerate_pixels_mut() {
        let mx = px as usize * w / edge;
        let my = py as usize * h / edge;
        *pixel = if matrix.get(mx, my) { dark } else { light };
    }
    debug!(edge_length, modules = w, "rendered base raster");
    Ok(img)
}
