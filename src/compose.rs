//! Layering of the drop shadow, logo and border onto the base raster.
//!
//! The original graphics-context model (stateful pen with composite-mode
//! toggling) is replaced by an explicit pipeline: every step draws into a
//! named buffer and layer combination is a pure blend over two buffers.
//! Alpha is straight (non-premultiplied) throughout; `Rgba::blend` is
//! source-over on straight alpha.

use crate::error::QrError;
use crate::logo::{self, LogoConfig};
use image::{imageops, Pixel, Rgba, RgbaImage};
use tracing::{debug, warn};

/// Canvas edge the pixel constants below are tuned for. On smaller
/// canvases the stroke and shadow geometry scales down proportionally, so
/// the overlay occludes the same share of the symbol and stays within what
/// level-H error correction can absorb.
const REFERENCE_EDGE: f32 = 400.0;
/// Pixel offset of the drop shadow from the logo origin, at
/// [`REFERENCE_EDGE`].
const SHADOW_OFFSET: u32 = 10;
/// Shadow fill: black at 10% opacity.
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 26]);
/// Color of the thin inner highlight outline.
const INNER_OUTLINE_COLOR: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Overlays `logo` onto the center of `base`, with a soft drop shadow
/// beneath it and a two-tone rounded border around it.
///
/// The logo is clipped to rounded corners at its native resolution, then
/// scaled to `base_edge / config.logo_fraction`. The border stroke and
/// shadow offset are interpreted at the 400px reference canvas and scale
/// down proportionally on smaller canvases, keeping the occluded share of
/// the symbol constant. All intermediate drawing
/// happens on a transparent scratch layer that is composited onto `base`
/// with source-atop blending at the end, so every pixel outside the logo
/// rectangle, its border stroke and the shadow rectangle is left exactly
/// as it was; the modules under the logo are fully replaced, never blended
/// into ambiguous gray.
///
/// # Errors
///
/// [`QrError::InvalidArgument`] if `config.logo_fraction < 2` or the
/// canvas is too small to hold a logo at all, raised before any drawing;
/// [`QrError::InvalidArgument`] from the clipping stage if the logo has a
/// zero dimension.
pub fn overlay_logo(
    base: &mut RgbaImage,
    logo: &RgbaImage,
    config: &LogoConfig,
) -> Result<(), QrError> {
    config.validate()?;

    let width = base.width() / config.logo_fraction;
    let height = base.height() / config.logo_fraction;
    if width == 0 || height == 0 {
        return Err(QrError::InvalidArgument(format!(
            "canvas {}x{} is too small for a 1/{} logo",
            base.width(),
            base.height(),
            config.logo_fraction
        )));
    }
    let radius = width / 10;
    let x = (base.width() - width) / 2;
    let y = (base.height() - height) / 2;

    // The configured border width and the shadow offset are pixel values
    // at REFERENCE_EDGE. The logo rect already scales with the canvas;
    // the stroke and shadow have to follow, or at small edges they eat
    // whole extra module columns and push the occlusion past what the
    // decoder can correct.
    let scale = (base.width() as f32 / REFERENCE_EDGE).min(1.0);
    let border_width = if config.border_width == 0 {
        0
    } else {
        ((config.border_width as f32 * scale).round() as u32).max(1)
    };
    let shadow_offset = ((SHADOW_OFFSET as f32 * scale).round() as u32).max(1);

    let rounded = logo::clip_round(logo)?;
    let scaled = imageops::resize(&rounded, width, height, imageops::FilterType::Lanczos3);

    let mut scratch = RgbaImage::new(base.width(), base.height());

    if width > 2 * shadow_offset {
        fill_round_rect(
            &mut scratch,
            x + shadow_offset,
            y + shadow_offset,
            width - 2 * shadow_offset,
            height,
            radius,
            SHADOW_COLOR,
        );
    } else {
        warn!(width, "logo too small for a drop shadow, skipping");
    }

    imageops::overlay(&mut scratch, &scaled, i64::from(x), i64::from(y));

    if border_width > 0 {
        stroke_round_rect(
            &mut scratch,
            x,
            y,
            width,
            height,
            radius,
            border_width as f32,
            Rgba([
                config.border_color.0[0],
                config.border_color.0[1],
                config.border_color.0[2],
                255,
            ]),
        );
    }
    let inset = border_width / 2;
    if let (Some(inner_w), Some(inner_h)) = (
        width.checked_sub(border_width),
        height.checked_sub(border_width),
    ) {
        if inner_w > 0 && inner_h > 0 {
            stroke_round_rect(
                &mut scratch,
                x + inset,
                y + inset,
                inner_w,
                inner_h,
                radius,
                1.0,
                INNER_OUTLINE_COLOR,
            );
        }
    }

    composite_atop(base, &scratch);
    debug!(x, y, width, height, "logo composited onto raster");
    Ok(())
}

/// Fills a rounded rectangle into `img` with source-over blending and
/// antialiased edges.
fn fill_round_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, radius: u32, color: Rgba<u8>) {
    blend_round_rect(img, x, y, w, h, radius, 0.0, color, |d, _| logo::fill_coverage(d));
}

/// Strokes the outline of a rounded rectangle, the stroke centered on the
/// boundary.
#[allow(clippy::too_many_arguments)]
fn stroke_round_rect(
    img: &mut RgbaImage,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    radius: u32,
    stroke_width: f32,
    color: Rgba<u8>,
) {
    blend_round_rect(img, x, y, w, h, radius, stroke_width, color, logo::stroke_coverage);
}

#[allow(clippy::too_many_arguments)]
fn blend_round_rect(
    img: &mut RgbaImage,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    radius: u32,
    stroke_width: f32,
    color: Rgba<u8>,
    coverage: impl Fn(f32, f32) -> f32,
) {
    // Bounding box, padded for the stroke overhang and the AA ramp.
    let pad = (stroke_width / 2.0).ceil() as u32 + 1;
    let x0 = x.saturating_sub(pad);
    let y0 = y.saturating_sub(pad);
    let x1 = (x + w + pad).min(img.width());
    let y1 = (y + h + pad).min(img.height());

    for py in y0..y1 {
        for px in x0..x1 {
            let d = logo::rounded_rect_distance(
                px as f32 + 0.5,
                py as f32 + 0.5,
                x as f32,
                y as f32,
                w as f32,
                h as f32,
                radius as f32,
            );
            let c = coverage(d, stroke_width);
            if c <= 0.0 {
                continue;
            }
            let mut src = color;
            src.0[3] = (src.0[3] as f32 * c).round() as u8;
            img.get_pixel_mut(px, py).blend(&src);
        }
    }
}

/// Composites `layer` onto `base` with source-atop semantics: the layer
/// contributes only where `base` already has coverage, and the
/// destination's coverage is preserved exactly. The base raster is fully
/// opaque, so the color channels take the plain source-over result.
fn composite_atop(base: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in base.pixels_mut().zip(layer.pixels()) {
        if dst.0[3] == 0 || src.0[3] == 0 {
            continue;
        }
        // `Rgba::blend` is source-over and its rounding can nudge the
        // alpha; atop keeps the destination coverage, so write it back.
        let coverage = dst.0[3];
        dst.blend(src);
        dst.0[3] = coverage;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn white_base(edge: u32) -> RgbaImage {
        RgbaImage::from_pixel(edge, edge, Rgba([255, 255, 255, 255]))
    }

    fn blue_logo(edge: u32) -> RgbaImage {
        RgbaImage::from_pixel(edge, edge, Rgba([0, 0, 255, 255]))
    }

    #[test]
    fn fraction_one_is_rejected_before_drawing() {
        let mut base = white_base(400);
        let snapshot = base.clone();
        let config = LogoConfig { logo_fraction: 1, ..LogoConfig::default() };
        let result = overlay_logo(&mut base, &blue_logo(64), &config);
        assert!(matches!(result, Err(QrError::InvalidArgument(_))));
        assert_eq!(base, snapshot, "base must be untouched after rejection");
    }

    #[test]
    fn pixels_outside_logo_and_shadow_are_untouched() {
        let mut base = white_base(400);
        // distinctive stripes so accidental writes are visible
        for (x, _, p) in base.enumerate_pixels_mut() {
            if x % 2 == 0 {
                *p = Rgba([0, 0, 0, 255]);
            }
        }
        let snapshot = base.clone();
        let config = LogoConfig::default();
        overlay_logo(&mut base, &blue_logo(64), &config).unwrap();

        // logo rect is 80x80 at (160, 160); border stroke (width 5) and AA
        // overhang at most 4px outside it, shadow extends 10px down/right
        let margin = 4;
        let (lo, hi) = (160 - margin, 160 + 80 + 10 + margin);
        for (x, y, pixel) in base.enumerate_pixels() {
            let inside = x >= lo && x < hi && y >= lo && y < hi;
            if !inside {
                assert_eq!(pixel, snapshot.get_pixel(x, y), "pixel ({x},{y}) was touched");
            }
        }
    }

    #[test]
    fn logo_center_replaces_modules() {
        let mut base = RgbaImage::from_pixel(400, 400, Rgba([0, 0, 0, 255]));
        overlay_logo(&mut base, &blue_logo(64), &LogoConfig::default()).unwrap();
        assert_eq!(base.get_pixel(200, 200), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn border_color_is_drawn_on_the_outline() {
        let mut base = white_base(400);
        let config = LogoConfig::new(Rgb([255, 0, 0]), 5);
        overlay_logo(&mut base, &blue_logo(64), &config).unwrap();
        // midpoint of the top edge of the 80x80 logo rect at (160, 160)
        assert_eq!(base.get_pixel(200, 160), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn result_stays_fully_opaque() {
        let mut base = white_base(200);
        overlay_logo(&mut base, &blue_logo(32), &LogoConfig::default()).unwrap();
        assert!(base.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn shadow_darkens_below_the_logo() {
        let mut base = white_base(400);
        overlay_logo(&mut base, &blue_logo(64), &LogoConfig::default()).unwrap();
        // inside the shadow rect (x+10..x+70, y+10..y+10+80), below the
        // logo's bottom edge and outside the border stroke
        let p = base.get_pixel(200, 247);
        assert!(p.0[0] < 255 && p.0[0] > 200, "expected a faint shadow, got {p:?}");
    }

    #[test]
    fn border_stroke_scales_down_on_small_canvases() {
        // 100px canvas: logo rect 20x20 at (40, 40), border scaled 5 -> 1.
        let mut base = white_base(100);
        let config = LogoConfig::new(Rgb([255, 0, 0]), 5);
        overlay_logo(&mut base, &blue_logo(64), &config).unwrap();
        // a 1px stroke reaches at most 1px outside the rect boundary
        assert_eq!(
            base.get_pixel(50, 37),
            &Rgba([255, 255, 255, 255]),
            "3px above the rect must be untouched by the scaled stroke"
        );
        // the stroke itself is still there, straddling the boundary
        assert_ne!(base.get_pixel(50, 40), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn atop_composite_preserves_destination_alpha() {
        let mut base = RgbaImage::from_pixel(2, 1, Rgba([10, 10, 10, 255]));
        base.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let mut layer = RgbaImage::new(2, 1);
        layer.put_pixel(0, 0, Rgba([255, 255, 255, 128]));
        layer.put_pixel(1, 0, Rgba([255, 255, 255, 128]));
        composite_atop(&mut base, &layer);
        assert_eq!(base.get_pixel(0, 0).0[3], 255, "opaque destination must stay opaque");
        assert_eq!(
            base.get_pixel(1, 0),
            &Rgba([0, 0, 0, 0]),
            "layer must not show where the base has no coverage"
        );
    }

    #[test]
    fn zero_sized_logo_fails() {
        let mut base = white_base(100);
        let logo = RgbaImage::new(0, 0);
        let result = overlay_logo(&mut base, &logo, &LogoConfig::default());
        assert!(matches!(result, Err(QrError::InvalidArgument(_))));
    }
}
