//! The public operation surface: one-call QR generation and decoding.
//!
//! Every operation here is stateless and synchronous; concurrent callers
//! may use the crate in parallel as long as each call works on its own
//! buffers.

use crate::codec::{ErrorCorrection, QrcodeEncoder, RqrrDecoder, SymbolDecoder, SymbolEncoder};
use crate::compose;
use crate::error::QrError;
use crate::logo::{LogoConfig, LogoSource};
use crate::matrix::ModuleMatrix;
use crate::raster;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Canvas edge length used when the caller does not pass one, in pixels.
pub const DEFAULT_EDGE_LENGTH: u32 = 400;

/// JPEG quality for [`OutputFormat::Jpeg`].
const JPEG_QUALITY: u8 = 90;

/// Serialization format for [`create_qrcode_with_format`].
///
/// PNG is the default: the module grid is a binary signal and a lossy
/// photographic codec can smear module edges into ambiguous gray. JPEG is
/// available as an explicit opt-in for callers that need it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
}

/// Encodes `content` into a QR module matrix (quiet zone included).
///
/// The matrix is at module resolution; pixel sizing happens in
/// [`raster::render`] via the image-producing operations below. The empty
/// string is accepted and encodes into a valid zero-length byte-mode
/// symbol.
///
/// # Errors
///
/// [`QrError::Encode`] when the content exceeds symbol capacity at the
/// requested level.
pub fn create_qrcode_matrix(
    content: &str,
    level: ErrorCorrection,
) -> Result<ModuleMatrix, QrError> {
    QrcodeEncoder.encode(content, level)
}

/// Renders a QR code for `content` as an in-memory RGBA raster, optionally
/// with a centered logo overlay.
///
/// Error correction is fixed at [`ErrorCorrection::High`] so the overlay
/// stays within what redundancy can absorb.
///
/// # Arguments
///
/// * `edge_length` - Canvas edge in pixels; [`DEFAULT_EDGE_LENGTH`] when
///   `None`.
/// * `logo` - Optional logo; `None` skips rounding and compositing
///   entirely.
/// * `config` - Logo appearance; documented defaults when `None`.
///
/// # Errors
///
/// Argument problems (missing logo file, zero edge, logo fraction below 2)
/// surface as [`QrError::InvalidArgument`] before any rendering work;
/// encoder rejections as [`QrError::Encode`]; logo decode problems as
/// [`QrError::Composition`].
///
/// # Example
///
/// ```no_run
/// use qrlogo::helper::generate_qrcode_image;
/// use qrlogo::logo::LogoSource;
///
/// let img = generate_qrcode_image(
///     "https://example.com",
///     Some(800),
///     Some(&LogoSource::Path("logo.png".into())),
///     None,
/// ).unwrap();
/// assert_eq!(img.dimensions(), (800, 800));
/// ```
pub fn generate_qrcode_image(
    content: &str,
    edge_length: Option<u32>,
    logo: Option<&LogoSource>,
    config: Option<LogoConfig>,
) -> Result<RgbaImage, QrError> {
    generate_qrcode_image_with(&QrcodeEncoder, content, edge_length, logo, config)
}

/// [`generate_qrcode_image`] with an explicit encoder, the seam that lets
/// the rendering pipeline run against a fake deterministic encoder.
pub fn generate_qrcode_image_with(
    encoder: &dyn SymbolEncoder,
    content: &str,
    edge_length: Option<u32>,
    logo: Option<&LogoSource>,
    config: Option<LogoConfig>,
) -> Result<RgbaImage, QrError> {
    let edge_length = edge_length.unwrap_or(DEFAULT_EDGE_LENGTH);
    let config = config.unwrap_or_default();

    // Validate arguments and load the logo before spending any work on
    // encoding or rasterization.
    config.validate()?;
    let logo_img = logo.map(LogoSource::load).transpose()?;

    let matrix = encoder.encode(content, ErrorCorrection::High)?;
    let mut img = raster::render(&matrix, edge_length)?;
    if let Some(logo_img) = logo_img {
        compose::overlay_logo(&mut img, &logo_img, &config)?;
    }
    debug!(edge_length, with_logo = logo.is_some(), "generated QR image");
    Ok(img)
}

/// Renders a QR code and serializes it with the default output format
/// (PNG).
///
/// See [`generate_qrcode_image`] for argument semantics and errors.
pub fn create_qrcode(
    content: &str,
    edge_length: Option<u32>,
    logo: Option<&LogoSource>,
    config: Option<LogoConfig>,
) -> Result<Vec<u8>, QrError> {
    create_qrcode_with_format(content, edge_length, logo, config, OutputFormat::default())
}

/// Renders a QR code and serializes it with an explicit output format.
pub fn create_qrcode_with_format(
    content: &str,
    edge_length: Option<u32>,
    logo: Option<&LogoSource>,
    config: Option<LogoConfig>,
    format: OutputFormat,
) -> Result<Vec<u8>, QrError> {
    let img = generate_qrcode_image(content, edge_length, logo, config)?;
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => img.write_to(&mut buf, ImageFormat::Png)?,
        OutputFormat::Jpeg => {
            // JPEG has no alpha channel; flatten over white first.
            let rgb = flatten_over_white(&img);
            JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
        }
    }
    Ok(buf.into_inner())
}

/// Decodes the QR code in an image file back into text.
///
/// # Errors
///
/// [`QrError::InvalidArgument`] for a missing file, [`QrError::NotFound`]
/// when no symbol is located, [`QrError::Decode`] when a located symbol
/// cannot be read.
pub fn decode_qrcode(path: impl AsRef<Path>) -> Result<String, QrError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(QrError::InvalidArgument(format!(
            "image file does not exist: {}",
            path.display()
        )));
    }
    let img = image::open(path)?;
    decode_qrcode_image(&img)
}

/// Decodes the QR code in encoded image bytes (PNG, JPEG, ...).
pub fn decode_qrcode_bytes(bytes: &[u8]) -> Result<String, QrError> {
    let img = image::load_from_memory(bytes)?;
    decode_qrcode_image(&img)
}

/// Decodes the QR code in an already loaded image.
///
/// The image is reduced to a luminance grid; binarization and symbol
/// localization happen in the decoder boundary.
pub fn decode_qrcode_image(image: &DynamicImage) -> Result<String, QrError> {
    decode_qrcode_image_with(&RqrrDecoder, image)
}

/// [`decode_qrcode_image`] with an explicit decoder, the decode-side
/// counterpart of [`generate_qrcode_image_with`].
pub fn decode_qrcode_image_with(
    decoder: &dyn SymbolDecoder,
    image: &DynamicImage,
) -> Result<String, QrError> {
    decoder.decode(&image.to_luma8())
}

fn flatten_over_white(img: &RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(img.width(), img.height());
    for (src, dst) in img.pixels().zip(out.pixels_mut()) {
        let a = src.0[3] as u16;
        *dst = Rgb([
            ((src.0[0] as u16 * a + 255 * (255 - a)) / 255) as u8,
            ((src.0[1] as u16 * a + 255 * (255 - a)) / 255) as u8,
            ((src.0[2] as u16 * a + 255 * (255 - a)) / 255) as u8,
        ]);
    }
    out
}
