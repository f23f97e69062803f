//! The boundary to the external QR symbol algorithms.
//!
//! The compositing pipeline never talks to a symbol encoder or decoder
//! directly; it goes through the [`SymbolEncoder`] and [`SymbolDecoder`]
//! capability traits, so the rendering logic can be exercised with fake
//! deterministic codecs in tests. The production implementations are backed
//! by the `qrcode` crate (encoding) and `rqrr` (decoding, which performs its
//! own adaptive binarization of the luminance grid).

use crate::error::QrError;
use crate::matrix::ModuleMatrix;
use image::GrayImage;
use qrcode::{Color, EcLevel, QrCode};
use tracing::debug;

/// Width of the quiet zone added around the symbol, in modules.
///
/// The QR specification requires a 4-module light margin for reliable
/// localization; baking it into the matrix keeps rasterization a pure
/// scaling step.
pub const QUIET_ZONE_MODULES: usize = 4;

/// QR error correction level, trading symbol capacity for damage tolerance.
///
/// The default is [`ErrorCorrection::High`]: a centered logo overlay
/// replaces modules outright, and the overlaid symbol stays decodable only
/// through redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// Tolerates ~7% damaged modules.
    Low,
    /// Tolerates ~15% damaged modules.
    Medium,
    /// Tolerates ~25% damaged modules.
    Quartile,
    /// Tolerates ~30% damaged modules.
    #[default]
    High,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        }
    }
}

/// Encodes text into a module matrix. Text is always treated as UTF-8.
pub trait SymbolEncoder {
    fn encode(&self, content: &str, level: ErrorCorrection) -> Result<ModuleMatrix, QrError>;
}

/// Decodes a luminance grid back into text.
///
/// Binarization and finder-pattern localization happen behind this trait.
pub trait SymbolDecoder {
    fn decode(&self, luma: &GrayImage) -> Result<String, QrError>;
}

/// Production encoder backed by the `qrcode` crate.
///
/// The returned matrix includes the [`QUIET_ZONE_MODULES`] margin. Note
/// that the empty string is valid input: it encodes into a version 1
/// symbol carrying a zero-length byte segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrcodeEncoder;

impl SymbolEncoder for QrcodeEncoder {
    fn encode(&self, content: &str, level: ErrorCorrection) -> Result<ModuleMatrix, QrError> {
        let qr = QrCode::with_error_correction_level(content, level.into()).map_err(|source| {
            QrError::Encode { content: content.to_owned(), source }
        })?;
        let size = qr.width();
        let colors = qr.to_colors();

        let padded = size + 2 * QUIET_ZONE_MODULES;
        let mut modules = vec![false; padded * padded];
        for y in 0..size {
            for x in 0..size {
                if colors[y * size + x] == Color::Dark {
                    modules[(y + QUIET_ZONE_MODULES) * padded + (x + QUIET_ZONE_MODULES)] = true;
                }
            }
        }
        debug!(symbol_modules = size, padded_modules = padded, "encoded QR symbol");
        ModuleMatrix::new(padded, padded, modules)
    }
}

/// Production decoder backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl SymbolDecoder for RqrrDecoder {
    fn decode(&self, luma: &GrayImage) -> Result<String, QrError> {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            luma.width() as usize,
            luma.height() as usize,
            |x, y| luma.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        let grid = grids.first().ok_or(QrError::NotFound)?;
        let (_meta, content) = grid.decode().map_err(QrError::Decode)?;
        debug!(len = content.len(), "decoded QR symbol");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_deterministic() {
        let a = QrcodeEncoder.encode("Hello, World!", ErrorCorrection::High).unwrap();
        let b = QrcodeEncoder.encode("Hello, World!", ErrorCorrection::High).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn matrix_is_square_with_quiet_zone() {
        let matrix = QrcodeEncoder.encode("abc", ErrorCorrection::High).unwrap();
        assert_eq!(matrix.width(), matrix.height());
        // "abc" at level H fits version 1: 21 modules plus the margin.
        assert_eq!(matrix.width(), 21 + 2 * QUIET_ZONE_MODULES);
    }

    #[test]
    fn quiet_zone_is_all_light() {
        let matrix = QrcodeEncoder.encode("abc", ErrorCorrection::High).unwrap();
        let w = matrix.width();
        for i in 0..w {
            for q in 0..QUIET_ZONE_MODULES {
                assert!(!matrix.get(i, q));
                assert!(!matrix.get(q, i));
                assert!(!matrix.get(i, w - 1 - q));
                assert!(!matrix.get(w - 1 - q, i));
            }
        }
    }

    #[test]
    fn empty_string_encodes() {
        let matrix = QrcodeEncoder.encode("", ErrorCorrection::High).unwrap();
        assert!(!matrix.is_empty());
    }

    #[test]
    fn oversized_content_is_an_encode_failure() {
        let content = "x".repeat(8000);
        let result = QrcodeEncoder.encode(&content, ErrorCorrection::High);
        match result {
            Err(QrError::Encode { content: c, .. }) => assert_eq!(c.len(), 8000),
            other => panic!("expected Encode error, got {other:?}"),
        }
    }

    #[test]
    fn no_symbol_in_blank_image_is_not_found() {
        let blank = GrayImage::from_pixel(64, 64, image::Luma([255]));
        let result = RqrrDecoder.decode(&blank);
        assert!(matches!(result, Err(QrError::NotFound)));
    }
}
