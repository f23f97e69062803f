use thiserror::Error;

/// Unified error type for every operation in the crate.
///
/// All failures are surfaced to the caller; nothing is retried and there is
/// no silent fallback to a logo-less or blank image.
#[derive(Debug, Error)]
pub enum QrError {
    /// Caller-supplied input rejected before any rendering work begins:
    /// a missing logo file, a zero edge length, an empty module matrix, or
    /// a logo fraction that would not fit the canvas.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The symbol encoder rejected the content, e.g. capacity exceeded at
    /// the requested error correction level. Carries the offending text.
    #[error("failed to encode content {content:?}")]
    Encode {
        content: String,
        #[source]
        source: qrcode::types::QrError,
    },

    /// Rounding or overlaying the logo failed, e.g. the logo bytes could
    /// not be decoded as an image.
    #[error("failed to composite logo onto QR raster: {0}")]
    Composition(String),

    /// A QR symbol was located in the image but could not be decoded.
    #[error("failed to decode QR symbol")]
    Decode(#[source] rqrr::DeQRError),

    /// No QR symbol was located in the image.
    #[error("no QR symbol found in image")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}
