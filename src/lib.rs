//! # qrlogo
//!
//! A Rust library for rendering QR codes with a centered logo overlay, and
//! for decoding them back into text.
//!
//! `qrlogo` turns text into a scannable QR raster: the symbol is encoded at
//! a high error correction level, rasterized as pure black/white modules,
//! and, when a logo is supplied, composited with a rounded-corner logo, a
//! soft drop shadow and a two-tone border at the canvas center. The inverse
//! path loads a raster, extracts its luminance and recovers the original
//! text. The symbol algorithms themselves live behind capability traits,
//! backed by the `qrcode` and `rqrr` crates.
//!
//! ## Features
//!
//! - Encode any UTF-8 text, error correction levels Low through High.
//! - Render to an in-memory RGBA buffer or serialized PNG/JPEG bytes.
//! - Embed a logo from a file, raw bytes or a decoded image, with rounded
//!   corners, drop shadow and configurable border.
//! - Decode QR images from files, bytes or in-memory buffers.
//! - Safe Rust, no unsafe code.
//!
//! ## Example
//!
//! Generate a branded QR code and read it back:
//!
//! ```no_run
//! use qrlogo::helper::{create_qrcode, decode_qrcode_bytes};
//! use qrlogo::logo::{LogoConfig, LogoSource};
//!
//! let png = create_qrcode(
//!     "https://example.com",
//!     Some(800),
//!     Some(&LogoSource::Path("logo.png".into())),
//!     Some(LogoConfig::default()),
//! ).unwrap();
//! assert_eq!(decode_qrcode_bytes(&png).unwrap(), "https://example.com");
//! ```
//!
//! Generate a plain in-memory image buffer at the default 400px edge:
//!
//! ```
//! use qrlogo::helper::generate_qrcode_image;
//!
//! let img = generate_qrcode_image("Hello, World!", None, None, None).unwrap();
//! assert_eq!(img.dimensions(), (400, 400));
//! ```
//!
//! ## Modules
//!
//! - [`helper`]: The public operation surface.
//! - [`codec`]: Symbol encoder/decoder boundary.
//! - [`matrix`]: The module grid data object.
//! - [`raster`]: Module grid to pixel buffer rendering.
//! - [`logo`]: Logo configuration and rounded-corner processing.
//! - [`compose`]: Shadow, logo and border compositing.
//! - [`error`]: The crate error type.

#![forbid(unsafe_code)]

pub mod codec;
pub mod compose;
pub mod error;
pub mod helper;
pub mod logo;
pub mod matrix;
pub mod raster;

pub use error::QrError;
