//! # qrpipe
//!
//! Turn text into styled QR code images and read QR codes back out of images.
//!
//! Symbol encoding (segment optimisation, Reed-Solomon, masking) is handled by
//! [`qrcode`], detection and decoding by [`rqrr`]. This crate provides the two
//! pipelines around them: configuring and rasterising a symbol into a PNG, and
//! turning uploaded JPEG, PNG, BMP or GIF bytes into text.
//!
//! ## Features
//!
//! - **Auto-fit**: the smallest version (1-40) that holds the data is chosen
//! - **Styling**: module size, quiet zone width and foreground/background colors
//! - **Reading**: format sniffing, transparency handling and small image upscaling
//! - **Result classification**: a missing code is [`Decoded::NotFound`], not an
//!   error, and link-like text is flagged
//!
//! ## Quick Start
//!
//! ### Generating a QR Code
//!
//! ```rust
//! use qrpipe::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!").build()?;
//!
//! let png = qr.to_png()?;
//! assert_eq!(qr.image_size(), 10 * (qr.width() as u32 + 2 * 4));
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrpipe::{Color, ECLevel, QRBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .module_size(6)                        // Pixels per module, 1..=20
//!     .border(2)                             // Quiet zone in modules, 0..=10
//!     .ec_level(ECLevel::H)                  // Defaults to ECLevel::M
//!     .foreground("#1E88E5".parse::<Color>()?)
//!     .background(Color::WHITE)
//!     .build()?;
//!
//! let img = qr.to_image();
//! # Ok(())
//! # }
//! ```
//!
//! ### Reading a QR Code
//!
//! ```rust
//! use qrpipe::{decode, encode, Decoded, EncodeOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let enc = encode(&EncodeOptions::new("https://example.com"))?;
//!
//! match decode(&enc.png)? {
//!     Decoded::Found(symbol) => {
//!         assert_eq!(symbol.text, "https://example.com");
//!         assert!(symbol.url_like);
//!     }
//!     Decoded::NotFound => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ## Logging
//!
//! Pipeline stages are reported through [`tracing`]; install a subscriber to
//! see them. The library never installs one itself.

pub mod builder;
pub(crate) mod common;
pub mod reader;

pub use builder::{
    encode, export_filename, preview_text, EncodeOptions, EncodedImage, QRBuilder, QR,
};
pub use common::{Color, ECLevel, ErrorKind, Metadata, QRError, QRResult, Version};
pub use reader::{
    decode, decode_file, is_url_like, Decoded, Point, QRReader, Symbol, SUPPORTED_EXTENSIONS,
};
