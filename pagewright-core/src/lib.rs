//! # pagewright
//!
//! A small, pure Rust PDF 1.4 writer for reports and printable documents.
//!
//! ## Features
//!
//! - **Pages**: standard and custom sizes, portrait or landscape, per-document margins
//! - **Text**: the 14 standard Type 1 fonts with built-in width metrics, WinAnsi encoding,
//!   word wrapping and left/right/center/justified alignment
//! - **Graphics**: lines, rectangles, circles, ellipses and polygons with stroke and fill
//!   colors, line styles and scoped transforms
//! - **Images**: PNG, JPEG or base64 input, embedded as JPEG XObjects
//! - **Tables**: fixed-width columns, styled header, zebra rows and automatic page breaks
//!   that repeat the header
//! - **Output**: a classic cross-reference table, written to any [`std::io::Write`]
//!
//! ## Quick Start
//!
//! ```rust
//! use pagewright::{Color, Document, PaintStyle, Result, TextAlign};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("Quarterly report").set_author("Finance");
//!
//! doc.add_page()
//!     .set_font("Helvetica-Bold", 18.0)
//!     .text("Quarterly report")
//!     .set_font("Helvetica", 11.0)
//!     .paragraph_aligned("Revenue grew in every region this quarter.", TextAlign::Justified);
//!
//! doc.set_fill_color(Color::rgb(0.2, 0.4, 0.8))
//!     .rect(0.0, 120.0, 200.0, 40.0, PaintStyle::Fill);
//!
//! doc.move_to(0.0, 180.0)
//!     .table(&[150.0, 100.0])
//!     .header(&["Region", "Revenue"])
//!     .row(&["North", "1200"])
//!     .row(&["South", "950"])
//!     .draw();
//!
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`document`] - Document state, cursor and the high-level drawing API
//! - [`page`] - Page sizes, margins and per-page content
//! - [`graphics`] - Content stream operators, colors and images
//! - [`text`] - Fonts, metrics, encoding, wrapping and tables
//! - [`objects`] - PDF object model
//! - [`writer`] - Serialization to bytes

pub mod document;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod text;
pub mod writer;

pub use document::{Document, DocumentConfig, DocumentMetadata};
pub use error::{PdfError, Result};
pub use geometry::{Matrix, Point};
pub use graphics::{
    Color, DashPattern, GraphicsContext, Image, ImageColorSpace, LineCap, LineJoin, PaintStyle,
};
pub use page::{Margins, Orientation, Page, PageSize};
pub use text::{Font, FontFamily, FontStyle, Table, TableStyle, TextAlign};
pub use writer::{PdfWriter, WriterConfig};

/// Current version of pagewright
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// PDF version written in every file header.
pub const PDF_VERSION: &str = "1.4";
