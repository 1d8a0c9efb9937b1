//! PDF serialization

mod object_graph;
mod pdf_writer;

use pdf_writer::format_pdf_date;
pub use pdf_writer::{PdfWriter, WriterConfig};
