use super::object_graph::ObjectGraph;
use crate::document::Document;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::literal_string;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, trace};

/// Serialization options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriterConfig {
    /// Flate-compress page content streams. Needs the `compression` feature.
    pub compress_streams: bool,
}

/// Writes a [`Document`] as a classic PDF 1.4 file: header, numbered
/// objects, cross-reference table and trailer.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: BTreeMap<ObjectId, u64>,
    current_position: u64,
    config: WriterConfig,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self::with_config(writer, WriterConfig::default())
    }

    pub fn with_config(writer: W, config: WriterConfig) -> Self {
        Self {
            writer,
            xref_positions: BTreeMap::new(),
            current_position: 0,
            config,
        }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> u64 {
        self.current_position
    }

    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        let graph = ObjectGraph::build(document, &self.config)?;

        self.write_header()?;
        for entry in graph.objects() {
            self.write_object(entry.id, &entry.object)?;
        }

        let xref_position = self.current_position;
        self.write_xref(graph.len())?;
        self.write_trailer(graph.len(), graph.root(), graph.info(), xref_position)?;
        self.writer.flush()?;

        debug!(
            objects = graph.len(),
            pages = document.page_count(),
            bytes = self.current_position,
            "wrote PDF document"
        );
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.4\n")?;
        // Binary marker comment
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);
        trace!(object = id.number(), offset = self.current_position, "writing object");

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;
        self.write_object_value(object)?;
        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes())?,
            Object::String(s) => self.write_bytes(literal_string(s).as_bytes())?,
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => self.write_dictionary(dict)?,
            Object::Stream(stream) => {
                self.write_dictionary(stream.dictionary())?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(stream.data())?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => self.write_bytes(id.to_string().as_bytes())?,
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &Dictionary) -> Result<()> {
        self.write_bytes(b"<<")?;
        for (key, value) in dict.entries() {
            self.write_bytes(b"\n/")?;
            self.write_bytes(key.as_bytes())?;
            self.write_bytes(b" ")?;
            self.write_object_value(value)?;
        }
        self.write_bytes(b"\n>>")?;
        Ok(())
    }

    /// One subsection `0 N+1`. Every entry is exactly 20 bytes.
    fn write_xref(&mut self, object_count: usize) -> Result<()> {
        self.write_bytes(b"xref\n")?;
        self.write_bytes(format!("0 {}\n", object_count + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f\r\n")?;

        for number in 1..=object_count as u32 {
            let entry = match self.xref_positions.get(&ObjectId::new(number, 0)) {
                Some(position) => format!("{position:010} 00000 n\r\n"),
                None => "0000000000 00000 f\r\n".to_string(),
            };
            self.write_bytes(entry.as_bytes())?;
        }
        Ok(())
    }

    fn write_trailer(
        &mut self,
        object_count: usize,
        root: ObjectId,
        info: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let mut trailer = Dictionary::new();
        trailer.set("Size", (object_count + 1) as i64);
        trailer.set("Root", root);
        trailer.set("Info", info);

        self.write_bytes(b"trailer\n")?;
        self.write_dictionary(&trailer)?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

/// Up to six decimals, trailing zeros dropped.
fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
pub(crate) fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");
    // UTC, so the offset is always zero
    format!("{formatted}+00'00")
}
