//! Structural checks over serialized PDF bytes.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use pagewright::Document;

/// Document with fixed dates, so two builds serialize identically.
pub fn fixed_document() -> Document {
    let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut doc = Document::new();
    doc.set_creation_date(date).set_modification_date(date);
    doc
}

/// Output with non-ASCII bytes masked so string offsets equal byte offsets.
pub fn ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

/// The parsed skeleton of a serialized file.
#[derive(Debug)]
pub struct PdfLayout {
    pub text: String,
    pub xref_offset: usize,
    /// Byte offset of every in-use object, index 0 is object 1
    pub offsets: Vec<usize>,
    pub size: usize,
    pub root: usize,
    pub info: usize,
}

impl PdfLayout {
    /// Parses the xref table and trailer, panicking on any structural error.
    pub fn parse(bytes: &[u8]) -> Self {
        let text = ascii(bytes);
        assert!(text.starts_with("%PDF-1.4\n"), "missing header");
        assert!(text.ends_with("%%EOF\n"), "missing EOF marker");

        let startxref = text.rfind("startxref\n").expect("startxref");
        let xref_offset: usize = text[startxref + 10..]
            .lines()
            .next()
            .and_then(|line| line.parse().ok())
            .expect("startxref offset");
        assert!(text[xref_offset..].starts_with("xref\n"), "startxref misses the table");

        let after_keyword = &text[xref_offset + 5..];
        let header_end = after_keyword.find('\n').expect("subsection header");
        let mut header = after_keyword[..header_end].split(' ');
        assert_eq!(header.next(), Some("0"));
        let count: usize = header.next().and_then(|n| n.parse().ok()).expect("entry count");

        let body_start = xref_offset + 5 + header_end + 1;
        let body = &text[body_start..body_start + count * 20];
        let entries: Vec<&str> = (0..count).map(|i| &body[i * 20..i * 20 + 20]).collect();
        assert_eq!(entries[0], "0000000000 65535 f\r\n");

        let mut offsets = Vec::with_capacity(count - 1);
        for (number, entry) in entries.iter().enumerate().skip(1) {
            assert_eq!(&entry[10..], " 00000 n\r\n", "entry {number}");
            let offset: usize = entry[..10].parse().expect("offset digits");
            let expected = format!("{number} 0 obj\n");
            assert!(text[offset..].starts_with(&expected), "object {number} not at {offset}");
            offsets.push(offset);
        }

        let trailer = &text[body_start + count * 20..];
        assert!(trailer.starts_with("trailer\n"), "trailer must follow the table");
        let size = trailer_value(trailer, "/Size ");
        assert_eq!(size, count, "/Size equals the entry count");

        Self {
            root: trailer_value(trailer, "/Root "),
            info: trailer_value(trailer, "/Info "),
            text,
            xref_offset,
            offsets,
            size,
        }
    }

    /// Source text of object `number`, between `obj` and `endobj`.
    pub fn object(&self, number: usize) -> &str {
        let start = self.offsets[number - 1];
        let end = self.text[start..].find("\nendobj\n").expect("endobj") + start;
        &self.text[start..end]
    }

    pub fn object_count(&self) -> usize {
        self.offsets.len()
    }

    /// Every `n g R` reference in the object bodies, stream data excluded.
    pub fn references(&self) -> Vec<usize> {
        let mut body = String::new();
        let mut rest = &self.text[..self.xref_offset];
        while let Some(start) = rest.find("\nstream\n") {
            body.push_str(&rest[..start]);
            let end = rest[start..].find("\nendstream").expect("endstream") + start;
            rest = &rest[end + 10..];
        }
        body.push_str(rest);
        let tokens: Vec<&str> = body.split_whitespace().collect();
        tokens
            .windows(3)
            .filter(|w| w[2].trim_end_matches(']') == "R" && w[1] == "0")
            .filter_map(|w| w[0].trim_start_matches('[').parse().ok())
            .collect()
    }

    /// Objects whose dictionary declares `/Type /name`.
    pub fn objects_of_type(&self, name: &str) -> Vec<usize> {
        let needle = format!("/Type /{name}\n");
        (1..=self.object_count())
            .filter(|&n| self.object(n).contains(&needle))
            .collect()
    }

    /// Decoded-as-text content stream of each page, in page order.
    pub fn page_contents(&self) -> Vec<String> {
        self.objects_of_type("Page")
            .into_iter()
            .map(|page| {
                let dict = self.object(page);
                let contents = dict_reference(dict, "/Contents ");
                let stream = self.object(contents);
                let start = stream.find("stream\n").expect("stream keyword") + 7;
                let end = stream.rfind("\nendstream").expect("endstream");
                stream[start..end].to_string()
            })
            .collect()
    }
}

fn trailer_value(trailer: &str, key: &str) -> usize {
    let start = trailer.find(key).unwrap_or_else(|| panic!("{key} in trailer")) + key.len();
    trailer[start..]
        .split(|c: char| !c.is_ascii_digit())
        .next()
        .and_then(|n| n.parse().ok())
        .expect("numeric trailer value")
}

fn dict_reference(dict: &str, key: &str) -> usize {
    let start = dict.find(key).unwrap_or_else(|| panic!("{key} entry")) + key.len();
    dict[start..]
        .split(' ')
        .next()
        .and_then(|n| n.parse().ok())
        .expect("reference number")
}

/// Non-overlapping occurrences of `needle`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
