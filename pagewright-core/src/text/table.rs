//! Paginated tables drawn straight into a [`Document`].
//!
//! Rows have a fixed height of `font_size + 2 * padding`. When a row would
//! cross the bottom margin a page is added and the header row, if any, is
//! repeated before it.

use crate::document::{Document, TextRun};
use crate::graphics::{Color, PaintStyle};
use crate::text::{measure_text, FontStyle, TextAlign};

/// Visual options for a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    /// Space between cell borders and text, in points
    pub padding: f64,
    pub border_color: Color,
    /// Zero disables borders
    pub border_width: f64,
    pub header_background: Option<Color>,
    pub header_text_color: Color,
    pub header_bold: bool,
    /// Fill for every other data row, starting with the second
    pub zebra: Option<Color>,
    pub text_color: Color,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            padding: 4.0,
            border_color: Color::black(),
            border_width: 0.5,
            header_background: Some(Color::light_gray()),
            header_text_color: Color::black(),
            header_bold: true,
            zebra: None,
            text_color: Color::black(),
        }
    }
}

/// A table under construction. Nothing is drawn until [`Table::draw`].
///
/// # Example
///
/// ```rust
/// use pagewright::{Document, TextAlign};
///
/// let mut doc = Document::new();
/// doc.add_page();
/// doc.table(&[200.0, 100.0])
///     .header(&["Item", "Price"])
///     .row(&["Coffee", "3.50"])
///     .row(&["Tea", "2.80"])
///     .align(1, TextAlign::Right)
///     .draw();
/// assert_eq!(doc.page_count(), 1);
/// ```
pub struct Table<'a> {
    document: &'a mut Document,
    column_widths: Vec<f64>,
    alignments: Vec<TextAlign>,
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
    style: TableStyle,
}

impl<'a> Table<'a> {
    pub(crate) fn new(document: &'a mut Document, column_widths: Vec<f64>) -> Self {
        let columns = column_widths.len();
        Self {
            document,
            column_widths,
            alignments: vec![TextAlign::Left; columns],
            header: None,
            rows: Vec::new(),
            style: TableStyle::default(),
        }
    }

    /// Header row, repeated at the top of every page the table spans.
    pub fn header<S: AsRef<str>>(mut self, cells: &[S]) -> Self {
        self.header = Some(self.normalize(cells));
        self
    }

    /// Appends a data row. Missing cells are blank, extra cells are dropped.
    pub fn row<S: AsRef<str>>(mut self, cells: &[S]) -> Self {
        let row = self.normalize(cells);
        self.rows.push(row);
        self
    }

    pub fn rows<I, R, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        for row in rows {
            let row = self.normalize(row.as_ref());
            self.rows.push(row);
        }
        self
    }

    /// Alignment for column `column`; out-of-range columns are ignored.
    pub fn align(mut self, column: usize, align: TextAlign) -> Self {
        if let Some(slot) = self.alignments.get_mut(column) {
            *slot = align;
        }
        self
    }

    pub fn style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Height of every row at the document's current font size.
    pub fn row_height(&self) -> f64 {
        self.document.font_size() + 2.0 * self.style.padding
    }

    /// Draws the table at the cursor and leaves the cursor below it, at the
    /// table's starting x.
    pub fn draw(self) -> &'a mut Document {
        let Table {
            document,
            column_widths,
            alignments,
            header,
            rows,
            style,
        } = self;

        let layout = RowLayout {
            column_widths: &column_widths,
            alignments: &alignments,
            style: &style,
            row_height: document.font_size() + 2.0 * style.padding,
            left: document.cursor.x,
        };
        let saved_fill = document.fill_color();
        let saved_stroke = document.stroke_color();
        let saved_width = document.line_width();

        document.ensure_page();
        if style.border_width > 0.0 {
            document.set_line_width(style.border_width);
        }

        if let Some(header) = &header {
            let leading = if rows.is_empty() { 1 } else { 2 };
            if !layout.fits_rows(document, leading) {
                layout.new_page(document);
            }
            layout.draw_row(document, header, RowKind::Header);
        }

        for (index, row) in rows.iter().enumerate() {
            if !layout.fits(document) {
                layout.new_page(document);
                if let Some(header) = &header {
                    layout.draw_row(document, header, RowKind::Header);
                }
            }
            layout.draw_row(document, row, RowKind::Data(index));
        }

        if style.border_width > 0.0 {
            document.set_line_width(saved_width);
        }
        document.cursor.x = layout.left;
        document
            .set_fill_color(saved_fill)
            .set_stroke_color(saved_stroke)
    }

    fn normalize<S: AsRef<str>>(&self, cells: &[S]) -> Vec<String> {
        (0..self.column_widths.len())
            .map(|column| {
                cells
                    .get(column)
                    .map(|cell| cell.as_ref().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum RowKind {
    Header,
    Data(usize),
}

struct RowLayout<'s> {
    column_widths: &'s [f64],
    alignments: &'s [TextAlign],
    style: &'s TableStyle,
    row_height: f64,
    left: f64,
}

impl RowLayout<'_> {
    /// A row fits when it ends above the bottom margin. A row at the top of
    /// a page always fits, so oversized rows cannot loop forever.
    fn fits(&self, document: &Document) -> bool {
        self.fits_rows(document, 1)
    }

    /// Whether `count` consecutive rows fit below the cursor.
    fn fits_rows(&self, document: &Document, count: usize) -> bool {
        let top = document.cursor.y;
        top <= 0.0 || top + count as f64 * self.row_height <= document.content_height() + 1e-9
    }

    fn new_page(&self, document: &mut Document) {
        document.add_page();
        document.cursor.x = self.left;
    }

    fn draw_row(&self, document: &mut Document, cells: &[String], kind: RowKind) {
        let top = document.cursor.y;
        let font_size = document.font_size();
        let (font, text_color, background) = match kind {
            RowKind::Header => {
                let font = if self.style.header_bold {
                    document.font().with_style(FontStyle::Bold)
                } else {
                    document.font()
                };
                (font, self.style.header_text_color, self.style.header_background)
            }
            RowKind::Data(index) => {
                let zebra = self.style.zebra.filter(|_| index % 2 == 1);
                (document.font(), self.style.text_color, zebra)
            }
        };

        let mut x = self.left;
        for (column, &width) in self.column_widths.iter().enumerate() {
            if let Some(color) = background {
                document
                    .set_fill_color(color)
                    .rect(x, top, width, self.row_height, PaintStyle::Fill);
            }
            if self.style.border_width > 0.0 {
                document.set_stroke_color(self.style.border_color).rect(
                    x,
                    top,
                    width,
                    self.row_height,
                    PaintStyle::Stroke,
                );
            }

            let text = cells.get(column).map(String::as_str).unwrap_or("");
            let align = self.alignments.get(column).copied().unwrap_or_default();
            let inner = width - 2.0 * self.style.padding;
            let offset = align.offset(measure_text(text, font, font_size), inner);
            document.emit_text(TextRun {
                text,
                x: x + self.style.padding + offset,
                y: top + self.style.padding,
                font,
                size: font_size,
                color: text_color,
                word_spacing: None,
            });

            x += width;
        }

        document.cursor.y = top + self.row_height;
    }
}
