use crate::error::{PdfError, Result};
use crate::geometry::{Matrix, Point};
use crate::graphics::{Color, DashPattern, Image, LineCap, LineJoin, PaintStyle};
use crate::page::{Margins, Orientation, Page, PageSize};
use crate::text::{measure_text, wrap_text, Font, FontStyle, Table, TextAlign};
use crate::writer::{PdfWriter, WriterConfig};
use chrono::{DateTime, Local, Utc};
use image::DynamicImage;
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Line-height multiplier applied to the font size when advancing lines.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.2;

/// Distance from the top of a line box to the text baseline, as a fraction
/// of the font size.
pub(crate) const ASCENT: f64 = 0.8;

/// A PDF document built through a fluent, cursor-based drawing API.
///
/// Coordinates passed to drawing methods are in points, measured from the
/// top-left corner of the current page's content area with y growing
/// downwards.
///
/// # Example
///
/// ```rust
/// use pagewright::{Color, Document, PaintStyle};
///
/// let mut doc = Document::new();
/// doc.set_title("Quarterly report");
///
/// doc.add_page()
///     .set_font("helvetica bold", 18.0)
///     .text("Summary")
///     .set_font("regular", 11.0)
///     .paragraph("Revenue grew in every region this quarter.")
///     .set_fill_color(Color::rgb8(230, 240, 255))
///     .rect(0.0, 80.0, 200.0, 40.0, PaintStyle::Fill);
///
/// let bytes = doc.to_bytes()?;
/// assert!(bytes.starts_with(b"%PDF-1.4"));
/// # Ok::<(), pagewright::PdfError>(())
/// ```
pub struct Document {
    pages: Vec<Page>,
    current_page: Option<usize>,
    images: IndexMap<String, Image>,
    pub(crate) metadata: DocumentMetadata,
    page_size: PageSize,
    orientation: Orientation,
    margins: Margins,
    pub(crate) cursor: Point,
    font: Font,
    font_size: f64,
    line_height: f64,
    style: GraphicsState,
    saved_states: Vec<SavedState>,
    writer_config: WriterConfig,
}

/// Metadata for a PDF document.
#[derive(Debug, Clone)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    /// Date and time the document was created
    pub creation_date: Option<DateTime<Utc>>,
    /// Date and time the document was last modified
    pub modification_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: Some("pagewright".to_string()),
            producer: Some(format!("pagewright v{}", env!("CARGO_PKG_VERSION"))),
            creation_date: Some(now),
            modification_date: Some(now),
        }
    }
}

/// Defaults applied to a new [`Document`] and to the pages it adds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentConfig {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    pub font: Font,
    /// Font size in points
    pub font_size: f64,
    /// Multiplier applied to `font_size` for each line advance
    pub line_height: f64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Portrait,
            margins: Margins::default(),
            font: Font::Helvetica,
            font_size: 12.0,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

/// Style state mirrored from the PDF graphics state so `Q` can restore it.
#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    fill_color: Color,
    stroke_color: Color,
    text_color: Color,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    dash_pattern: DashPattern,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            text_color: Color::black(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash_pattern: DashPattern::solid(),
        }
    }
}

#[derive(Debug, Clone)]
struct SavedState {
    /// Page whose content stream received the `q`
    page: usize,
    style: GraphicsState,
}

/// One line of text ready to be emitted.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextRun<'a> {
    pub text: &'a str,
    /// Content-area x of the line start
    pub x: f64,
    /// Content-area y of the top of the line box
    pub y: f64,
    pub font: Font,
    pub size: f64,
    pub color: Color,
    pub word_spacing: Option<f64>,
}

impl Document {
    /// Creates a new empty PDF document.
    pub fn new() -> Self {
        Self::with_config(DocumentConfig::default())
    }

    /// Creates an empty document whose pages and text start from `config`.
    ///
    /// ```rust
    /// use pagewright::{Document, DocumentConfig, Font, PageSize};
    ///
    /// let doc = Document::with_config(DocumentConfig {
    ///     page_size: PageSize::Letter,
    ///     font: Font::TimesRoman,
    ///     font_size: 10.0,
    ///     ..DocumentConfig::default()
    /// });
    /// assert_eq!(doc.font_size(), 10.0);
    /// assert_eq!(doc.content_width(), 612.0 - 144.0);
    /// ```
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            pages: Vec::new(),
            current_page: None,
            images: IndexMap::new(),
            metadata: DocumentMetadata::default(),
            page_size: config.page_size,
            orientation: config.orientation,
            margins: config.margins,
            cursor: Point::origin(),
            font: config.font,
            font_size: config.font_size,
            line_height: config.line_height,
            style: GraphicsState::default(),
            saved_states: Vec::new(),
            writer_config: WriterConfig::default(),
        }
    }

    /// Sets the document title.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.metadata.title = Some(title.into());
        self
    }

    /// Sets the document author.
    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.metadata.author = Some(author.into());
        self
    }

    /// Sets the document subject.
    pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
        self.metadata.subject = Some(subject.into());
        self
    }

    /// Sets the document keywords.
    pub fn set_keywords(&mut self, keywords: impl Into<String>) -> &mut Self {
        self.metadata.keywords = Some(keywords.into());
        self
    }

    /// Sets the document creator (software that created the original document).
    pub fn set_creator(&mut self, creator: impl Into<String>) -> &mut Self {
        self.metadata.creator = Some(creator.into());
        self
    }

    /// Sets the document producer (software that produced the PDF).
    pub fn set_producer(&mut self, producer: impl Into<String>) -> &mut Self {
        self.metadata.producer = Some(producer.into());
        self
    }

    /// Sets the document creation date.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.metadata.creation_date = Some(date);
        self
    }

    /// Sets the document creation date using local time.
    pub fn set_creation_date_local(&mut self, date: DateTime<Local>) -> &mut Self {
        self.metadata.creation_date = Some(date.with_timezone(&Utc));
        self
    }

    /// Sets the document modification date.
    pub fn set_modification_date(&mut self, date: DateTime<Utc>) -> &mut Self {
        self.metadata.modification_date = Some(date);
        self
    }

    /// Sets the modification date to the current time.
    pub fn update_modification_date(&mut self) -> &mut Self {
        self.metadata.modification_date = Some(Utc::now());
        self
    }

    /// Gets the document metadata.
    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Replaces the serialization options used by `save`, `write_to` and `to_bytes`.
    pub fn set_writer_config(&mut self, config: WriterConfig) -> &mut Self {
        self.writer_config = config;
        self
    }

    /// Enables or disables Flate compression of content streams.
    pub fn set_compress(&mut self, compress: bool) -> &mut Self {
        self.writer_config.compress_streams = compress;
        self
    }

    // Pages and cursor

    /// Page size for pages added after this call.
    pub fn set_page_size(&mut self, size: PageSize) -> &mut Self {
        self.page_size = size;
        self
    }

    /// Orientation for pages added after this call.
    pub fn set_orientation(&mut self, orientation: Orientation) -> &mut Self {
        self.orientation = orientation;
        self
    }

    /// Margins for pages added after this call.
    pub fn set_margins(&mut self, margins: Margins) -> &mut Self {
        self.margins = margins;
        self
    }

    /// Same margin on all four sides.
    pub fn set_margins_all(&mut self, margin: f64) -> &mut Self {
        self.set_margins(Margins::uniform(margin))
    }

    /// Appends a page with the current defaults and makes it current.
    pub fn add_page(&mut self) -> &mut Self {
        self.add_page_with(self.page_size, self.orientation)
    }

    /// Appends a page with an explicit size and orientation, leaving the
    /// defaults for later pages unchanged. Non-default line state carries
    /// over to the new page.
    pub fn add_page_with(&mut self, size: PageSize, orientation: Orientation) -> &mut Self {
        let mut page = Page::new(size, orientation, self.margins);
        self.apply_line_style(&mut page);
        self.pages.push(page);
        self.current_page = Some(self.pages.len() - 1);
        self.cursor = Point::origin();
        tracing::trace!(page = self.pages.len(), "added page");
        self
    }

    /// Makes an existing page current and moves the cursor to its top-left.
    /// Out-of-range indices are ignored.
    pub fn set_current_page(&mut self, index: usize) -> &mut Self {
        if index < self.pages.len() {
            self.current_page = Some(index);
            self.cursor = Point::origin();
        } else {
            tracing::warn!(index, pages = self.pages.len(), "no such page");
        }
        self
    }

    /// Gets the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page that receives drawing operations.
    pub fn current_page_index(&self) -> Option<usize> {
        self.current_page
    }

    /// All pages in document order.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Gets a page by zero-based index.
    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Moves the cursor to absolute page coordinates (top-left origin).
    pub fn set_position(&mut self, x: f64, y: f64) -> &mut Self {
        let margins = self.active_margins();
        self.cursor = Point::new(x - margins.left, y - margins.top);
        self
    }

    /// Cursor in absolute page coordinates (top-left origin).
    pub fn position(&self) -> (f64, f64) {
        let margins = self.active_margins();
        (self.cursor.x + margins.left, self.cursor.y + margins.top)
    }

    /// Moves the cursor relative to the content area's top-left corner.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.cursor = Point::new(x, y);
        self
    }

    /// Cursor relative to the content area's top-left corner.
    pub fn content_position(&self) -> (f64, f64) {
        (self.cursor.x, self.cursor.y)
    }

    /// Width between the left and right margins of the current page, or of
    /// the next page when there is none yet.
    pub fn content_width(&self) -> f64 {
        let (width, _) = self.active_size();
        let margins = self.active_margins();
        width - margins.left - margins.right
    }

    /// Height between the top and bottom margins. See [`Document::content_width`].
    pub fn content_height(&self) -> f64 {
        let (_, height) = self.active_size();
        let margins = self.active_margins();
        height - margins.top - margins.bottom
    }

    /// Vertical space left between the cursor and the bottom margin.
    pub fn remaining_height(&self) -> f64 {
        self.content_height() - self.cursor.y
    }

    /// Advances the cursor one line and returns it to the left edge.
    pub fn new_line(&mut self) -> &mut Self {
        self.cursor.y += self.line_advance();
        self.cursor.x = 0.0;
        self
    }

    /// Moves the cursor down by `dy` points without changing x.
    pub fn move_down(&mut self, dy: f64) -> &mut Self {
        self.cursor.y += dy;
        self
    }

    // Drawing primitives

    /// Strokes a line between two content points in the stroke color.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        let stroke = self.style.stroke_color;
        let page = self.current_page_mut();
        let (px1, py1) = (page.to_pdf_x(x1), page.to_pdf_y(y1));
        let (px2, py2) = (page.to_pdf_x(x2), page.to_pdf_y(y2));
        page.graphics()
            .set_stroke_color(stroke)
            .move_to(px1, py1)
            .line_to(px2, py2)
            .stroke();
        self
    }

    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: PaintStyle) -> &mut Self {
        let (fill, stroke) = (self.style.fill_color, self.style.stroke_color);
        let page = self.current_page_mut();
        let (px, py) = (page.to_pdf_x(x), page.to_pdf_y(y + height));
        page.graphics()
            .set_fill_color(fill)
            .set_stroke_color(stroke)
            .rect(px, py, width, height)
            .paint(style);
        self
    }

    /// Circle centered at `(x, y)`.
    pub fn circle(&mut self, x: f64, y: f64, radius: f64, style: PaintStyle) -> &mut Self {
        self.ellipse(x, y, radius, radius, style)
    }

    /// Ellipse centered at `(x, y)`.
    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, style: PaintStyle) -> &mut Self {
        let (fill, stroke) = (self.style.fill_color, self.style.stroke_color);
        let page = self.current_page_mut();
        let (cx, cy) = (page.to_pdf_x(x), page.to_pdf_y(y));
        page.graphics()
            .set_fill_color(fill)
            .set_stroke_color(stroke)
            .ellipse(cx, cy, rx, ry)
            .paint(style);
        self
    }

    /// Closed polygon through `points`. Fewer than two points draw nothing.
    pub fn polygon(&mut self, points: &[(f64, f64)], style: PaintStyle) -> &mut Self {
        if points.len() < 2 {
            return self;
        }
        let (fill, stroke) = (self.style.fill_color, self.style.stroke_color);
        let page = self.current_page_mut();
        let converted: Vec<Point> = points
            .iter()
            .map(|&(x, y)| Point::new(page.to_pdf_x(x), page.to_pdf_y(y)))
            .collect();
        page.graphics()
            .set_fill_color(fill)
            .set_stroke_color(stroke)
            .polygon(&converted)
            .paint(style);
        self
    }

    /// Fill color for shapes drawn after this call.
    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.style.fill_color = color;
        self
    }

    /// Stroke color for lines and outlines drawn after this call.
    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.style.stroke_color = color;
        self
    }

    /// Color of text written after this call.
    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.style.text_color = color;
        self
    }

    /// Sets the stroke width in points.
    ///
    /// Line state is written to the current page immediately and to every
    /// page added later.
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.style.line_width = width;
        if let Some(page) = self.existing_page_mut() {
            page.graphics().set_line_width(width);
        }
        self
    }

    /// Sets the line cap style. See [`Document::set_line_width`].
    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        self.style.line_cap = cap;
        if let Some(page) = self.existing_page_mut() {
            page.graphics().set_line_cap(cap);
        }
        self
    }

    /// Sets the line join style.
    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        self.style.line_join = join;
        if let Some(page) = self.existing_page_mut() {
            page.graphics().set_line_join(join);
        }
        self
    }

    /// Sets the dash pattern; [`DashPattern::solid`] turns dashing off.
    pub fn set_dash_pattern(&mut self, pattern: DashPattern) -> &mut Self {
        if let Some(page) = self.existing_page_mut() {
            page.graphics().set_dash_pattern(&pattern);
        }
        self.style.dash_pattern = pattern;
        self
    }

    /// Gets the current fill color.
    pub fn fill_color(&self) -> Color {
        self.style.fill_color
    }

    /// Gets the current stroke color.
    pub fn stroke_color(&self) -> Color {
        self.style.stroke_color
    }

    /// Gets the current text color.
    pub fn text_color(&self) -> Color {
        self.style.text_color
    }

    /// Gets the current line width.
    pub fn line_width(&self) -> f64 {
        self.style.line_width
    }

    // Graphics state

    /// Emits `q` on the current page and remembers the style state.
    pub fn save_state(&mut self) -> &mut Self {
        let index = self.ensure_page();
        self.pages[index].graphics().save_state();
        self.saved_states.push(SavedState {
            page: index,
            style: self.style.clone(),
        });
        self
    }

    /// Emits `Q` on the page that received the matching `q`. Without a
    /// matching save this does nothing.
    ///
    /// When the current page is a different one, its `Q` cannot reach it,
    /// so the restored line state is written there explicitly.
    pub fn restore_state(&mut self) -> &mut Self {
        if let Some(saved) = self.saved_states.pop() {
            if let Some(page) = self.pages.get_mut(saved.page) {
                page.graphics().restore_state();
            }
            let discarded = std::mem::replace(&mut self.style, saved.style);
            if self.current_page != Some(saved.page) {
                let restored = self.style.clone();
                if let Some(page) = self.existing_page_mut() {
                    discarded.emit_line_changes(&restored, page);
                }
            }
        }
        self
    }

    /// Runs `f` inside a `q … Q` pair. Saves left open by `f` are closed too.
    pub fn with_state<F>(&mut self, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let depth = self.saved_states.len();
        self.save_state();
        f(self);
        while self.saved_states.len() > depth {
            self.restore_state();
        }
        self
    }

    /// Runs `f` with the origin shifted right by `dx` and down by `dy`.
    pub fn translate<F>(&mut self, dx: f64, dy: f64, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.with_state(|doc| {
            doc.apply_transform(Matrix::translation(dx, -dy));
            f(doc);
        })
    }

    /// Runs `f` scaled by `(sx, sy)` about the content area's top-left corner.
    pub fn scale<F>(&mut self, sx: f64, sy: f64, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.with_state(|doc| {
            let origin = doc.pdf_point(0.0, 0.0);
            let matrix = Matrix::translation(-origin.x, -origin.y)
                .then(&Matrix::scaling(sx, sy))
                .then(&Matrix::translation(origin.x, origin.y));
            doc.apply_transform(matrix);
            f(doc);
        })
    }

    /// Runs `f` rotated by `degrees` (counter-clockwise on the page) about
    /// the content point `(cx, cy)`.
    pub fn rotate<F>(&mut self, degrees: f64, cx: f64, cy: f64, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.with_state(|doc| {
            let pivot = doc.pdf_point(cx, cy);
            doc.apply_transform(Matrix::rotation_about(degrees, pivot));
            f(doc);
        })
    }

    fn apply_transform(&mut self, matrix: Matrix) {
        self.current_page_mut().graphics().transform(&matrix);
    }

    // Images

    /// Registers an image and returns its resource name (`Im1`, `Im2`, ...).
    pub fn add_image(&mut self, image: Image) -> String {
        let name = format!("Im{}", self.images.len() + 1);
        self.images.insert(name.clone(), image);
        name
    }

    /// Looks up a registered image by its resource name.
    pub fn image_by_name(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    /// Draws a registered image with its top-left corner at `(x, y)`.
    ///
    /// A zero width or height is derived from the other using the image's
    /// aspect ratio; both zero uses the pixel size as points. Unknown names
    /// are logged and skipped.
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let Some(image) = self.images.get(name) else {
            tracing::warn!(name, "image not registered, skipping");
            return self;
        };
        let ratio = image.aspect_ratio();
        let (width, height) = match (width > 0.0, height > 0.0) {
            (true, true) => (width, height),
            (true, false) => (width, width / ratio),
            (false, true) => (height * ratio, height),
            (false, false) => (image.width() as f64, image.height() as f64),
        };

        let page = self.current_page_mut();
        let (px, py) = (page.to_pdf_x(x), page.to_pdf_y(y + height));
        page.graphics().draw_image(name, px, py, width, height);
        self
    }

    /// Embeds a decoded image and draws it. See [`Document::draw_image`] for sizing.
    pub fn image(&mut self, img: &DynamicImage, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let image = Image::from_dynamic(img)?;
        Ok(self.place_image(image, x, y, width, height))
    }

    /// Decodes PNG or JPEG bytes, embeds and draws them. The document is
    /// untouched when decoding fails.
    pub fn image_from_bytes(&mut self, bytes: &[u8], x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let image = Image::from_bytes(bytes)?;
        Ok(self.place_image(image, x, y, width, height))
    }

    /// Reads PNG or JPEG data from `reader`, then embeds and draws it.
    pub fn image_from_reader<R: Read>(&mut self, reader: R, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let image = Image::from_reader(reader)?;
        Ok(self.place_image(image, x, y, width, height))
    }

    /// Loads a PNG or JPEG file, then embeds and draws it.
    pub fn image_from_file<P: AsRef<Path>>(&mut self, path: P, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let image = Image::from_file(path)?;
        Ok(self.place_image(image, x, y, width, height))
    }

    /// Accepts plain base64 or a `data:image/...;base64,` URI.
    pub fn image_from_base64(&mut self, encoded: &str, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        let image = Image::from_base64(encoded)?;
        Ok(self.place_image(image, x, y, width, height))
    }

    fn place_image(&mut self, image: Image, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let name = self.add_image(image);
        self.draw_image(&name, x, y, width, height)
    }

    // Fonts and text

    /// Selects a font by logical name. Unknown names fall back to Helvetica.
    ///
    /// Accepts base font names (`Times-Bold`), families and aliases
    /// (`courier`, `arial`, `serif`), family plus style (`times italic`) and
    /// bare styles (`bold`) applied to the current family.
    pub fn set_font(&mut self, name: &str, size: f64) -> &mut Self {
        let font = match Font::from_name(name, self.font.family()) {
            Some(font) => font,
            None => {
                tracing::warn!(font = name, "unknown font, falling back to Helvetica");
                Font::Helvetica
            }
        };
        self.use_font(font, size)
    }

    /// Like [`Document::set_font`] but rejects unknown names, leaving the
    /// current font unchanged.
    pub fn try_set_font(&mut self, name: &str, size: f64) -> Result<&mut Self> {
        let font = Font::from_name(name, self.font.family())
            .ok_or_else(|| PdfError::FontError(format!("unknown font '{name}'")))?;
        Ok(self.use_font(font, size))
    }

    /// Selects a standard font directly.
    pub fn use_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.font = font;
        self.font_size = size;
        self
    }

    /// Switches to another style of the current family.
    pub fn set_font_style(&mut self, style: FontStyle) -> &mut Self {
        self.font = self.font.with_style(style);
        self
    }

    /// Sets the font size in points.
    pub fn set_font_size(&mut self, size: f64) -> &mut Self {
        self.font_size = size;
        self
    }

    /// Line-height multiplier (line advance is `font_size * line_height`).
    pub fn set_line_height(&mut self, multiplier: f64) -> &mut Self {
        self.line_height = multiplier;
        self
    }

    /// Gets the current font.
    pub fn font(&self) -> Font {
        self.font
    }

    /// Gets the current font size.
    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Gets the line-height multiplier.
    pub fn line_height(&self) -> f64 {
        self.line_height
    }

    /// Estimated width of `text` in the current font and size.
    pub fn text_width(&self, text: &str) -> f64 {
        measure_text(text, self.font, self.font_size)
    }

    /// Writes one line at the cursor and advances to the next line.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let (x, y) = (self.cursor.x, self.cursor.y);
        self.emit_text(self.run(text, x, y));
        self.new_line()
    }

    /// Writes one line whose box has its top-left corner at `(x, y)`.
    /// The cursor does not move.
    pub fn text_at(&mut self, x: f64, y: f64, text: &str) -> &mut Self {
        self.emit_text(self.run(text, x, y));
        self
    }

    /// Writes one line aligned within the space right of the cursor, then
    /// advances to the next line.
    pub fn text_aligned(&mut self, text: &str, align: TextAlign) -> &mut Self {
        let available = self.content_width() - self.cursor.x;
        let offset = align.offset(self.text_width(text), available);
        let (x, y) = (self.cursor.x + offset, self.cursor.y);
        self.emit_text(self.run(text, x, y));
        self.new_line()
    }

    /// Left-aligned [`Document::paragraph_aligned`].
    pub fn paragraph(&mut self, text: &str) -> &mut Self {
        self.paragraph_aligned(text, TextAlign::Left)
    }

    /// Word-wraps `text` to the space right of the cursor, adding pages as
    /// lines reach the bottom margin.
    pub fn paragraph_aligned(&mut self, text: &str, align: TextAlign) -> &mut Self {
        let left = self.cursor.x;
        let available = self.content_width() - left;
        let advance = self.line_advance();

        for line in wrap_text(text, self.font, self.font_size, available) {
            if self.current_page.is_some()
                && self.cursor.y > 0.0
                && self.cursor.y + advance > self.content_height()
            {
                self.add_page();
            }

            let x = left + align.offset(line.width, available);
            let word_spacing = match align {
                TextAlign::Justified => line.justify_spacing(available),
                _ => None,
            };
            let y = self.cursor.y;
            self.emit_text(TextRun {
                word_spacing,
                ..self.run(&line.text, x, y)
            });
            self.cursor.y += advance;
        }

        self.cursor.x = left;
        self
    }

    // Tables

    /// Starts a table at the cursor with explicit column widths.
    pub fn table(&mut self, column_widths: &[f64]) -> Table<'_> {
        Table::new(self, column_widths.to_vec())
    }

    /// Starts a table whose `columns` share the width right of the cursor.
    pub fn table_columns(&mut self, columns: usize) -> Table<'_> {
        let columns = columns.max(1);
        let width = (self.content_width() - self.cursor.x) / columns as f64;
        Table::new(self, vec![width; columns])
    }

    // Output

    /// Serializes the document to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut pdf_writer = PdfWriter::with_config(writer, self.writer_config);
        pdf_writer.write_document(self)
    }

    /// Saves the document to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Serializes the document into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    // Internals shared with the table engine and the writer

    pub(crate) fn images(&self) -> impl Iterator<Item = (&String, &Image)> {
        self.images.iter()
    }

    pub(crate) fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }

    /// Index of the current page, adding the first page if there is none.
    pub(crate) fn ensure_page(&mut self) -> usize {
        match self.current_page {
            Some(index) => index,
            None => {
                self.add_page();
                self.pages.len() - 1
            }
        }
    }

    pub(crate) fn emit_text(&mut self, run: TextRun<'_>) {
        if run.text.is_empty() {
            return;
        }
        let page = self.current_page_mut();
        let x = page.to_pdf_x(run.x);
        let y = page.to_pdf_y(run.y + run.size * ASCENT);

        let graphics = page.graphics();
        graphics
            .begin_text()
            .set_font(run.font, run.size)
            .set_text_color(run.color);
        if let Some(spacing) = run.word_spacing {
            graphics.set_word_spacing(spacing);
        }
        graphics.set_text_position(x, y).show_text(run.text);
        if run.word_spacing.is_some() {
            graphics.set_word_spacing(0.0);
        }
        graphics.end_text();
    }

    fn run<'a>(&self, text: &'a str, x: f64, y: f64) -> TextRun<'a> {
        TextRun {
            text,
            x,
            y,
            font: self.font,
            size: self.font_size,
            color: self.style.text_color,
            word_spacing: None,
        }
    }

    fn current_page_mut(&mut self) -> &mut Page {
        let index = self.ensure_page();
        &mut self.pages[index]
    }

    fn existing_page_mut(&mut self) -> Option<&mut Page> {
        self.current_page.and_then(|index| self.pages.get_mut(index))
    }

    fn pdf_point(&mut self, x: f64, y: f64) -> Point {
        let page = self.current_page_mut();
        Point::new(page.to_pdf_x(x), page.to_pdf_y(y))
    }

    fn active_page(&self) -> Option<&Page> {
        self.current_page.and_then(|index| self.pages.get(index))
    }

    fn active_margins(&self) -> Margins {
        self.active_page()
            .map(|page| *page.margins())
            .unwrap_or(self.margins)
    }

    fn active_size(&self) -> (f64, f64) {
        match self.active_page() {
            Some(page) => (page.width(), page.height()),
            None => self.page_size.oriented(self.orientation),
        }
    }

    /// Re-emits non-default line state on a fresh page, whose graphics
    /// state starts from the PDF defaults.
    fn apply_line_style(&self, page: &mut Page) {
        GraphicsState::default().emit_line_changes(&self.style, page);
    }
}

impl GraphicsState {
    /// Emits the line operators that take `page` from `self` to `target`.
    fn emit_line_changes(&self, target: &GraphicsState, page: &mut Page) {
        let graphics = page.graphics();
        if target.line_width != self.line_width {
            graphics.set_line_width(target.line_width);
        }
        if target.line_cap != self.line_cap {
            graphics.set_line_cap(target.line_cap);
        }
        if target.line_join != self.line_join {
            graphics.set_line_join(target.line_join);
        }
        if target.dash_pattern != self.dash_pattern {
            graphics.set_dash_pattern(&target.dash_pattern);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn content(doc: &Document, index: usize) -> String {
        String::from_utf8(doc.pages()[index].content()).unwrap()
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.current_page_index(), None);
        assert_eq!(doc.font(), Font::Helvetica);
        assert_eq!(doc.font_size(), 12.0);
        assert_eq!(doc.line_height(), DEFAULT_LINE_HEIGHT);
        assert_eq!(doc.metadata().creator.as_deref(), Some("pagewright"));
        assert!(doc.metadata().creation_date.is_some());
    }

    #[test]
    fn test_with_config() {
        let doc = Document::with_config(DocumentConfig {
            page_size: PageSize::Letter,
            orientation: Orientation::Landscape,
            margins: Margins::uniform(36.0),
            font: Font::Courier,
            font_size: 9.0,
            line_height: 1.5,
        });
        assert_eq!(doc.font(), Font::Courier);
        assert_eq!(doc.content_width(), 792.0 - 72.0);
        assert_eq!(doc.content_height(), 612.0 - 72.0);
    }

    #[test]
    fn test_metadata_setters() {
        let mut doc = Document::new();
        doc.set_title("Title")
            .set_author("Author")
            .set_subject("Subject")
            .set_keywords("a, b")
            .set_creator("Creator")
            .set_producer("Producer");
        let metadata = doc.metadata();
        assert_eq!(metadata.title.as_deref(), Some("Title"));
        assert_eq!(metadata.author.as_deref(), Some("Author"));
        assert_eq!(metadata.subject.as_deref(), Some("Subject"));
        assert_eq!(metadata.keywords.as_deref(), Some("a, b"));
        assert_eq!(metadata.creator.as_deref(), Some("Creator"));
        assert_eq!(metadata.producer.as_deref(), Some("Producer"));
    }

    #[test]
    fn test_add_page_targets_new_page() {
        let mut doc = Document::new();
        doc.add_page().add_page();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.current_page_index(), Some(1));

        doc.rect(0.0, 0.0, 10.0, 10.0, PaintStyle::Stroke);
        assert!(content(&doc, 0).is_empty());
        assert!(content(&doc, 1).contains(" re\n"));

        doc.set_current_page(0).line(0.0, 0.0, 5.0, 5.0);
        assert!(content(&doc, 0).contains(" l\n"));

        doc.set_current_page(7);
        assert_eq!(doc.current_page_index(), Some(0));
    }

    #[test]
    fn test_drawing_without_page_adds_one() {
        let mut doc = Document::new();
        doc.circle(50.0, 50.0, 10.0, PaintStyle::Fill);
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.current_page_index(), Some(0));
    }

    #[test]
    fn test_page_defaults_apply_to_later_pages_only() {
        let mut doc = Document::new();
        doc.add_page();
        doc.set_page_size(PageSize::Letter)
            .set_orientation(Orientation::Landscape)
            .set_margins_all(20.0);
        doc.add_page();

        assert_eq!(doc.pages()[0].width(), 595.0);
        assert_eq!(doc.pages()[0].margins().left, 72.0);
        assert_eq!(doc.pages()[1].width(), 792.0);
        assert_eq!(doc.pages()[1].height(), 612.0);
        assert_eq!(doc.pages()[1].margins().left, 20.0);
    }

    #[test]
    fn test_add_page_with_explicit_size() {
        let mut doc = Document::new();
        doc.add_page_with(PageSize::A5, Orientation::Portrait);
        assert_eq!(doc.pages()[0].width(), 420.0);
        assert_eq!(doc.content_width(), 420.0 - 144.0);
    }

    #[test]
    fn test_cursor_positions() {
        let mut doc = Document::new();
        doc.add_page();
        assert_eq!(doc.content_position(), (0.0, 0.0));
        assert_eq!(doc.position(), (72.0, 72.0));

        doc.set_position(100.0, 200.0);
        assert_eq!(doc.content_position(), (28.0, 128.0));
        assert_eq!(doc.position(), (100.0, 200.0));

        doc.move_to(10.0, 20.0);
        assert_eq!(doc.position(), (82.0, 92.0));

        doc.move_down(30.0);
        assert_eq!(doc.content_position(), (10.0, 50.0));
        assert_eq!(doc.remaining_height(), 842.0 - 144.0 - 50.0);

        doc.new_line();
        assert_eq!(doc.content_position(), (0.0, 50.0 + 12.0 * 1.2));
    }

    #[test]
    fn test_add_page_resets_cursor() {
        let mut doc = Document::new();
        doc.add_page().move_to(40.0, 300.0).add_page();
        assert_eq!(doc.content_position(), (0.0, 0.0));
    }

    #[test]
    fn test_rect_coordinates_are_converted() {
        let mut doc = Document::new();
        doc.add_page().rect(10.0, 20.0, 100.0, 50.0, PaintStyle::Stroke);
        // x = 72 + 10, y = 842 - 72 - (20 + 50)
        assert!(content(&doc, 0).contains("82.00 700.00 100.00 50.00 re\n"));
    }

    #[test]
    fn test_rgb_colors_emit_both_operators() {
        let mut doc = Document::new();
        doc.add_page()
            .set_fill_color(Color::rgb8(255, 0, 0))
            .set_stroke_color(Color::rgb8(255, 0, 0))
            .rect(0.0, 0.0, 10.0, 10.0, PaintStyle::FillStroke);
        let ops = content(&doc, 0);
        assert!(ops.contains("1.000 0.000 0.000 rg\n"));
        assert!(ops.contains("1.000 0.000 0.000 RG\n"));
        assert!(ops.contains("B\n"));
    }

    #[test]
    fn test_circle_matches_ellipse() {
        let mut a = Document::new();
        a.add_page().circle(100.0, 120.0, 25.0, PaintStyle::Fill);
        let mut b = Document::new();
        b.add_page().ellipse(100.0, 120.0, 25.0, 25.0, PaintStyle::Fill);
        assert_eq!(content(&a, 0), content(&b, 0));
    }

    #[test]
    fn test_polygon_needs_two_points() {
        let mut doc = Document::new();
        doc.polygon(&[(1.0, 1.0)], PaintStyle::Fill);
        assert_eq!(doc.page_count(), 0);

        doc.polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)], PaintStyle::Fill);
        let ops = content(&doc, 0);
        assert_eq!(ops.matches(" l\n").count(), 2);
        assert!(ops.contains("h\n"));
    }

    #[test]
    fn test_line_style_is_reapplied_on_new_pages() {
        let mut doc = Document::new();
        doc.set_line_width(2.0).set_dash_pattern(DashPattern::dashed(3.0));
        doc.add_page();
        let ops = content(&doc, 0);
        assert!(ops.contains("2.00 w\n"));
        assert!(ops.contains("[3.00 3.00] 0.00 d\n"));

        doc.set_line_cap(LineCap::Round).set_line_join(LineJoin::Round);
        let ops = content(&doc, 0);
        assert!(ops.contains("1 J\n"));
        assert!(ops.contains("1 j\n"));
    }

    #[test]
    fn test_save_restore_state_restores_style() {
        let mut doc = Document::new();
        doc.add_page().set_fill_color(Color::red());
        doc.save_state().set_fill_color(Color::blue()).set_line_width(4.0);
        doc.restore_state();
        assert_eq!(doc.fill_color(), Color::red());
        assert_eq!(doc.line_width(), 1.0);
        assert_eq!(content(&doc, 0), "q\n4.00 w\nQ\n");

        // Unmatched restore is a no-op
        doc.restore_state();
        assert_eq!(content(&doc, 0), "q\n4.00 w\nQ\n");
    }

    #[test]
    fn test_scoped_state_closes_on_original_page() {
        let mut doc = Document::new();
        doc.add_page();
        doc.translate(10.0, 20.0, |doc| {
            doc.add_page();
            doc.save_state();
        });

        let first = content(&doc, 0);
        assert!(first.starts_with("q\n1.000000 0.000000 0.000000 1.000000 10.00 -20.00 cm\n"));
        assert!(first.ends_with("Q\n"));
        assert_eq!(content(&doc, 1), "q\nQ\n");
    }

    #[test]
    fn test_restore_across_page_break_resets_line_style() {
        let mut doc = Document::new();
        doc.add_page();
        doc.with_state(|doc| {
            doc.set_line_width(5.0).set_line_cap(LineCap::Round);
            doc.add_page();
        });
        doc.line(0.0, 0.0, 100.0, 0.0);

        assert_eq!(doc.line_width(), 1.0);
        assert_eq!(content(&doc, 0), "q\n5.00 w\n1 J\nQ\n");

        let second = content(&doc, 1);
        assert!(second.starts_with("5.00 w\n1 J\n1.00 w\n0 J\n"));
        let restored = second.find("1.00 w\n").unwrap();
        assert!(second.find(" m\n").unwrap() > restored);
        assert_eq!(second.matches(" w\n").count(), 2);
    }

    #[test]
    fn test_rotate_and_scale_wrap_in_state() {
        let mut doc = Document::new();
        doc.add_page()
            .rotate(90.0, 0.0, 0.0, |doc| {
                doc.line(0.0, 0.0, 10.0, 0.0);
            })
            .scale(2.0, 2.0, |doc| {
                doc.rect(0.0, 0.0, 5.0, 5.0, PaintStyle::Fill);
            });
        let ops = content(&doc, 0);
        assert_eq!(ops.matches("q\n").count(), 2);
        assert_eq!(ops.matches("Q\n").count(), 2);
        assert_eq!(ops.matches(" cm\n").count(), 2);
    }

    #[test]
    fn test_set_font_resolution() {
        let mut doc = Document::new();
        doc.set_font("times", 14.0);
        assert_eq!(doc.font(), Font::TimesRoman);
        assert_eq!(doc.font_size(), 14.0);

        doc.set_font("bold", 14.0);
        assert_eq!(doc.font(), Font::TimesBold);

        doc.set_font_style(FontStyle::Italic);
        assert_eq!(doc.font(), Font::TimesItalic);

        doc.set_font("Wingdings", 10.0);
        assert_eq!(doc.font(), Font::Helvetica);
    }

    #[test]
    fn test_try_set_font_rejects_unknown() {
        let mut doc = Document::new();
        doc.set_font("courier", 10.0);
        let result = doc.try_set_font("no such face", 20.0);
        assert!(matches!(result, Err(PdfError::FontError(_))));
        assert_eq!(doc.font(), Font::Courier);
        assert_eq!(doc.font_size(), 10.0);

        assert!(doc.try_set_font("Times-BoldItalic", 11.0).is_ok());
        assert_eq!(doc.font(), Font::TimesBoldItalic);
    }

    #[test]
    fn test_text_advances_cursor() {
        let mut doc = Document::new();
        doc.add_page().set_font("helvetica", 10.0).text("Hello (world)");

        let ops = content(&doc, 0);
        assert!(ops.contains("BT\n/F1 10.00 Tf\n"));
        // Baseline sits 0.8 * size below the line top
        assert!(ops.contains("72.00 762.00 Td\n"));
        assert!(ops.contains("(Hello \\(world\\)) Tj\n"));
        assert_eq!(doc.content_position(), (0.0, 12.0));
    }

    #[test]
    fn test_text_at_keeps_cursor() {
        let mut doc = Document::new();
        doc.add_page().move_to(5.0, 5.0).text_at(100.0, 100.0, "x");
        assert_eq!(doc.content_position(), (5.0, 5.0));
    }

    #[test]
    fn test_text_aligned_right() {
        let mut doc = Document::new();
        doc.add_page()
            .set_font("courier", 10.0)
            .text_aligned("abcd", TextAlign::Right);
        // Courier 10pt is 6pt per glyph: x = 72 + 451 - 24
        assert!(content(&doc, 0).contains("499.00 "));
    }

    #[test]
    fn test_text_color_is_applied() {
        let mut doc = Document::new();
        doc.set_text_color(Color::rgb8(255, 0, 0)).text("red");
        assert!(content(&doc, 0).contains("1.000 0.000 0.000 rg\n"));
    }

    #[test]
    fn test_paragraph_wraps_and_breaks_pages() {
        let mut doc = Document::new();
        doc.add_page().set_font("courier", 10.0);
        let text = "word ".repeat(2000);
        doc.paragraph(&text);

        assert!(doc.page_count() > 1);
        for page in doc.pages() {
            assert!(page.fonts().contains(&Font::Courier));
        }
        assert!(doc.content_position().1 <= doc.content_height());
    }

    #[test]
    fn test_paragraph_justified_sets_word_spacing() {
        let mut doc = Document::new();
        doc.add_page().set_font("courier", 10.0);
        doc.paragraph_aligned(&"lorem ipsum ".repeat(30), TextAlign::Justified);

        let ops = content(&doc, 0);
        assert!(ops.contains(" Tw\n"));
        assert!(ops.contains("0.00 Tw\n"));
    }

    #[test]
    fn test_draw_unknown_image_is_skipped() {
        let mut doc = Document::new();
        doc.add_page().draw_image("Im9", 0.0, 0.0, 10.0, 10.0);
        assert!(content(&doc, 0).is_empty());
    }

    #[test]
    fn test_malformed_image_leaves_document_untouched() {
        let mut doc = Document::new();
        doc.add_page().text("before");
        let before = content(&doc, 0);

        assert!(doc.image_from_bytes(b"garbage", 0.0, 0.0, 10.0, 10.0).is_err());
        assert!(doc.image_from_base64("%%%", 0.0, 0.0, 10.0, 10.0).is_err());
        assert_eq!(content(&doc, 0), before);
        assert!(doc.image_by_name("Im1").is_none());
    }

    #[test]
    fn test_image_aspect_ratio_sizing() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(40, 20));
        let mut doc = Document::new();
        doc.add_page().image(&img, 0.0, 0.0, 100.0, 0.0).unwrap();
        doc.image(&img, 0.0, 0.0, 0.0, 30.0).unwrap();
        doc.draw_image("Im1", 0.0, 0.0, 0.0, 0.0);

        let ops = content(&doc, 0);
        assert!(ops.contains("100.00 0 0 50.00 "));
        assert!(ops.contains("60.00 0 0 30.00 "));
        assert!(ops.contains("40.00 0 0 20.00 "));
        assert!(ops.contains("/Im1 Do\n"));
        assert!(ops.contains("/Im2 Do\n"));
    }

    #[test]
    fn test_to_bytes_is_repeatable() {
        let mut doc = Document::new();
        doc.add_page().text("same");
        assert_eq!(doc.to_bytes().unwrap(), doc.to_bytes().unwrap());
    }
}
