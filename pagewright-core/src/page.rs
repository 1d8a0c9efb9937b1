use crate::graphics::GraphicsContext;
use crate::text::Font;
use std::collections::BTreeSet;

/// Page margins in points (1/72 inch).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    /// Left margin
    pub left: f64,
    /// Right margin
    pub right: f64,
    /// Top margin
    pub top: f64,
    /// Bottom margin
    pub bottom: f64,
}

impl Margins {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Same margin on all four sides.
    pub fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(72.0) // 1 inch
    }
}

/// Standard paper sizes, portrait dimensions in points.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// `(width, height)` in portrait orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        match *self {
            PageSize::A3 => (842.0, 1191.0),
            PageSize::A4 => (595.0, 842.0),
            PageSize::A5 => (420.0, 595.0),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (width, height),
        }
    }

    /// `(width, height)` after applying `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions();
        match orientation {
            Orientation::Portrait => (w.min(h), w.max(h)),
            Orientation::Landscape => (w.max(h), w.min(h)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// A single page in a PDF document.
///
/// Size and margins are fixed when the page is created. Drawing happens
/// through the page's [`GraphicsContext`], in PDF user space.
#[derive(Clone, Debug)]
pub struct Page {
    width: f64,
    height: f64,
    orientation: Orientation,
    margins: Margins,
    graphics_context: GraphicsContext,
}

impl Page {
    pub fn new(size: PageSize, orientation: Orientation, margins: Margins) -> Self {
        let (width, height) = size.oriented(orientation);
        Self {
            width,
            height,
            orientation,
            margins,
            graphics_context: GraphicsContext::new(),
        }
    }

    /// Creates a new A4 page (595 x 842 points).
    pub fn a4() -> Self {
        Self::new(PageSize::A4, Orientation::Portrait, Margins::default())
    }

    /// Creates a new US Letter page (612 x 792 points).
    pub fn letter() -> Self {
        Self::new(PageSize::Letter, Orientation::Portrait, Margins::default())
    }

    /// Returns a mutable reference to the graphics context for drawing.
    pub fn graphics(&mut self) -> &mut GraphicsContext {
        &mut self.graphics_context
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn margins(&self) -> &Margins {
        &self.margins
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// Content-area x (left origin) to PDF x.
    pub fn to_pdf_x(&self, x: f64) -> f64 {
        self.margins.left + x
    }

    /// Content-area y (top origin, growing down) to PDF y.
    pub fn to_pdf_y(&self, y: f64) -> f64 {
        self.height - self.margins.top - y
    }

    /// Fonts this page's content refers to.
    pub fn fonts(&self) -> &BTreeSet<Font> {
        self.graphics_context.fonts()
    }

    /// Image XObject names this page's content refers to.
    pub fn images(&self) -> &BTreeSet<String> {
        self.graphics_context.images()
    }

    pub(crate) fn content(&self) -> Vec<u8> {
        self.graphics_context.generate_operations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margins_default() {
        let margins = Margins::default();
        assert_eq!(margins.left, 72.0);
        assert_eq!(margins.right, 72.0);
        assert_eq!(margins.top, 72.0);
        assert_eq!(margins.bottom, 72.0);
    }

    #[test]
    fn test_margins_new_order() {
        let margins = Margins::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(margins.top, 10.0);
        assert_eq!(margins.right, 20.0);
        assert_eq!(margins.bottom, 30.0);
        assert_eq!(margins.left, 40.0);
    }

    #[test]
    fn test_page_sizes() {
        assert_eq!(PageSize::A4.dimensions(), (595.0, 842.0));
        assert_eq!(PageSize::Letter.dimensions(), (612.0, 792.0));
        assert_eq!(PageSize::Legal.dimensions(), (612.0, 1008.0));
        assert_eq!(PageSize::A3.dimensions(), (842.0, 1191.0));
        assert_eq!(PageSize::A5.dimensions(), (420.0, 595.0));
        assert_eq!(
            PageSize::Custom {
                width: 300.0,
                height: 400.0
            }
            .dimensions(),
            (300.0, 400.0)
        );
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        assert_eq!(PageSize::A4.oriented(Orientation::Landscape), (842.0, 595.0));
        assert_eq!(PageSize::A4.oriented(Orientation::Portrait), (595.0, 842.0));
        let wide = PageSize::Custom {
            width: 500.0,
            height: 200.0,
        };
        assert_eq!(wide.oriented(Orientation::Portrait), (200.0, 500.0));
    }

    #[test]
    fn test_page_new() {
        let page = Page::new(PageSize::Letter, Orientation::Landscape, Margins::uniform(36.0));
        assert_eq!(page.width(), 792.0);
        assert_eq!(page.height(), 612.0);
        assert_eq!(page.orientation(), Orientation::Landscape);
        assert_eq!(page.content_width(), 720.0);
        assert_eq!(page.content_height(), 540.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let page = Page::a4();
        assert_eq!(page.to_pdf_x(0.0), 72.0);
        assert_eq!(page.to_pdf_y(0.0), 842.0 - 72.0);
        assert_eq!(page.to_pdf_x(100.0), 172.0);
        assert_eq!(page.to_pdf_y(100.0), 670.0);
    }

    #[test]
    fn test_resources_follow_graphics() {
        let mut page = Page::a4();
        page.graphics()
            .begin_text()
            .set_font(Font::Courier, 10.0)
            .show_text("x")
            .end_text()
            .draw_image("Im1", 0.0, 0.0, 10.0, 10.0);

        assert!(page.fonts().contains(&Font::Courier));
        assert!(page.images().contains("Im1"));
        assert!(!page.content().is_empty());
    }
}
