mod color;
mod image;
mod path;

pub use color::Color;
pub use image::{ColorSpace as ImageColorSpace, Image, JPEG_QUALITY};
pub use path::{DashPattern, LineCap, LineJoin, PaintStyle};

use crate::geometry::{Matrix, Point};
use crate::text::{encoding, Font};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Control-point ratio for approximating a quarter ellipse with one cubic
/// Bézier segment: 4/3 * (sqrt(2) - 1).
pub const BEZIER_CIRCLE_K: f64 = 0.552284749831;

/// Raw content-stream emitter for one page.
///
/// Coordinates are PDF user space (origin bottom-left). Everything is
/// appended to an in-memory operator buffer; nothing here can fail.
#[derive(Clone, Debug)]
pub struct GraphicsContext {
    operations: String,
    fill_color: Color,
    stroke_color: Color,
    line_width: f64,
    state_depth: usize,
    fonts: BTreeSet<Font>,
    images: BTreeSet<String>,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
            state_depth: 0,
            fonts: BTreeSet::new(),
            images: BTreeSet::new(),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{x:.2} {y:.2} m");
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{x:.2} {y:.2} l");
        self
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        let _ = writeln!(
            &mut self.operations,
            "{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x3:.2} {y3:.2} c"
        );
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        let _ = writeln!(
            &mut self.operations,
            "{x:.2} {y:.2} {width:.2} {height:.2} re"
        );
        self
    }

    /// Four-segment Bézier ellipse, starting and ending at the rightmost point.
    pub fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> &mut Self {
        let kx = BEZIER_CIRCLE_K * rx;
        let ky = BEZIER_CIRCLE_K * ry;

        self.move_to(cx + rx, cy);
        self.curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
        self.curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
        self.curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
        self.curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
        self.close_path()
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        self.ellipse(cx, cy, radius, radius)
    }

    /// Closed polygon path through `points`. Fewer than two points emit nothing.
    pub fn polygon(&mut self, points: &[Point]) -> &mut Self {
        if points.len() < 2 {
            return self;
        }
        self.move_to(points[0].x, points[0].y);
        for point in &points[1..] {
            self.line_to(point.x, point.y);
        }
        self.close_path()
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.operations.push_str("h\n");
        self
    }

    /// Applies the colors the style needs, then the painting operator.
    pub fn paint(&mut self, style: PaintStyle) -> &mut Self {
        if style.fills() {
            self.apply_fill_color();
        }
        if style.strokes() {
            self.apply_stroke_color();
        }
        self.operations.push_str(style.operator());
        self.operations.push('\n');
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.paint(PaintStyle::Stroke)
    }

    pub fn fill(&mut self) -> &mut Self {
        self.paint(PaintStyle::Fill)
    }

    pub fn fill_stroke(&mut self) -> &mut Self {
        self.paint(PaintStyle::FillStroke)
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.stroke_color = color;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.fill_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.line_width = width;
        let _ = writeln!(&mut self.operations, "{width:.2} w");
        self
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{} J", cap as u8);
        self
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{} j", join as u8);
        self
    }

    pub fn set_dash_pattern(&mut self, pattern: &DashPattern) -> &mut Self {
        self.operations.push_str(&pattern.operator());
        self.operations.push('\n');
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.state_depth += 1;
        self.operations.push_str("q\n");
        self
    }

    /// Emits `Q`. An unmatched restore is dropped so the stream stays balanced.
    pub fn restore_state(&mut self) -> &mut Self {
        if self.state_depth == 0 {
            return self;
        }
        self.state_depth -= 1;
        self.operations.push_str("Q\n");
        self
    }

    pub fn transform(&mut self, m: &Matrix) -> &mut Self {
        let _ = writeln!(
            &mut self.operations,
            "{:.6} {:.6} {:.6} {:.6} {:.2} {:.2} cm",
            m.a, m.b, m.c, m.d, m.e, m.f
        );
        self
    }

    pub fn translate(&mut self, tx: f64, ty: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "1 0 0 1 {tx:.2} {ty:.2} cm");
        self
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{sx:.2} 0 0 {sy:.2} 0 0 cm");
        self
    }

    /// Counter-clockwise rotation about the current origin, in degrees.
    pub fn rotate(&mut self, degrees: f64) -> &mut Self {
        self.transform(&Matrix::rotation(degrees))
    }

    /// Paints image XObject `name` into the box with lower-left corner `(x, y)`.
    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.images.insert(name.to_string());
        self.save_state();
        let _ = writeln!(
            &mut self.operations,
            "{width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm"
        );
        let _ = writeln!(&mut self.operations, "/{name} Do");
        self.restore_state()
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.operations.push_str("BT\n");
        self
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.operations.push_str("ET\n");
        self
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.fonts.insert(font);
        let _ = writeln!(
            &mut self.operations,
            "/{} {size:.2} Tf",
            font.resource_name()
        );
        self
    }

    pub fn set_text_color(&mut self, color: Color) -> &mut Self {
        self.operations.push_str(&color.fill_operator());
        self.operations.push('\n');
        self
    }

    pub fn set_text_position(&mut self, x: f64, y: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{x:.2} {y:.2} Td");
        self
    }

    pub fn set_word_spacing(&mut self, spacing: f64) -> &mut Self {
        let _ = writeln!(&mut self.operations, "{spacing:.2} Tw");
        self
    }

    /// Shows `text` as a WinAnsi-encoded literal string.
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.operations.push_str(&encoding::literal_string(text));
        self.operations.push_str(" Tj\n");
        self
    }

    fn apply_stroke_color(&mut self) {
        self.operations.push_str(&self.stroke_color.stroke_operator());
        self.operations.push('\n');
    }

    fn apply_fill_color(&mut self) {
        self.operations.push_str(&self.fill_color.fill_operator());
        self.operations.push('\n');
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }

    /// Fonts selected with `set_font` so far.
    pub fn fonts(&self) -> &BTreeSet<Font> {
        &self.fonts
    }

    /// Image XObject names painted so far.
    pub fn images(&self) -> &BTreeSet<String> {
        &self.images
    }

    /// Number of `q` operators not yet matched by `Q`.
    pub fn state_depth(&self) -> usize {
        self.state_depth
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn operations(&self) -> &str {
        &self.operations
    }
}
