/// Represents a color in PDF documents.
///
/// Supports RGB, Grayscale, and CMYK color spaces. Components are stored
/// as 0.0–1.0 floats, which is what the content-stream operators take.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// RGB color (red, green, blue) with values from 0.0 to 1.0
    Rgb(f64, f64, f64),
    /// Grayscale color with value from 0.0 (black) to 1.0 (white)
    Gray(f64),
    /// CMYK color (cyan, magenta, yellow, key/black) with values from 0.0 to 1.0
    Cmyk(f64, f64, f64, f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates an RGB color from 8-bit channels (0-255).
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parses `#RGB` or `#RRGGBB` (the `#` is optional).
    ///
    /// Returns `None` for anything else.
    pub fn hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            3 => {
                let mut parts = digits.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Color::rgb8(parts.next()??, parts.next()??, parts.next()??))
            }
            6 => Some(Color::rgb8(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    /// Creates a CMYK color with values clamped to 0.0-1.0.
    pub fn cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        Color::Cmyk(
            c.clamp(0.0, 1.0),
            m.clamp(0.0, 1.0),
            y.clamp(0.0, 1.0),
            k.clamp(0.0, 1.0),
        )
    }

    /// Black color (gray 0.0).
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// White color (gray 1.0).
    pub fn white() -> Self {
        Color::Gray(1.0)
    }

    /// Red color (RGB 1,0,0).
    pub fn red() -> Self {
        Color::Rgb(1.0, 0.0, 0.0)
    }

    /// Green color (RGB 0,1,0).
    pub fn green() -> Self {
        Color::Rgb(0.0, 1.0, 0.0)
    }

    /// Blue color (RGB 0,0,1).
    pub fn blue() -> Self {
        Color::Rgb(0.0, 0.0, 1.0)
    }

    pub fn light_gray() -> Self {
        Color::Gray(0.9)
    }

    /// Operator text for this color, e.g. `1.000 0.000 0.000 RG`.
    pub(crate) fn stroke_operator(&self) -> String {
        match *self {
            Color::Rgb(r, g, b) => format!("{r:.3} {g:.3} {b:.3} RG"),
            Color::Gray(g) => format!("{g:.3} G"),
            Color::Cmyk(c, m, y, k) => format!("{c:.3} {m:.3} {y:.3} {k:.3} K"),
        }
    }

    /// Operator text for this color as a fill, e.g. `1.000 0.000 0.000 rg`.
    pub(crate) fn fill_operator(&self) -> String {
        match *self {
            Color::Rgb(r, g, b) => format!("{r:.3} {g:.3} {b:.3} rg"),
            Color::Gray(g) => format!("{g:.3} g"),
            Color::Cmyk(c, m, y, k) => format!("{c:.3} {m:.3} {y:.3} {k:.3} k"),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}
