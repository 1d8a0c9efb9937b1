/// How a closed shape is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaintStyle {
    /// Outline only (`S`)
    #[default]
    Stroke,
    /// Interior only (`f`)
    Fill,
    /// Interior and outline (`B`)
    FillStroke,
}

impl PaintStyle {
    pub(crate) fn operator(&self) -> &'static str {
        match self {
            PaintStyle::Stroke => "S",
            PaintStyle::Fill => "f",
            PaintStyle::FillStroke => "B",
        }
    }

    pub(crate) fn fills(&self) -> bool {
        matches!(self, PaintStyle::Fill | PaintStyle::FillStroke)
    }

    pub(crate) fn strokes(&self) -> bool {
        matches!(self, PaintStyle::Stroke | PaintStyle::FillStroke)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineCap {
    Butt = 0,
    Round = 1,
    Square = 2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineJoin {
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// Dash pattern for stroked lines (`d` operator).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    /// Alternating on/off lengths; empty means a solid line
    pub array: Vec<f64>,
    /// Offset into the pattern at which to start
    pub phase: f64,
}

impl DashPattern {
    pub fn solid() -> Self {
        Self::default()
    }

    pub fn new(array: Vec<f64>, phase: f64) -> Self {
        Self { array, phase }
    }

    /// Equal dash and gap of `length`.
    pub fn dashed(length: f64) -> Self {
        Self::new(vec![length, length], 0.0)
    }

    pub(crate) fn operator(&self) -> String {
        let lengths: Vec<String> = self.array.iter().map(|v| format!("{v:.2}")).collect();
        format!("[{}] {:.2} d", lengths.join(" "), self.phase)
    }
}
