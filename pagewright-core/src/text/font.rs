/// The 14 standard PDF Type 1 fonts.
///
/// Standard fonts are guaranteed to be available in all PDF readers and are
/// never embedded. Declaration order is registry order, which fixes both the
/// order of font objects in the file and the `F1`..`F14` resource names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Font {
    /// Helvetica (sans-serif)
    #[default]
    Helvetica,
    /// Helvetica Bold
    HelveticaBold,
    /// Helvetica Oblique (italic)
    HelveticaOblique,
    /// Helvetica Bold Oblique
    HelveticaBoldOblique,
    /// Times Roman (serif)
    TimesRoman,
    /// Times Bold
    TimesBold,
    /// Times Italic
    TimesItalic,
    /// Times Bold Italic
    TimesBoldItalic,
    /// Courier (monospace)
    Courier,
    /// Courier Bold
    CourierBold,
    /// Courier Oblique
    CourierOblique,
    /// Courier Bold Oblique
    CourierBoldOblique,
    /// Symbol font (mathematical symbols)
    Symbol,
    /// ZapfDingbats (decorative symbols)
    ZapfDingbats,
}

impl Font {
    /// Every standard font, in registry order.
    pub const ALL: [Font; 14] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::HelveticaOblique,
        Font::HelveticaBoldOblique,
        Font::TimesRoman,
        Font::TimesBold,
        Font::TimesItalic,
        Font::TimesBoldItalic,
        Font::Courier,
        Font::CourierBold,
        Font::CourierOblique,
        Font::CourierBoldOblique,
        Font::Symbol,
        Font::ZapfDingbats,
    ];

    /// The `/BaseFont` name
    pub fn base_font(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
            Font::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Font::TimesRoman => "Times-Roman",
            Font::TimesBold => "Times-Bold",
            Font::TimesItalic => "Times-Italic",
            Font::TimesBoldItalic => "Times-BoldItalic",
            Font::Courier => "Courier",
            Font::CourierBold => "Courier-Bold",
            Font::CourierOblique => "Courier-Oblique",
            Font::CourierBoldOblique => "Courier-BoldOblique",
            Font::Symbol => "Symbol",
            Font::ZapfDingbats => "ZapfDingbats",
        }
    }

    /// Name used in page `/Font` resource dictionaries (`F1`, `F2`, ...).
    pub fn resource_name(&self) -> String {
        format!("F{}", *self as usize + 1)
    }

    /// Check if this font is symbolic (doesn't use text encodings)
    pub fn is_symbolic(&self) -> bool {
        matches!(self, Font::Symbol | Font::ZapfDingbats)
    }

    pub fn family(&self) -> FontFamily {
        match self {
            Font::Helvetica
            | Font::HelveticaBold
            | Font::HelveticaOblique
            | Font::HelveticaBoldOblique => FontFamily::Helvetica,
            Font::TimesRoman | Font::TimesBold | Font::TimesItalic | Font::TimesBoldItalic => {
                FontFamily::Times
            }
            Font::Courier | Font::CourierBold | Font::CourierOblique | Font::CourierBoldOblique => {
                FontFamily::Courier
            }
            Font::Symbol => FontFamily::Symbol,
            Font::ZapfDingbats => FontFamily::ZapfDingbats,
        }
    }

    pub fn style(&self) -> FontStyle {
        match self {
            Font::HelveticaBold | Font::TimesBold | Font::CourierBold => FontStyle::Bold,
            Font::HelveticaOblique | Font::TimesItalic | Font::CourierOblique => FontStyle::Italic,
            Font::HelveticaBoldOblique | Font::TimesBoldItalic | Font::CourierBoldOblique => {
                FontStyle::BoldItalic
            }
            _ => FontStyle::Regular,
        }
    }

    /// Same family in another style. Symbolic fonts have no styles.
    pub fn with_style(&self, style: FontStyle) -> Font {
        self.family().with_style(style)
    }

    /// Resolves a logical font request.
    ///
    /// Accepts base font names (`Helvetica-Bold`), family names and aliases
    /// (`times`, `arial`, `mono`), family plus style (`times bold`,
    /// `courier-italic`) and bare styles (`bold`), which apply to `current`.
    /// Matching is case-insensitive.
    pub fn from_name(name: &str, current: FontFamily) -> Option<Font> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        if normalized.is_empty() {
            return None;
        }

        if let Some(font) = Font::ALL
            .iter()
            .find(|font| font.base_font().eq_ignore_ascii_case(&normalized))
        {
            return Some(*font);
        }
        if let Some(style) = FontStyle::parse(&normalized) {
            return Some(current.with_style(style));
        }
        if let Some(family) = FontFamily::parse(&normalized) {
            return Some(family.regular());
        }

        // Longest family prefix wins, the rest must be a style
        let tokens = tokenize(&normalized);
        (1..tokens.len()).rev().find_map(|split| {
            let family = FontFamily::parse(&tokens[..split].join(" "))?;
            let style = FontStyle::parse(&tokens[split..].join(" "))?;
            Some(family.with_style(style))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
    Symbol,
    ZapfDingbats,
}

impl FontFamily {
    pub fn regular(self) -> Font {
        self.with_style(FontStyle::Regular)
    }

    pub fn bold(self) -> Font {
        self.with_style(FontStyle::Bold)
    }

    pub fn italic(self) -> Font {
        self.with_style(FontStyle::Italic)
    }

    pub fn bold_italic(self) -> Font {
        self.with_style(FontStyle::BoldItalic)
    }

    pub fn with_style(self, style: FontStyle) -> Font {
        match (self, style) {
            (FontFamily::Helvetica, FontStyle::Regular) => Font::Helvetica,
            (FontFamily::Helvetica, FontStyle::Bold) => Font::HelveticaBold,
            (FontFamily::Helvetica, FontStyle::Italic) => Font::HelveticaOblique,
            (FontFamily::Helvetica, FontStyle::BoldItalic) => Font::HelveticaBoldOblique,
            (FontFamily::Times, FontStyle::Regular) => Font::TimesRoman,
            (FontFamily::Times, FontStyle::Bold) => Font::TimesBold,
            (FontFamily::Times, FontStyle::Italic) => Font::TimesItalic,
            (FontFamily::Times, FontStyle::BoldItalic) => Font::TimesBoldItalic,
            (FontFamily::Courier, FontStyle::Regular) => Font::Courier,
            (FontFamily::Courier, FontStyle::Bold) => Font::CourierBold,
            (FontFamily::Courier, FontStyle::Italic) => Font::CourierOblique,
            (FontFamily::Courier, FontStyle::BoldItalic) => Font::CourierBoldOblique,
            (FontFamily::Symbol, _) => Font::Symbol,
            (FontFamily::ZapfDingbats, _) => Font::ZapfDingbats,
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match tokenize(name).join(" ").as_str() {
            "helvetica" | "arial" | "sans" | "sans serif" | "sansserif" | "helvetica neue" => {
                Some(FontFamily::Helvetica)
            }
            "times" | "times roman" | "times new roman" | "timesnewroman" | "serif" => {
                Some(FontFamily::Times)
            }
            "courier" | "courier new" | "mono" | "monospace" | "monospaced" => {
                Some(FontFamily::Courier)
            }
            "symbol" => Some(FontFamily::Symbol),
            "zapfdingbats" | "zapf dingbats" | "dingbats" => Some(FontFamily::ZapfDingbats),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }

    fn parse(name: &str) -> Option<Self> {
        match tokenize(name).join(" ").as_str() {
            "regular" | "normal" | "plain" | "roman" => Some(FontStyle::Regular),
            "bold" => Some(FontStyle::Bold),
            "italic" | "oblique" => Some(FontStyle::Italic),
            "bold italic" | "bolditalic" | "bold oblique" | "boldoblique" | "italic bold" => {
                Some(FontStyle::BoldItalic)
            }
            _ => None,
        }
    }
}

fn tokenize(name: &str) -> Vec<&str> {
    name.split(|c: char| c == '-' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}
