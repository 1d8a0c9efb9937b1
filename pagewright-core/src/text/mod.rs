//! Standard fonts, width metrics, WinAnsi encoding, word wrapping and tables.

pub mod encoding;
mod font;
mod layout;
mod metrics;
mod table;

pub use encoding::{encode_win_ansi, literal_string};
pub use font::{Font, FontFamily, FontStyle};
pub use layout::{wrap_text, TextAlign, WrappedLine};
pub use metrics::{measure_char, measure_text, metrics_for, FontMetrics};
pub use table::{Table, TableStyle};
