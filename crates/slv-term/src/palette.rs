//! Severity colours for rendered events.
//!
//! Palettes are TOML documents. The default palette is embedded in the
//! binary via [`include_str!`]; [`Palette::plain`] disables colour
//! entirely, which the binary uses when stdout is not a terminal.

use config::{Config, File, FileFormat};
use crossterm::style::{Attribute, Color, ContentStyle};
use serde::Deserialize;
use slv_core::Severity;

const DEFAULT_PALETTE_SRC: &str = include_str!("palettes/default.toml");

/// Printed in place of a label for severities outside 0–7.
pub const UNKNOWN_SEVERITY: &str = "   ";

// ---------------------------------------------------------------------------
// Raw (serde) types — mirror the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawStyle {
    fg: Option<String>,
    #[serde(default)]
    bold: bool,
}

impl RawStyle {
    fn into_style(self) -> ContentStyle {
        let mut style = ContentStyle::new();
        style.foreground_color = self.fg.as_deref().and_then(parse_color);
        if self.bold {
            style.attributes.set(Attribute::Bold);
        }
        style
    }
}

#[derive(Debug, Deserialize)]
struct RawSeverities {
    emergency: RawStyle,
    alert: RawStyle,
    critical: RawStyle,
    error: RawStyle,
    warning: RawStyle,
    notice: RawStyle,
    info: RawStyle,
    debug: RawStyle,
}

#[derive(Debug, Deserialize)]
struct RawPalette {
    severities: RawSeverities,
}

// ---------------------------------------------------------------------------
// Public Palette type
// ---------------------------------------------------------------------------

/// Pre-resolved styles, indexed by severity ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    severities: [ContentStyle; 8],
}

impl Palette {
    /// Load the embedded default palette.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    pub fn load_default() -> Self {
        Self::from_toml_str(DEFAULT_PALETTE_SRC).expect("embedded default palette must be valid TOML")
    }

    /// No colours or attributes: labels print as bare text.
    pub fn plain() -> Self {
        Self {
            severities: [ContentStyle::new(); 8],
        }
    }

    pub fn from_toml_str(src: &str) -> anyhow::Result<Self> {
        let raw: RawPalette = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        let s = raw.severities;

        Ok(Self {
            severities: [
                s.emergency.into_style(),
                s.alert.into_style(),
                s.critical.into_style(),
                s.error.into_style(),
                s.warning.into_style(),
                s.notice.into_style(),
                s.info.into_style(),
                s.debug.into_style(),
            ],
        })
    }

    pub fn severity_style(&self, severity: Severity) -> ContentStyle {
        self.severities[severity as usize]
    }

    /// Styled three-character label for a raw priority value, blank when
    /// the value is not a known severity.
    pub fn severity_label(&self, priority: i64) -> String {
        match Severity::from_ordinal(priority) {
            Some(sev) => self.severity_style(sev).apply(sev.label()).to_string(),
            None => UNKNOWN_SEVERITY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a crossterm colour name (`dark_red`, `yellow`, …), `#rrggbb`, or
/// `indexed:N`.
fn parse_color(s: &str) -> Option<Color> {
    match s.to_ascii_lowercase().as_str() {
        "black" => Some(Color::Black),
        "dark_grey" | "dark_gray" => Some(Color::DarkGrey),
        "red" => Some(Color::Red),
        "dark_red" => Some(Color::DarkRed),
        "green" => Some(Color::Green),
        "dark_green" => Some(Color::DarkGreen),
        "yellow" => Some(Color::Yellow),
        "dark_yellow" => Some(Color::DarkYellow),
        "blue" => Some(Color::Blue),
        "dark_blue" => Some(Color::DarkBlue),
        "magenta" => Some(Color::Magenta),
        "dark_magenta" => Some(Color::DarkMagenta),
        "cyan" => Some(Color::Cyan),
        "dark_cyan" => Some(Color::DarkCyan),
        "white" => Some(Color::White),
        "grey" | "gray" => Some(Color::Grey),
        s if s.starts_with('#') && s.len() == 7 => {
            let r = u8::from_str_radix(&s[1..3], 16).ok()?;
            let g = u8::from_str_radix(&s[3..5], 16).ok()?;
            let b = u8::from_str_radix(&s[5..7], 16).ok()?;
            Some(Color::Rgb { r, g, b })
        }
        s if s.starts_with("indexed:") => {
            let n: u8 = s["indexed:".len()..].parse().ok()?;
            Some(Color::AnsiValue(n))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
