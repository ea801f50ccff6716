//! CSS-like style tokens mapped onto terminal styles.

use console::{Color, Style};

/// The declarations of a style token that a terminal can show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSpec {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub italic: bool,
}

impl StyleSpec {
    /// Parse `name: value` declarations separated by `;`.
    ///
    /// Unknown properties and colors are ignored.
    pub fn parse(token: &str) -> Self {
        let mut spec = Self::default();
        for declaration in token.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim().to_lowercase();
            match name.trim().to_lowercase().as_str() {
                "color" => spec.fg = named_color(&value),
                "background-color" | "background" => spec.bg = named_color(&value),
                "font-weight" => {
                    spec.bold = value == "bold" || value.parse::<u16>().is_ok_and(|w| w >= 600);
                }
                "font-style" => spec.italic = value == "italic" || value == "oblique",
                _ => {}
            }
        }
        spec
    }

    pub fn to_console_style(&self) -> Style {
        let mut style = Style::new();
        if let Some(fg) = self.fg {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.bold();
        }
        if self.italic {
            style = style.italic();
        }
        style
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" | "maroon" | "crimson" => Color::Red,
        "green" | "lime" => Color::Green,
        "yellow" | "orange" | "gold" => Color::Yellow,
        "blue" | "navy" => Color::Blue,
        "magenta" | "purple" | "hotpink" | "pink" | "fuchsia" => Color::Magenta,
        "cyan" | "teal" | "aqua" => Color::Cyan,
        "white" => Color::White,
        "grey" | "gray" | "silver" => Color::Color256(8),
        _ => return None,
    };
    Some(color)
}
