//! Background fill colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A straight (non-premultiplied) RGBA8 color used to fill icon backgrounds.
///
/// Parsed from `transparent`, a handful of CSS names, or `#RGB`, `#RRGGBB`,
/// `#RRGGBBAA` hex notation (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel; 0 is fully transparent.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    /// Creates a color from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns `true` if the color has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Error returned for unparseable color strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{input}': {reason}")]
pub struct ParseColorError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = |reason: &str| ParseColorError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        match trimmed.to_ascii_lowercase().as_str() {
            "transparent" | "none" => return Ok(Color::TRANSPARENT),
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            _ => {}
        }

        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| err("expected '#' hex notation or a known name"))?;
        if !hex.is_ascii() {
            return Err(err("non-ascii hex digits"));
        }
        let byte = |pair: &str| u8::from_str_radix(pair, 16).map_err(|_| err("invalid hex digit"));

        match hex.len() {
            3 => {
                let mut ch = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(|| err("invalid hex digit"))? as u8;
                    ch[i] = v * 17;
                }
                Ok(Color::rgba(ch[0], ch[1], ch[2], 255))
            }
            6 => Ok(Color::rgba(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                255,
            )),
            8 => Ok(Color::rgba(
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            )),
            _ => Err(err("expected #RGB, #RRGGBB or #RRGGBBAA")),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_transparent() {
            f.write_str("transparent")
        } else if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_forms() {
        assert_eq!("#fff".parse(), Ok(Color::WHITE));
        assert_eq!("#FF8000".parse(), Ok(Color::rgba(255, 128, 0, 255)));
        assert_eq!("#ff800080".parse(), Ok(Color::rgba(255, 128, 0, 128)));
    }

    #[test]
    fn parse_names() {
        assert_eq!("transparent".parse(), Ok(Color::TRANSPARENT));
        assert_eq!(" Black ".parse(), Ok(Color::BLACK));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("ff8000".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(Color::rgba(1, 2, 3, 255).to_string(), "#010203");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
        assert_eq!(Color::rgba(9, 9, 9, 0).to_string(), "transparent");
    }

    #[test]
    fn serde_as_string() {
        let json = serde_json::to_string(&Color::rgba(255, 0, 0, 255)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(back, Color::rgba(0, 255, 0, 255));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
