use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Renderer-independent RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = String;

    /// Parse `#rrggbb` (the leading `#` is optional)
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let payload = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(payload, &mut bytes)
            .map_err(|err| format!("invalid color {value:?}: {err}"))?;
        Ok(Self::rgb(bytes[0], bytes[1], bytes[2]))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

/// Palette handed to the status helpers and the UI.
///
/// Loaded from the `[theme]` table of the config file; any color left out
/// keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub pending: Color,
    pub confirmed: Color,
    pub cancelled: Color,
    pub completed: Color,
    pub accent: Color,
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pending: Color::rgb(0xf5, 0x9e, 0x0b),
            confirmed: Color::rgb(0x10, 0xb9, 0x81),
            cancelled: Color::rgb(0xef, 0x44, 0x44),
            completed: Color::rgb(0x63, 0x66, 0xf1),
            accent: Color::rgb(0x22, 0xd3, 0xee),
            muted: Color::rgb(0x6b, 0x72, 0x80),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#10b981".parse::<Color>(), Ok(Color::rgb(0x10, 0xb9, 0x81)));
        assert_eq!("FFFFFF".parse::<Color>(), Ok(Color::rgb(255, 255, 255)));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Color::rgb(0xef, 0x44, 0x44).to_string(), "#ef4444");
    }

    #[test]
    fn partial_theme_keeps_defaults() {
        let theme: Theme = toml::from_str("pending = \"#000000\"").unwrap();
        assert_eq!(theme.pending, Color::rgb(0, 0, 0));
        assert_eq!(theme.confirmed, Theme::default().confirmed);
    }
}
