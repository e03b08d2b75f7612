//! Color values used by layer styles and palettes.
//!
//! A color is either a resolved RGB triple or a literal string that could not
//! be resolved. Literals are kept verbatim so that cosmetic data never fails
//! a session: they are shown as-is in the UI and drawn in the fallback color.

use std::fmt;

use serde::{Deserialize, Deserializer};

use crate::config::FALLBACK_COLOR_HEX;

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel-wise linear blend towards `other`, rounded to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to a Bevy sRGB color with the given alpha.
    pub fn to_bevy(self, alpha: f32) -> bevy::color::Color {
        bevy::color::Color::srgba_u8(self.r, self.g, self.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Named colors understood by palettes and layer styles.
///
/// Lookups are case-insensitive. Anything else must be a hex or `rgb(...)`
/// literal to resolve.
const NAMED_COLORS: [(&str, Rgb); 11] = [
    ("maroon", Rgb::new(0x80, 0x00, 0x00)),
    ("chocolate", Rgb::new(0xd2, 0x69, 0x1e)),
    ("orange", Rgb::new(0xff, 0xa5, 0x00)),
    ("gold", Rgb::new(0xff, 0xd7, 0x00)),
    ("yellowgreen", Rgb::new(0x9a, 0xcd, 0x32)),
    ("forestgreen", Rgb::new(0x22, 0x8b, 0x22)),
    ("darkgreen", Rgb::new(0x00, 0x64, 0x00)),
    ("black", Rgb::new(0x00, 0x00, 0x00)),
    ("white", Rgb::new(0xff, 0xff, 0xff)),
    ("gray", Rgb::new(0x80, 0x80, 0x80)),
    ("grey", Rgb::new(0x80, 0x80, 0x80)),
];

pub fn named_color(name: &str) -> Option<Rgb> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, rgb)| rgb)
}

/// A style color: resolved RGB, or an unresolved literal passed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Color {
    Rgb(Rgb),
    Literal(String),
}

impl Color {
    /// Resolve a color string. Never fails: unknown input becomes a literal.
    pub fn parse(input: &str) -> Color {
        let trimmed = input.trim();
        if let Some(rgb) = named_color(trimmed)
            .or_else(|| parse_hex(trimmed))
            .or_else(|| parse_rgb_function(trimmed))
        {
            return Color::Rgb(rgb);
        }
        Color::Literal(input.to_string())
    }

    pub fn fallback() -> Color {
        Color::parse(FALLBACK_COLOR_HEX)
    }

    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            Color::Rgb(rgb) => Some(*rgb),
            Color::Literal(_) => None,
        }
    }

    /// RGB value for drawing; literals fall back to the default layer color.
    pub fn rgb_or_fallback(&self) -> Rgb {
        self.rgb()
            .or_else(|| parse_hex(FALLBACK_COLOR_HEX))
            .unwrap_or(Rgb::new(0x33, 0x88, 0xff))
    }

    /// CSS-style representation, matching what the layer toggles display.
    pub fn to_css(&self) -> String {
        match self {
            Color::Rgb(rgb) => format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
            Color::Literal(s) => s.clone(),
        }
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Color::parse(&s))
    }
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let hex = s.strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            Some(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
            Some(Rgb::new(digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

fn parse_rgb_function(s: &str) -> Option<Rgb> {
    let inner = s
        .strip_prefix("rgb(")
        .or_else(|| s.strip_prefix("RGB("))?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<u8>().ok());
    let rgb = Rgb::new(channels.next()??, channels.next()??, channels.next()??);
    if channels.next().is_some() {
        return None;
    }
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_resolve_case_insensitively() {
        assert_eq!(Color::parse("Gold"), Color::Rgb(Rgb::new(255, 215, 0)));
        assert_eq!(Color::parse("darkgreen"), Color::Rgb(Rgb::new(0, 100, 0)));
    }

    #[test]
    fn hex_and_rgb_literals_resolve() {
        assert_eq!(Color::parse("#d2691e"), Color::Rgb(Rgb::new(210, 105, 30)));
        assert_eq!(Color::parse("#fff"), Color::Rgb(Rgb::new(255, 255, 255)));
        assert_eq!(
            Color::parse("rgb(12, 34, 56)"),
            Color::Rgb(Rgb::new(12, 34, 56))
        );
    }

    #[test]
    fn unknown_names_pass_through_unchanged() {
        assert_eq!(
            Color::parse("papayawhip"),
            Color::Literal("papayawhip".to_string())
        );
        assert_eq!(Color::parse("#12345"), Color::Literal("#12345".to_string()));
        assert_eq!(
            Color::parse("rgb(1, 2, 3, 4)"),
            Color::Literal("rgb(1, 2, 3, 4)".to_string())
        );
    }

    #[test]
    fn literal_draws_in_fallback_color() {
        let c = Color::parse("papayawhip");
        assert_eq!(c.rgb_or_fallback(), Rgb::new(0x33, 0x88, 0xff));
        assert_eq!(c.to_css(), "papayawhip");
    }

    #[test]
    fn lerp_rounds_to_nearest() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(255, 100, 1);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(128, 50, 1));
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }

    #[test]
    fn css_output_matches_rgb_function_format() {
        assert_eq!(Color::parse("gold").to_css(), "rgb(255, 215, 0)");
        assert_eq!(Rgb::new(255, 215, 0).to_hex(), "#ffd700");
    }
}
