use crate::color::Color;
use crate::error::PaletteError;

/// Low-to-high accessibility ramp: poor (maroon) through good (dark green).
pub const ACCESSIBILITY_PALETTE: [&str; 7] = [
    "maroon",
    "chocolate",
    "orange",
    "gold",
    "yellowgreen",
    "forestgreen",
    "darkgreen",
];

/// Ordered list of at least two colors. Index 0 is the low end of the ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.len() < 2 {
            return Err(PaletteError::TooFewColors {
                found: colors.len(),
            });
        }
        Ok(Self { colors })
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, PaletteError> {
        Self::new(names.iter().map(|n| Color::parse(n.as_ref())).collect())
    }

    pub fn accessibility() -> Self {
        Self {
            colors: ACCESSIBILITY_PALETTE.iter().map(|n| Color::parse(n)).collect(),
        }
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn first(&self) -> &Color {
        &self.colors[0]
    }

    pub fn last(&self) -> &Color {
        &self.colors[self.colors.len() - 1]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::accessibility()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn rejects_single_color_palette() {
        let err = Palette::from_names(&["gold"]).unwrap_err();
        assert_eq!(err, PaletteError::TooFewColors { found: 1 });
    }

    #[test]
    fn rejects_empty_palette() {
        let err = Palette::new(Vec::new()).unwrap_err();
        assert_eq!(err, PaletteError::TooFewColors { found: 0 });
    }

    #[test]
    fn accessibility_palette_runs_low_to_high() {
        let p = Palette::accessibility();
        assert_eq!(p.len(), 7);
        assert_eq!(p.first(), &Color::Rgb(Rgb::new(0x80, 0, 0)));
        assert_eq!(p.last(), &Color::Rgb(Rgb::new(0, 0x64, 0)));
    }

    #[test]
    fn unknown_entries_are_kept_as_literals() {
        let p = Palette::from_names(&["gold", "ultraviolet"]).unwrap();
        assert_eq!(p.colors()[1], Color::Literal("ultraviolet".into()));
    }
}
