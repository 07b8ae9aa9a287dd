//! Deterministic color assignment for tables and groups.
//!
//! A [`Theme`] holds two palettes of equal purpose: backgrounds and
//! foregrounds. Both are indexed by the same table/group ordinal, cycling
//! when the ordinal runs past the end.

use thiserror::Error;

/// Tailwind 50 shades
pub const DEFAULT_BACKGROUNDS: [&str; 12] = [
    "#fef2f2", // red
    "#fff7ed", // orange
    "#fffbeb", // amber
    "#f7fee7", // lime
    "#f0fdf4", // green
    "#f0fdfa", // teal
    "#f0f9ff", // sky
    "#eff6ff", // blue
    "#eef2ff", // indigo
    "#f5f3ff", // violet
    "#fdf4ff", // fuchsia
    "#fdf2f8", // pink
];

/// Tailwind 700 shades
pub const DEFAULT_FOREGROUNDS: [&str; 12] = [
    "#b91c1c", // red
    "#c2410c", // orange
    "#b45309", // amber
    "#4d7c0f", // lime
    "#15803d", // green
    "#0f766e", // teal
    "#0369a1", // sky
    "#1d4ed8", // blue
    "#4338ca", // indigo
    "#6d28d9", // violet
    "#a21caf", // fuchsia
    "#be185d", // pink
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("a palette needs at least one color")]
    Empty,
}

/// A non-empty, ordered, immutable list of colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    pub fn new<I, S>(colors: I) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Color for `index`, see [`color_for`]
    pub fn color(&self, index: isize) -> &str {
        color_for(index, self)
    }
}

/// Map any index, negative included, into `[0, len)`.
///
/// This is mathematical modulo: `-1` maps to `len - 1`.
///
/// # Panics
///
/// Panics if `len` is zero. [`Palette`] is never empty, so [`color_for`]
/// cannot hit this.
pub fn wrap_index(index: isize, len: usize) -> usize {
    assert!(len > 0, "wrap_index: len must be non-zero");
    let len = len as isize;
    index.rem_euclid(len) as usize
}

/// Pick the palette entry for `index`, cycling in both directions
pub fn color_for(index: isize, palette: &Palette) -> &str {
    &palette.colors[wrap_index(index, palette.colors.len())]
}

/// Background and foreground palettes used for one diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Palette,
    pub foreground: Palette,
}

impl Theme {
    pub fn new(background: Palette, foreground: Palette) -> Self {
        Self {
            background,
            foreground,
        }
    }

    pub fn background(&self, index: isize) -> &str {
        self.background.color(index)
    }

    pub fn foreground(&self, index: isize) -> &str {
        self.foreground.color(index)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Palette {
                colors: DEFAULT_BACKGROUNDS.iter().map(|c| c.to_string()).collect(),
            },
            foreground: Palette {
                colors: DEFAULT_FOREGROUNDS.iter().map(|c| c.to_string()).collect(),
            },
        }
    }
}
