//! Palette cycling and theme defaults.

use sqldraw::palette::{
    color_for, wrap_index, Palette, PaletteError, Theme, DEFAULT_BACKGROUNDS, DEFAULT_FOREGROUNDS,
};

#[test]
fn test_color_for_is_periodic() {
    let palette = Palette::new(DEFAULT_FOREGROUNDS).unwrap();
    let n = palette.len() as isize;

    for i in -30..30 {
        assert_eq!(color_for(i, &palette), color_for(i + n, &palette));
    }
    assert_eq!(color_for(-1, &palette), color_for(n - 1, &palette));
}

#[test]
fn test_wrap_index_range() {
    for i in -50..50 {
        assert!(wrap_index(i, 7) < 7);
    }
    assert_eq!(wrap_index(-1, 12), 11);
    assert_eq!(wrap_index(12, 12), 0);
}

#[test]
fn test_default_theme_matches_tailwind() {
    let theme = Theme::default();
    assert_eq!(theme.foreground(0), DEFAULT_FOREGROUNDS[0]);
    assert_eq!(theme.foreground(1), DEFAULT_FOREGROUNDS[1]);
    assert_ne!(theme.foreground(0), theme.foreground(1));
    assert_eq!(theme.background(13), DEFAULT_BACKGROUNDS[1]);
}

#[test]
fn test_custom_theme() {
    let theme = Theme::new(
        Palette::new(["#eee"]).unwrap(),
        Palette::new(["#111", "#222"]).unwrap(),
    );
    assert_eq!(theme.background(5), "#eee");
    assert_eq!(theme.foreground(3), "#222");
}

#[test]
fn test_empty_palette_rejected() {
    let empty: [&str; 0] = [];
    assert_eq!(Palette::new(empty).unwrap_err(), PaletteError::Empty);
}
