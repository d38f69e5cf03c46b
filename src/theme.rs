use serde::{Deserialize, Serialize};

/// Number of visually distinct palette slots before colors repeat
pub const PALETTE_SIZE: usize = 8;

/// Color scheme assigned to a pinned line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTheme {
    pub primary: String,
    pub on_primary: String,
    pub primary_container: String,
    pub on_primary_container: String,
}

/// Convert an HSL color to a `#RRGGBB` hex string
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let chroma = (1.0 - (2.0 * lightness / 100.0 - 1.0).abs()) * saturation / 100.0;
    let second_component = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let lightness_match = lightness / 100.0 - chroma / 2.0;

    let (red, green, blue) = match hue as u32 {
        0..=59 => (chroma, second_component, 0.0),
        60..=119 => (second_component, chroma, 0.0),
        120..=179 => (0.0, chroma, second_component),
        180..=239 => (0.0, second_component, chroma),
        240..=299 => (second_component, 0.0, chroma),
        _ => (chroma, 0.0, second_component),
    };

    format!(
        "#{:02X}{:02X}{:02X}",
        ((red + lightness_match) * 255.0) as u8,
        ((green + lightness_match) * 255.0) as u8,
        ((blue + lightness_match) * 255.0) as u8
    )
}

/// The deterministic theme for a palette slot.
///
/// Hues are spaced by a golden-angle multiple so neighbouring slots stay
/// visually distinct.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn palette_theme(slot: usize) -> LineTheme {
    let hue = ((slot * 137) % 360) as f64;

    LineTheme {
        primary: hsl_to_hex(hue, 70.0, 40.0),
        on_primary: "#FFFFFF".to_string(),
        primary_container: hsl_to_hex(hue, 70.0, 85.0),
        on_primary_container: hsl_to_hex(hue, 70.0, 15.0),
    }
}

/// Pick a theme for a newly pinned line.
///
/// Returns the first palette slot not already in use; when every slot is
/// taken the palette cycles, reusing colors rather than failing.
#[must_use]
pub fn assign_theme(in_use: &[LineTheme]) -> LineTheme {
    for slot in 0..PALETTE_SIZE {
        let candidate = palette_theme(slot);
        if !in_use.contains(&candidate) {
            return candidate;
        }
    }

    palette_theme(in_use.len() % PALETTE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_theme_is_deterministic() {
        assert_eq!(palette_theme(3), palette_theme(3));
    }

    #[test]
    fn test_palette_slots_are_distinct() {
        for a in 0..PALETTE_SIZE {
            for b in (a + 1)..PALETTE_SIZE {
                assert_ne!(palette_theme(a).primary, palette_theme(b).primary);
            }
        }
    }

    #[test]
    fn test_assign_theme_skips_used_slots() {
        let used = vec![palette_theme(0), palette_theme(1)];
        assert_eq!(assign_theme(&used), palette_theme(2));
    }

    #[test]
    fn test_assign_theme_reuses_when_palette_exhausted() {
        let used: Vec<LineTheme> = (0..PALETTE_SIZE).map(palette_theme).collect();
        let theme = assign_theme(&used);
        assert!(used.contains(&theme));
    }

    #[test]
    fn test_hex_format() {
        let theme = palette_theme(0);
        assert!(theme.primary.starts_with('#'));
        assert_eq!(theme.primary.len(), 7);
    }
}
