//! Semantic material tag classification
//!
//! URDF materials in the supported robots carry semantic names ("black",
//! "blue", ...) rather than usable color definitions. Classification maps a
//! tag to a fixed display color; unknown or missing tags fall back to the
//! default instead of erroring.

/// Display color for black and light_black tags (also the default).
pub const COLOR_BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Display color for the blue tag.
pub const COLOR_BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
/// Display color for the red tag.
pub const COLOR_RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Resolve a semantic material tag to its display color.
///
/// Matching is case-insensitive. Unknown and absent tags resolve to
/// [`COLOR_BLACK`].
pub fn classify(tag: Option<&str>) -> [f32; 4] {
    let Some(tag) = tag else {
        return COLOR_BLACK;
    };

    match tag.to_lowercase().as_str() {
        "black" | "light_black" => COLOR_BLACK,
        "blue" => COLOR_BLUE,
        "red" => COLOR_RED,
        _ => COLOR_BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_tags() {
        assert_eq!(classify(Some("black")), COLOR_BLACK);
        assert_eq!(classify(Some("light_black")), COLOR_BLACK);
        assert_eq!(classify(Some("blue")), COLOR_BLUE);
        assert_eq!(classify(Some("red")), COLOR_RED);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify(Some("Black")), COLOR_BLACK);
        assert_eq!(classify(Some("BLUE")), COLOR_BLUE);
        assert_eq!(classify(Some("Red")), COLOR_RED);
        assert_eq!(classify(Some("LIGHT_BLACK")), COLOR_BLACK);
    }

    #[test]
    fn test_unknown_and_absent_fall_back() {
        assert_eq!(classify(Some("chartreuse")), COLOR_BLACK);
        assert_eq!(classify(Some("")), COLOR_BLACK);
        assert_eq!(classify(None), COLOR_BLACK);
    }

    #[test]
    fn test_pure() {
        // Identical tag resolves identically every time
        for _ in 0..3 {
            assert_eq!(classify(Some("blue")), classify(Some("blue")));
            assert_eq!(classify(None), classify(None));
        }
    }
}
