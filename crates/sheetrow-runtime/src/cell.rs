//! Cell parsers shared by every generated row type
//!
//! Generated `set_data` bodies call [`parse`] for scalar fields and
//! [`parse_list`] for list fields; the target type picks the parser through
//! [`FromCell`].

use crate::error::FieldParseError;
use serde::{Deserialize, Serialize};
use sheetrow_model::CellValue;
use tracing::debug;

/// Separator between vector or color components: `"1.5, 2"`
pub const COMPONENT_DELIMITER: char = ',';

/// Two-component float vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// Create vector
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Three-component float vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Create vector
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white, the value of an empty color cell
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Create color
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create color from 8-bit channels
    #[must_use]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let unit = |c: u8| f32::from(c) / 255.0;
        Self::new(unit(r), unit(g), unit(b), unit(a))
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize, width: usize| {
            let raw = u8::from_str_radix(&digits[i * width..(i + 1) * width], 16).ok()?;
            Some(if width == 1 { raw * 17 } else { raw })
        };
        let width = match digits.len() {
            3 | 4 => 1,
            6 | 8 => 2,
            _ => return None,
        };
        let alpha = if digits.len() / width == 4 {
            channel(3, width)?
        } else {
            255
        };
        Some(Self::from_rgba8(channel(0, width)?, channel(1, width)?, channel(2, width)?, alpha))
    }

    /// Look up an HTML color name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let hex = match name.to_ascii_lowercase().as_str() {
            "red" => "#FF0000",
            "cyan" | "aqua" => "#00FFFF",
            "blue" => "#0000FF",
            "darkblue" => "#0000A0",
            "lightblue" => "#ADD8E6",
            "purple" => "#800080",
            "yellow" => "#FFFF00",
            "lime" => "#00FF00",
            "fuchsia" | "magenta" => "#FF00FF",
            "white" => "#FFFFFF",
            "silver" => "#C0C0C0",
            "grey" | "gray" => "#808080",
            "black" => "#000000",
            "orange" => "#FFA500",
            "brown" => "#A52A2A",
            "maroon" => "#800000",
            "green" => "#008000",
            "olive" => "#808000",
            "navy" => "#000080",
            "teal" => "#008080",
            _ => return None,
        };
        Self::from_hex(hex)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A semantic type a cell's text can be parsed into
pub trait FromCell: Sized {
    /// Type tag reported in parse errors
    const TAG: &'static str;

    /// Parse one cell (or list item) text
    ///
    /// # Errors
    /// Returns a human-readable reason when the text does not parse
    fn from_cell(text: &str) -> Result<Self, String>;
}

impl FromCell for String {
    const TAG: &'static str = "string";

    fn from_cell(text: &str) -> Result<Self, String> {
        Ok(text.to_string())
    }
}

impl FromCell for i32 {
    const TAG: &'static str = "int";

    fn from_cell(text: &str) -> Result<Self, String> {
        text.trim().parse().map_err(|e: std::num::ParseIntError| e.to_string())
    }
}

impl FromCell for f32 {
    const TAG: &'static str = "float";

    fn from_cell(text: &str) -> Result<Self, String> {
        text.trim().parse().map_err(|e: std::num::ParseFloatError| e.to_string())
    }
}

impl FromCell for bool {
    const TAG: &'static str = "bool";

    fn from_cell(text: &str) -> Result<Self, String> {
        Ok(text.trim().eq_ignore_ascii_case("true"))
    }
}

impl FromCell for Vector2 {
    const TAG: &'static str = "vector2";

    fn from_cell(text: &str) -> Result<Self, String> {
        Ok(match components(text)?.as_slice() {
            [x, y, ..] => Self::new(*x, *y),
            _ => Self::default(),
        })
    }
}

impl FromCell for Vector3 {
    const TAG: &'static str = "vector3";

    fn from_cell(text: &str) -> Result<Self, String> {
        Ok(match components(text)?.as_slice() {
            [x, y, z, ..] => Self::new(*x, *y, *z),
            _ => Self::default(),
        })
    }
}

impl FromCell for Color {
    const TAG: &'static str = "color";

    /// Hex, an HTML color name, or 3-4 components; anything else is white
    fn from_cell(text: &str) -> Result<Self, String> {
        let text = text.trim();
        let parsed = if text.starts_with('#') {
            Self::from_hex(text)
        } else if let Some(named) = Self::from_name(text) {
            Some(named)
        } else {
            match components(text).as_deref() {
                Ok([r, g, b]) => Some(Self::new(*r, *g, *b, 1.0)),
                Ok([r, g, b, a]) => Some(Self::new(*r, *g, *b, *a)),
                _ => None,
            }
        };
        Ok(parsed.unwrap_or(Self::WHITE))
    }
}

/// Float components of a vector or color cell
///
/// Surrounding parentheses are ignored; a cell with too few components is
/// left to the caller to default.
fn components(text: &str) -> Result<Vec<f32>, String> {
    let inner = text.trim().trim_start_matches('(').trim_end_matches(')');
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(COMPONENT_DELIMITER)
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("component '{}': {e}", part.trim()))
        })
        .collect()
}

/// Parse a whole cell as a scalar field
///
/// The cell's wire text is parsed, so a multi-valued cell under a scalar
/// column parses as its `|`-joined text.
///
/// # Errors
/// Returns [`FieldParseError`] when the text does not parse as `T`
pub fn parse<T: FromCell>(column: &str, value: &CellValue) -> Result<T, FieldParseError> {
    let text = value.text();
    T::from_cell(&text).map_err(|reason| FieldParseError::new(column, &*text, T::TAG, reason))
}

/// Parse a cell as a list field
///
/// Items are split on the reserved delimiter and kept in order, empty items
/// included, so parallel list columns of a merged row stay aligned. Items
/// that do not parse as `T` are skipped. A wholly empty cell is an empty list.
#[must_use]
pub fn parse_list<T: FromCell>(column: &str, value: &CellValue) -> Vec<T> {
    if value.is_empty() {
        return Vec::new();
    }
    value
        .items()
        .into_iter()
        .filter_map(|item| match T::from_cell(item) {
            Ok(parsed) => Some(parsed),
            Err(reason) => {
                debug!("Skipping {} item '{}' in column {}: {}", T::TAG, item, column, reason);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn cell(text: &str) -> CellValue {
        CellValue::from(text)
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(parse::<i32>("hp", &cell(" 50 ")).unwrap(), 50);
        assert_eq!(parse::<f32>("speed", &cell("1.5")).unwrap(), 1.5);
        assert!(parse::<bool>("boss", &cell("TRUE")).unwrap());
        assert!(!parse::<bool>("boss", &cell("yes")).unwrap());
        assert_eq!(parse::<String>("name", &cell(" Goblin ")).unwrap(), " Goblin ");
    }

    #[test]
    fn scalar_error_carries_context() {
        let err = parse::<i32>("hp", &cell("lots")).unwrap_err();
        assert_eq!(err.column, "hp");
        assert_eq!(err.raw, "lots");
        assert_eq!(err.expected, "int");
    }

    #[test]
    fn empty_int_is_an_error() {
        assert!(parse::<i32>("hp", &cell("")).is_err());
    }

    #[test]
    fn vectors_default_missing_components() {
        assert_eq!(
            parse::<Vector2>("pos", &cell("(1, 2)")).unwrap(),
            Vector2::new(1.0, 2.0)
        );
        assert_eq!(parse::<Vector2>("pos", &cell("3")).unwrap(), Vector2::default());
        assert_eq!(parse::<Vector3>("pos", &cell("")).unwrap(), Vector3::default());
        assert_eq!(
            parse::<Vector3>("pos", &cell("1,2,3,4")).unwrap(),
            Vector3::new(1.0, 2.0, 3.0)
        );
        assert!(parse::<Vector3>("pos", &cell("1,x,3")).is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(parse::<Color>("tint", &cell("")).unwrap(), Color::WHITE);
        assert_eq!(
            parse::<Color>("tint", &cell("#FF0000")).unwrap(),
            Color::new(1.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(
            parse::<Color>("tint", &cell("#0F08")).unwrap(),
            Color::from_rgba8(0, 255, 0, 136)
        );
        assert_eq!(
            parse::<Color>("tint", &cell("Black")).unwrap(),
            Color::new(0.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(
            parse::<Color>("tint", &cell("0, 0.5, 1")).unwrap(),
            Color::new(0.0, 0.5, 1.0, 1.0)
        );
    }

    #[test]
    fn unreadable_colors_fall_back_to_white() {
        for text in ["#12345", "#GG0000", "chartreuse-ish", "1, 2", "0, x, 1"] {
            assert_eq!(parse::<Color>("tint", &cell(text)).unwrap(), Color::WHITE, "{text:?}");
        }
    }

    #[test]
    fn lists_split_on_delimiter() {
        let multi = CellValue::from(vec!["sword".to_string(), "shield".to_string()]);
        assert_eq!(
            parse_list::<String>("loot", &multi),
            vec!["sword".to_string(), "shield".to_string()]
        );
        assert!(parse_list::<i32>("ids", &cell("")).is_empty());
        assert!(parse_list::<String>("tags", &cell("")).is_empty());
    }

    #[test]
    fn list_keeps_empty_string_items() {
        assert_eq!(
            parse_list::<String>("tags", &cell("a||b")),
            vec!["a".to_string(), String::new(), "b".to_string()]
        );
        assert_eq!(parse_list::<bool>("flags", &cell("true||TRUE")), vec![true, false, true]);
    }

    #[test]
    fn list_skips_unreadable_numbers() {
        assert_eq!(parse_list::<i32>("ids", &cell("1|x|3")), vec![1, 3]);
        assert_eq!(parse_list::<i32>("ids", &cell("1|2||3")), vec![1, 2, 3]);
        assert_eq!(parse_list::<f32>("weights", &cell("1.0|heavy")), vec![1.0]);
    }

    #[test]
    fn merged_row_lists_stay_parallel() {
        let tags = CellValue::from(vec![String::new(), "t".to_string()]);
        let weights = CellValue::from(vec!["1".to_string(), "2".to_string()]);
        let tags = parse_list::<String>("tags", &tags);
        let weights = parse_list::<f32>("weights", &weights);
        assert_eq!(tags, vec![String::new(), "t".to_string()]);
        assert_eq!(tags.len(), weights.len());
    }

    #[test]
    fn scalar_column_reads_joined_text() {
        let multi = CellValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(parse::<String>("name", &multi).unwrap(), "a|b");
    }

    proptest! {
        #[test]
        fn ints_round_trip_through_text(n in any::<i32>()) {
            prop_assert_eq!(parse::<i32>("n", &cell(&n.to_string())).unwrap(), n);
        }

        #[test]
        fn hex_colors_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let text = format!("#{r:02X}{g:02X}{b:02X}");
            prop_assert_eq!(Color::from_hex(&text), Some(Color::from_rgba8(r, g, b, 255)));
        }
    }
}
