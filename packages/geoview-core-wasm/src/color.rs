use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

const FALLBACK_GREY: Color = Color { r: 0.7, g: 0.7, b: 0.7 };

/// Hex color as stored in documents: digits only, no leading `#`.
///
/// Files usually carry `"a0b0c0"`, but a stray `"#a0b0c0"` is accepted and
/// stripped on load so every consumer prefixes exactly once through [`HexColor::css`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HexColor(String);

impl HexColor {
    pub fn new(raw: &str) -> Self {
        HexColor(raw.trim().strip_prefix('#').unwrap_or(raw.trim()).to_string())
    }

    /// Digits as they appeared in the file.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// CSS form used for SVG fills and three.js materials.
    pub fn css(&self) -> String {
        format!("#{}", self.0)
    }

    // Unparseable digits render grey instead of failing the load
    pub fn rgb(&self) -> Color {
        let digits = self.0.as_str();
        if digits.len() != 6 || !digits.is_ascii() {
            return FALLBACK_GREY;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Color {
                r: r as f32 / 255.0,
                g: g as f32 / 255.0,
                b: b as f32 / 255.0,
            },
            _ => FALLBACK_GREY,
        }
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(HexColor::new(&raw))
    }
}
