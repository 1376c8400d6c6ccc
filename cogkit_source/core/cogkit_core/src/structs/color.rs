use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(255, 255, 255, 0);
    pub const RED: Self = Self::new(255, 0, 0, 255);
    pub const GREEN: Self = Self::new(0, 128, 0, 255);
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    pub const GRAY: Self = Self::new(128, 128, 128, 255);
    pub const LIGHT_GRAY: Self = Self::new(211, 211, 211, 255);
    pub const ORANGE: Self = Self::new(255, 165, 0, 255);
    pub const ROYAL_BLUE: Self = Self::new(65, 105, 225, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn from_hex(s: &str) -> Result<Self, String> {
        let s = s.trim_start_matches('#');
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&s[range], 16).map_err(|e| e.to_string())
        };
        match s.len() {
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err("Invalid hex color length, expected 6 or 8 hex digits".to_string()),
        }
    }

    /// Alpha channel as a 0..1 multiplier.
    #[inline]
    pub fn alpha_f32(&self) -> f32 {
        self.a as f32 / 255.0
    }

    /// Copy with the alpha channel multiplied by `factor` (clamped to 0..1).
    pub fn with_alpha_multiplier(&self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..*self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_six_and_eight_digit_hex() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("00000080").unwrap(), Color::new(0, 0, 0, 128));
        assert!(Color::from_hex("#fff").is_err());
    }

    #[test]
    fn alpha_multiplier_scales_channel() {
        assert_eq!(Color::WHITE.with_alpha_multiplier(0.5).a, 128);
        assert_eq!(Color::WHITE.with_alpha_multiplier(2.0).a, 255);
    }
}
