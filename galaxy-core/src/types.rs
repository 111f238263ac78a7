use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// Identifier for a [`crate::lifecycle::PointField`].
///
/// Ids are handed out by a [`crate::lifecycle::FieldController`] in
/// increasing order and are never reused by that controller.
pub type FieldId = u64;

/// A linear RGB color with components nominally in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` (or `rrggbb`) hex string.
    ///
    /// ### Returns
    /// - `Ok(Rgb)` with each channel mapped from `0..=255` to `[0, 1]`.
    /// - `Err(ParamError::BadColor)` if the string is not six hex digits.
    pub fn from_hex(hex: &str) -> Result<Self, ParamError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParamError::BadColor(hex.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ParamError::BadColor(hex.to_owned()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats the color as `#rrggbb`, clamping channels into `[0, 1]`.
    pub fn to_hex(self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }

    /// `true` if every channel lies in `[0, 1]`. NaN channels fail.
    pub fn is_normalized(self) -> bool {
        self.to_array().iter().all(|c| (0.0..=1.0).contains(c))
    }
}

impl From<Rgb> for Vec3 {
    fn from(c: Rgb) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl From<Vec3> for Rgb {
    fn from(v: Vec3) -> Self {
        Rgb::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Rgb {
    fn from(a: [f32; 3]) -> Self {
        Rgb::new(a[0], a[1], a[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Rgb::from_hex("#ff0000").unwrap();
        let b = Rgb::from_hex("ff0000").unwrap();
        assert_eq!(a, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn from_hex_rejects_malformed_strings() {
        for bad in ["", "#fff", "#gg0000", "#ff00000", "#ff00é"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ParamError::BadColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn to_hex_round_trips_default_colors() {
        for hex in ["#ff6030", "#1b3984"] {
            assert_eq!(Rgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn is_normalized_rejects_nan_and_out_of_range() {
        assert!(Rgb::WHITE.is_normalized());
        assert!(Rgb::BLACK.is_normalized());
        assert!(!Rgb::new(1.5, 0.0, 0.0).is_normalized());
        assert!(!Rgb::new(0.0, -0.1, 0.0).is_normalized());
        assert!(!Rgb::new(0.0, 0.0, f32::NAN).is_normalized());
    }
}
