//! Galaxy generation parameters and their legal ranges.
//!
//! [`GalaxyParams`] is the snapshot consumed by [`crate::field::generate`].
//! Every field has a legal range; out-of-range values are rejected with a
//! [`ParamError`], never clamped. Clamping to friendly UI ranges is left to
//! the panel, which can query [`ParamField::ui_range`].

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::types::Rgb;

/// Upper bound on the number of generated particles.
pub const MAX_COUNT: u32 = 1_000_000;
/// Upper bound on the galaxy radius.
pub const MAX_RADIUS: f32 = 1.0e6;
/// Upper bound on `|spin|`.
pub const MAX_ABS_SPIN: f32 = 1.0e6;
/// Upper bound on the scatter factor.
pub const MAX_RANDOMNESS: f32 = 1.0e3;

// The bounds keep `radius * spin` and `(1 + randomness) * radius` far below
// `f32::MAX`, so every generated coordinate is finite.

/// One snapshot of galaxy generation parameters.
///
/// Missing fields in a JSON preset fall back to [`Default`].
///
/// ### Fields
/// - `count` - Number of particles, `1..=MAX_COUNT`.
/// - `particle_size` - Point size handed to the material.
/// - `radius` - Outer radius; particle radii are drawn in `[0, radius)`.
/// - `branches` - Number of spiral arms.
/// - `spin` - Twist applied per unit radius.
///
/// - `randomness` - Scatter scale, relative to each particle's radius.
/// - `randomness_power` - Exponent applied to scatter magnitudes; higher values
///   pull particles toward the arm.
///
/// - `inside_color` - Color at the center.
/// - `outside_color` - Color at the rim.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyParams {
    pub count: u32,
    pub particle_size: f32,
    pub radius: f32,
    pub branches: u32,
    /// Radians of twist per unit radius.
    pub spin: f32,
    pub randomness: f32,
    pub randomness_power: f32,
    pub inside_color: Rgb,
    pub outside_color: Rgb,
}

impl Default for GalaxyParams {
    fn default() -> Self {
        Self {
            count: 100_000,
            particle_size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Rgb::new(1.0, 96.0 / 255.0, 48.0 / 255.0),
            outside_color: Rgb::new(27.0 / 255.0, 57.0 / 255.0, 132.0 / 255.0),
        }
    }
}

/// One editable field of [`GalaxyParams`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamField {
    Count,
    ParticleSize,
    Radius,
    Branches,
    Spin,
    Randomness,
    RandomnessPower,
    InsideColor,
    OutsideColor,
}

impl ParamField {
    pub const ALL: [ParamField; 9] = [
        ParamField::Count,
        ParamField::ParticleSize,
        ParamField::Radius,
        ParamField::Branches,
        ParamField::Spin,
        ParamField::Randomness,
        ParamField::RandomnessPower,
        ParamField::InsideColor,
        ParamField::OutsideColor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParamField::Count => "count",
            ParamField::ParticleSize => "particle_size",
            ParamField::Radius => "radius",
            ParamField::Branches => "branches",
            ParamField::Spin => "spin",
            ParamField::Randomness => "randomness",
            ParamField::RandomnessPower => "randomness_power",
            ParamField::InsideColor => "inside_color",
            ParamField::OutsideColor => "outside_color",
        }
    }

    /// Suggested slider range for a parameter panel.
    ///
    /// This is narrower than the legal range and is only a UI hint.
    /// Color fields have no slider range.
    pub fn ui_range(self) -> Option<RangeInclusive<f64>> {
        match self {
            ParamField::Count => Some(100.0..=MAX_COUNT as f64),
            ParamField::ParticleSize => Some(0.001..=0.1),
            ParamField::Radius => Some(0.01..=20.0),
            ParamField::Branches => Some(1.0..=20.0),
            ParamField::Spin => Some(-5.0..=5.0),
            ParamField::Randomness => Some(0.0..=2.0),
            ParamField::RandomnessPower => Some(1.0..=10.0),
            ParamField::InsideColor | ParamField::OutsideColor => None,
        }
    }

    /// Checks a candidate value against the legal range of this field.
    pub fn check(self, value: ParamValue) -> Result<(), ParamError> {
        let out_of_range = |value: f64, expected| ParamError::OutOfRange {
            field: self,
            value,
            expected,
        };

        match (self, value) {
            (ParamField::Count, ParamValue::Int(n)) => {
                if (1..=MAX_COUNT).contains(&n) {
                    Ok(())
                } else {
                    Err(out_of_range(n as f64, "1..=1000000"))
                }
            }
            (ParamField::Branches, ParamValue::Int(n)) => {
                if n >= 1 {
                    Ok(())
                } else {
                    Err(out_of_range(n as f64, ">= 1"))
                }
            }
            (ParamField::ParticleSize, ParamValue::Float(v)) => check_float(self, v, v > 0.0, "> 0"),
            (ParamField::Radius, ParamValue::Float(v)) => {
                check_float(self, v, v > 0.0 && v <= MAX_RADIUS, "(0, 1e6]")
            }
            (ParamField::Spin, ParamValue::Float(v)) => {
                check_float(self, v, v.abs() <= MAX_ABS_SPIN, "[-1e6, 1e6]")
            }
            (ParamField::Randomness, ParamValue::Float(v)) => {
                check_float(self, v, (0.0..=MAX_RANDOMNESS).contains(&v), "[0, 1000]")
            }
            (ParamField::RandomnessPower, ParamValue::Float(v)) => {
                check_float(self, v, v >= 1.0, ">= 1")
            }
            (ParamField::InsideColor | ParamField::OutsideColor, ParamValue::Color(c)) => {
                if !c.is_finite() {
                    return Err(ParamError::NotFinite { field: self });
                }
                match c.to_array().into_iter().find(|ch| !(0.0..=1.0).contains(ch)) {
                    Some(ch) => Err(out_of_range(ch as f64, "[0, 1] per channel")),
                    None => Ok(()),
                }
            }
            _ => Err(ParamError::WrongKind { field: self }),
        }
    }
}

fn check_float(
    field: ParamField,
    v: f32,
    in_range: bool,
    expected: &'static str,
) -> Result<(), ParamError> {
    if !v.is_finite() {
        Err(ParamError::NotFinite { field })
    } else if !in_range {
        Err(ParamError::OutOfRange {
            field,
            value: v as f64,
            expected,
        })
    } else {
        Ok(())
    }
}

impl fmt::Display for ParamField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value for one [`ParamField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Int(u32),
    Float(f32),
    Color(Rgb),
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v)
    }
}

impl From<Rgb> for ParamValue {
    fn from(v: Rgb) -> Self {
        ParamValue::Color(v)
    }
}

impl GalaxyParams {
    pub fn get(&self, field: ParamField) -> ParamValue {
        match field {
            ParamField::Count => ParamValue::Int(self.count),
            ParamField::ParticleSize => ParamValue::Float(self.particle_size),
            ParamField::Radius => ParamValue::Float(self.radius),
            ParamField::Branches => ParamValue::Int(self.branches),
            ParamField::Spin => ParamValue::Float(self.spin),
            ParamField::Randomness => ParamValue::Float(self.randomness),
            ParamField::RandomnessPower => ParamValue::Float(self.randomness_power),
            ParamField::InsideColor => ParamValue::Color(self.inside_color),
            ParamField::OutsideColor => ParamValue::Color(self.outside_color),
        }
    }

    /// Validates `value` for `field` and stores it.
    ///
    /// On error `self` is left untouched.
    pub fn set(&mut self, field: ParamField, value: ParamValue) -> Result<(), ParamError> {
        field.check(value)?;
        match (field, value) {
            (ParamField::Count, ParamValue::Int(v)) => self.count = v,
            (ParamField::ParticleSize, ParamValue::Float(v)) => self.particle_size = v,
            (ParamField::Radius, ParamValue::Float(v)) => self.radius = v,
            (ParamField::Branches, ParamValue::Int(v)) => self.branches = v,
            (ParamField::Spin, ParamValue::Float(v)) => self.spin = v,
            (ParamField::Randomness, ParamValue::Float(v)) => self.randomness = v,
            (ParamField::RandomnessPower, ParamValue::Float(v)) => self.randomness_power = v,
            (ParamField::InsideColor, ParamValue::Color(c)) => self.inside_color = c,
            (ParamField::OutsideColor, ParamValue::Color(c)) => self.outside_color = c,
            _ => return Err(ParamError::WrongKind { field }),
        }
        Ok(())
    }

    /// Returns the first field that violates its legal range.
    pub fn validate(&self) -> Result<(), ParamError> {
        ParamField::ALL
            .iter()
            .try_for_each(|&field| field.check(self.get(field)))
    }
}
