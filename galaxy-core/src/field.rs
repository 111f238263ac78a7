//! Spiral particle-field synthesis.
//!
//! [`generate`] turns a [`GalaxyParams`] snapshot into a freshly allocated
//! [`ParticleBuffer`]. Each particle is placed as follows:
//!
//! 1. Draw a radius `r` uniformly in `[0, params.radius)`.
//! 2. Pick its arm by index residue: `branch = (i mod branches) / branches * 2π`.
//! 3. Twist the arm by `r * params.spin`.
//! 4. Scatter each axis by `u^randomness_power * ±1 * randomness * r`.
//! 5. Color by mixing inside/outside colors with `t = r / params.radius`.
//!
//! The field is flat in `y` apart from scatter.
//!
//! Deviates are drawn in a fixed order per particle: radius, then magnitude
//! and sign for x, y, and z (seven draws in total).

use std::f32::consts::TAU;
use std::mem::size_of;

use glam::Vec3;

use crate::{config::GalaxyParams, error::GalaxyError, random::UniformSource};

/// Number of deviates [`sample_particle`] consumes per particle.
pub const DRAWS_PER_PARTICLE: usize = 7;

/// Generated positions and colors, three floats per particle.
///
/// Both arrays use the same indexing: particle `i` lives at `3*i..3*i + 3`.
/// A buffer is never mutated after [`generate`] returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBuffer {
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl ParticleBuffer {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Scene-space XYZ, `3 * len()` floats.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// RGB per particle, `3 * len()` floats.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn position(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.positions[3 * i..3 * i + 3])
    }

    #[inline]
    pub fn color(&self, i: usize) -> Vec3 {
        Vec3::from_slice(&self.colors[3 * i..3 * i + 3])
    }

    /// Total size of both arrays in bytes.
    pub fn byte_size(&self) -> usize {
        (self.positions.len() + self.colors.len()) * size_of::<f32>()
    }
}

/// Angle of the arm particle `i` belongs to.
///
/// Assignment is by index residue, so arms stay evenly populated for any
/// particle count.
///
/// ### Parameters
/// - `i` - Particle index.
/// - `branches` - Number of arms; must be at least 1 (checked by
///   [`GalaxyParams::validate`]).
#[inline]
pub fn branch_angle(i: usize, branches: u32) -> f32 {
    debug_assert!(branches >= 1, "branch_angle needs at least one arm");
    let branches = branches as usize;
    (i % branches) as f32 / branches as f32 * TAU
}

/// Signed scatter along one axis for a particle at radius `radius`.
#[inline]
fn scatter<S: UniformSource + ?Sized>(source: &mut S, params: &GalaxyParams, radius: f32) -> f32 {
    let magnitude = source.next_unit().powf(params.randomness_power);
    let sign = source.next_sign();
    magnitude * sign * params.randomness * radius
}

/// Synthesizes the position and color of particle `i`.
///
/// `params` is assumed to be valid; [`generate`] checks it once up front.
///
/// ### Returns
/// `(position, color)` for the particle.
pub fn sample_particle<S: UniformSource + ?Sized>(
    i: usize,
    params: &GalaxyParams,
    source: &mut S,
) -> (Vec3, Vec3) {
    let radius = source.next_unit() * params.radius;
    let angle = branch_angle(i, params.branches) + radius * params.spin;

    let offset_x = scatter(source, params, radius);
    let offset_y = scatter(source, params, radius);
    let offset_z = scatter(source, params, radius);

    let position = Vec3::new(
        angle.cos() * radius + offset_x,
        offset_y,
        angle.sin() * radius + offset_z,
    );

    let t = radius / params.radius;
    let color = Vec3::from(params.inside_color).lerp(Vec3::from(params.outside_color), t);

    (position, color)
}

/// Reserves the position and color arrays up front, `len` floats each.
///
/// Nothing is written on failure. `MAX_COUNT` keeps real fields far below any
/// allocation limit, so in practice this only fails when memory is exhausted.
fn reserve_channels(count: u32, len: usize) -> Result<(Vec<f32>, Vec<f32>), GalaxyError> {
    let exhausted = || GalaxyError::ResourceExhausted {
        count,
        bytes: len.saturating_mul(2 * size_of::<f32>()),
    };

    let mut positions = Vec::new();
    let mut colors = Vec::new();
    positions.try_reserve_exact(len).map_err(|_| exhausted())?;
    colors.try_reserve_exact(len).map_err(|_| exhausted())?;
    Ok((positions, colors))
}

/// Generates a complete particle field for `params`.
///
/// ### Parameters
/// - `params` - Snapshot to generate from; validated before anything is allocated.
/// - `source` - Uniform deviates; see the module docs for the draw order.
///
/// ### Returns
/// - `Ok(ParticleBuffer)` with exactly `3 * params.count` floats per array.
/// - `Err(GalaxyError::InvalidParams)` if `params` fails validation.
/// - `Err(GalaxyError::ResourceExhausted)` if the arrays cannot be allocated.
pub fn generate<S: UniformSource + ?Sized>(
    params: &GalaxyParams,
    source: &mut S,
) -> Result<ParticleBuffer, GalaxyError> {
    params.validate()?;

    let count = params.count as usize;
    let (mut positions, mut colors) = reserve_channels(params.count, count * 3)?;

    for i in 0..count {
        let (p, c) = sample_particle(i, params, source);
        positions.extend_from_slice(&p.to_array());
        colors.extend_from_slice(&c.to_array());
    }

    Ok(ParticleBuffer { positions, colors })
}
