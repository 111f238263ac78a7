//! Regenerate-and-replace lifecycle for the active particle field.
//!
//! A [`FieldController`] owns at most one [`PointField`] at a time. On
//! [`FieldController::regenerate`] it:
//!
//! 1. Generates the new buffers first. If that fails, the old field stays
//!    attached and the error is returned.
//! 2. Detaches the old field from the [`Scene`] and drops it. Dropping a
//!    [`PointField`] frees its buffers.
//! 3. Attaches the new field and keeps it as the active one.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::{
    config::GalaxyParams,
    error::GalaxyError,
    field::{ParticleBuffer, generate},
    random::UniformSource,
    types::FieldId,
};

/// Minimal material description for rendering a field as points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointsMaterial {
    pub size: f32,
    pub size_attenuation: bool,
    pub additive_blending: bool,
    pub depth_write: bool,
    pub vertex_colors: bool,
}

impl PointsMaterial {
    pub fn for_params(params: &GalaxyParams) -> Self {
        Self {
            size: params.particle_size,
            size_attenuation: true,
            additive_blending: true,
            depth_write: false,
            vertex_colors: true,
        }
    }
}

/// A drawable particle field: buffers, material, and the snapshot they came from.
///
/// The field exclusively owns its buffers. Dropping it disposes them.
///
/// ### Fields
/// - `id` - Unique id assigned by the controller; never reused.
/// - `params` - Snapshot the buffers were generated from.
/// - `buffer` - Positions and colors, `3 * params.count` floats each.
/// - `material` - Point rendering settings derived from `params`.
#[derive(Debug)]
pub struct PointField {
    id: FieldId,
    params: GalaxyParams,
    buffer: ParticleBuffer,
    material: PointsMaterial,
}

impl PointField {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn params(&self) -> &GalaxyParams {
        &self.params
    }

    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    pub fn material(&self) -> &PointsMaterial {
        &self.material
    }
}

impl Drop for PointField {
    fn drop(&mut self) {
        debug!(
            "disposing field {} ({} particles, {} bytes)",
            self.id,
            self.buffer.len(),
            self.buffer.byte_size()
        );
    }
}

/// The scene graph the active field is attached to.
///
/// Implementations typically upload the buffers on `attach` and release
/// whatever they uploaded on `detach`.
pub trait Scene {
    fn attach(&mut self, field: &PointField);
    fn detach(&mut self, id: FieldId);
}

/// A scene that discards everything, for headless use.
impl Scene for () {
    fn attach(&mut self, _field: &PointField) {}
    fn detach(&mut self, _id: FieldId) {}
}

/// Owns the active field and swaps it on regeneration.
///
/// ### Fields
/// - `scene` - Scene the active field is attached to.
/// - `source` - Uniform deviates fed to [`generate`].
/// - `active` - The currently attached field, `None` until the first success.
///
/// - `next_id` - Id handed to the next generated field.
/// - `generation` - Count of successful regenerations.
pub struct FieldController<S, R> {
    scene: S,
    source: R,
    active: Option<PointField>,
    next_id: FieldId,
    generation: u64,
}

impl<S: Scene, R: UniformSource> FieldController<S, R> {
    /// Creates an idle controller with no active field.
    pub fn new(scene: S, source: R) -> Self {
        Self {
            scene,
            source,
            active: None,
            next_id: 1,
            generation: 0,
        }
    }

    /// Generates a field for `params` and makes it the active one.
    ///
    /// ### Returns
    /// - `Ok(id)` of the newly attached field.
    /// - `Err` from [`generate`]; the previously active field (if any)
    ///   remains attached.
    pub fn regenerate(&mut self, params: &GalaxyParams) -> Result<FieldId, GalaxyError> {
        let started = Instant::now();

        let buffer = generate(params, &mut self.source).inspect_err(|err| {
            warn!("regeneration rejected, keeping previous field: {err}");
        })?;

        let field = PointField {
            id: self.next_id,
            params: *params,
            buffer,
            material: PointsMaterial::for_params(params),
        };
        self.next_id += 1;

        if let Some(old) = self.active.take() {
            debug!("detaching field {}", old.id);
            self.scene.detach(old.id);
        }

        debug!("attaching field {}", field.id);
        self.scene.attach(&field);
        let id = field.id;
        self.active = Some(field);
        self.generation += 1;

        info!(
            "generated field {id}: {} particles, {} branches in {:.1} ms",
            params.count,
            params.branches,
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(id)
    }

    pub fn active(&self) -> Option<&PointField> {
        self.active.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of successful regenerations.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}

/// Shareable single-threaded handle to a [`FieldController`].
///
/// Hosts that wire the controller into several callbacks can clone this
/// handle. Entering [`SharedController::regenerate`] while the controller is
/// already borrowed (for example from inside a [`Scene`] callback) fails
/// with [`GalaxyError::Busy`]; requests are never queued.
pub struct SharedController<S, R> {
    inner: Rc<RefCell<FieldController<S, R>>>,
}

impl<S, R> Clone for SharedController<S, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Scene, R: UniformSource> SharedController<S, R> {
    pub fn new(controller: FieldController<S, R>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(controller)),
        }
    }

    pub fn regenerate(&self, params: &GalaxyParams) -> Result<FieldId, GalaxyError> {
        let mut controller = self.inner.try_borrow_mut().map_err(|_| {
            warn!("regeneration requested while another one is in flight");
            GalaxyError::Busy
        })?;
        controller.regenerate(params)
    }

    /// Runs `f` with shared access to the controller.
    pub fn with<T>(&self, f: impl FnOnce(&FieldController<S, R>) -> T) -> Result<T, GalaxyError> {
        let controller = self.inner.try_borrow().map_err(|_| GalaxyError::Busy)?;
        Ok(f(&controller))
    }

    /// Runs `f` with exclusive access to the controller.
    ///
    /// ### Returns
    /// - `Ok(T)` with the result of `f`.
    /// - `Err(GalaxyError::Busy)` if the controller is already borrowed.
    pub fn with_mut<T>(
        &self,
        f: impl FnOnce(&mut FieldController<S, R>) -> T,
    ) -> Result<T, GalaxyError> {
        let mut controller = self.inner.try_borrow_mut().map_err(|_| GalaxyError::Busy)?;
        Ok(f(&mut controller))
    }
}
