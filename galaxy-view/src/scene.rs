//! Painter-backed [`Scene`] that keeps a render-ready copy of the active field.
//!
//! On attach the buffers are "uploaded": positions are copied into `Vec3`s
//! and colors converted once into [`egui::Color32`], so the per-frame paint
//! only has to project points. Detach releases the upload.

use egui::Color32;
use galaxy_core::{
    lifecycle::{PointField, Scene},
    types::FieldId,
};
use glam::Vec3;
use log::debug;

/// Render-ready copy of one field.
pub struct UploadedField {
    pub id: FieldId,
    pub positions: Vec<Vec3>,
    pub colors: Vec<Color32>,
    /// Point size in scene units.
    pub size: f32,
    pub size_attenuation: bool,
}

#[derive(Default)]
pub struct PainterScene {
    uploaded: Option<UploadedField>,
    uploads: usize,
    releases: usize,
}

impl PainterScene {
    pub fn uploaded(&self) -> Option<&UploadedField> {
        self.uploaded.as_ref()
    }

    /// Total number of attach calls seen.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// Total number of uploads released by detach.
    pub fn releases(&self) -> usize {
        self.releases
    }
}

/// Converts a linear `[0, 1]` color to egui's color type.
///
/// Additive colors carry zero alpha so overlapping points brighten each other.
fn to_color32(c: Vec3, additive: bool) -> Color32 {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    if additive {
        Color32::from_rgb_additive(q(c.x), q(c.y), q(c.z))
    } else {
        Color32::from_rgb(q(c.x), q(c.y), q(c.z))
    }
}

impl Scene for PainterScene {
    fn attach(&mut self, field: &PointField) {
        let buffer = field.buffer();
        let material = field.material();

        let positions = (0..buffer.len()).map(|i| buffer.position(i)).collect();
        let colors = (0..buffer.len())
            .map(|i| {
                let c = if material.vertex_colors {
                    buffer.color(i)
                } else {
                    Vec3::ONE
                };
                to_color32(c, material.additive_blending)
            })
            .collect();

        debug!("uploaded field {} ({} points)", field.id(), buffer.len());
        self.uploaded = Some(UploadedField {
            id: field.id(),
            positions,
            colors,
            size: material.size,
            size_attenuation: material.size_attenuation,
        });
        self.uploads += 1;
    }

    fn detach(&mut self, id: FieldId) {
        if self.uploaded.as_ref().is_some_and(|u| u.id == id) {
            self.uploaded = None;
            self.releases += 1;
            debug!("released field {id}");
        }
    }
}
