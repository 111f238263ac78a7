//! Interactive spiral-galaxy viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the parameter model and the
//! field controller and implements [`eframe::App`] to edit parameters and
//! paint the active field as projected points.

use eframe::App;
use galaxy_core::{
    config::{GalaxyParams, ParamValue},
    editor::{ParamField, ParameterModel},
    error::ParamError,
    lifecycle::FieldController,
    preset::{self, Preset},
    types::Rgb,
};
use std::ops::RangeInclusive;

use glam::{Quat, Vec3};
use log::{error, info};
use rand::{rng, rngs::ThreadRng};

use crate::scene::PainterScene;

/// Vertical field of view of the orbit camera (radians).
const FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
/// Points closer to the camera than this are not drawn.
const NEAR: f32 = 0.05;

/// Widens a panel range so it also covers `current`.
///
/// `DragValue` clamps the value it is given to its range, so a legal value
/// outside the panel range (e.g. from a loaded preset) must stay reachable.
fn widget_range(range: &RangeInclusive<f64>, current: f64) -> RangeInclusive<f64> {
    range.start().min(current)..=range.end().max(current)
}

/// Panel rows: field and drag speed.
const PARAM_ROWS: [(ParamField, f64); 9] = [
    (ParamField::Count, 100.0),
    (ParamField::ParticleSize, 0.001),
    (ParamField::Radius, 0.05),
    (ParamField::Branches, 0.1),
    (ParamField::Spin, 0.01),
    (ParamField::Randomness, 0.005),
    (ParamField::RandomnessPower, 0.05),
    (ParamField::InsideColor, 0.0),
    (ParamField::OutsideColor, 0.0),
];

/// Main application state for the interactive viewer.
///
/// [`Viewer`] glues together:
/// - The parameter model edited by the side panel.
/// - The [`FieldController`] that owns the active field, attached to a
///   [`PainterScene`].
/// - A simple orbit camera (yaw, pitch, distance) for painting.
///
/// Slider drags only stage edits. A regeneration happens when a drag is
/// released, a typed value loses focus, a preset is applied, or the
/// "Regenerate" button is pressed.
pub struct Viewer {
    model: ParameterModel,
    controller: FieldController<PainterScene, ThreadRng>,

    yaw: f32,
    pitch: f32,
    distance: f32,
    auto_rotate: bool,

    selected_preset: usize,
    preset_path: String,
    status: String,
}

impl Viewer {
    /// Creates a viewer and generates the default field.
    pub fn new() -> Self {
        let model = ParameterModel::default();
        let controller = FieldController::new(PainterScene::default(), rng());

        let mut viewer = Self {
            model,
            controller,
            yaw: 0.0,
            pitch: 0.6,
            distance: 12.0,
            auto_rotate: true,
            selected_preset: 0,
            preset_path: "galaxy.json".to_owned(),
            status: String::new(),
        };
        viewer.regenerate_committed();
        viewer
    }

    /// Regenerates from the committed snapshot, whether or not it changed.
    fn regenerate_committed(&mut self) {
        let params = *self.model.committed();
        match self.controller.regenerate(&params) {
            Ok(id) => self.status = format!("field {id}: {} particles", params.count),
            Err(err) => {
                error!("regeneration failed: {err}");
                self.status = format!("Regeneration failed: {err}");
            }
        }
    }

    /// Commits pending edits and regenerates if anything changed.
    ///
    /// If regeneration fails the previous field stays on screen and the
    /// edit is rolled back.
    fn commit(&mut self) {
        let previous = *self.model.committed();
        let Some(params) = self.model.commit() else {
            return;
        };

        match self.controller.regenerate(&params) {
            Ok(id) => self.status = format!("field {id}: {} particles", params.count),
            Err(err) => {
                error!("regeneration failed, reverting edit: {err}");
                self.status = format!("Regeneration failed: {err}");
                if let Err(err) = self.model.restore(previous) {
                    error!("cannot restore previous parameters: {err}");
                }
            }
        }
    }

    fn apply_preset(&mut self, preset: &Preset) {
        match self.model.replace(preset.params) {
            Ok(()) => {
                info!("applying preset {:?}", preset.name);
                self.commit();
            }
            Err(err) => self.status = format!("Preset {:?} rejected: {err}", preset.name),
        }
    }

    fn save_preset(&mut self) {
        match self.model.get().save(&self.preset_path) {
            Ok(()) => self.status = format!("Saved {}", self.preset_path),
            Err(err) => self.status = format!("Save failed: {err}"),
        }
    }

    fn load_preset(&mut self) {
        let loaded = GalaxyParams::load(&self.preset_path).map_err(|e| e.to_string());
        match loaded.and_then(|p| self.model.replace(p).map_err(|e| e.to_string())) {
            Ok(()) => {
                self.status = format!("Loaded {}", self.preset_path);
                self.commit();
            }
            Err(err) => self.status = format!("Load failed: {err}"),
        }
    }

    fn reset_params(&mut self) {
        match self.model.replace(GalaxyParams::default()) {
            Ok(()) => self.commit(),
            Err(err) => self.status = format!("Reset failed: {err}"),
        }
    }

    fn view_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    /// Projects a scene-space point into `rect`.
    ///
    /// The camera sits at `distance` on the view axis looking at the origin.
    ///
    /// ### Returns
    /// - `Some((screen_pos, scale))` where `scale` is pixels per scene unit at
    ///   the point's depth.
    /// - `None` if the point is behind the near plane.
    fn project(&self, rot: Quat, p: Vec3, rect: egui::Rect) -> Option<(egui::Pos2, f32)> {
        let view = rot * p;
        let depth = self.distance - view.z;
        if depth <= NEAR {
            return None;
        }

        let focal = rect.height() * 0.5 / (FOV_Y * 0.5).tan();
        let scale = focal / depth;
        let center = rect.center();
        Some((
            egui::pos2(center.x + view.x * scale, center.y - view.y * scale),
            scale,
        ))
    }

    /// Draws one panel row for `field` and stages any change.
    ///
    /// ### Returns
    /// - `Ok(true)` if the edit was finalized (drag released or focus lost).
    /// - `Err` if the staged value was rejected.
    fn param_row(
        ui: &mut egui::Ui,
        model: &mut ParameterModel,
        field: ParamField,
        speed: f64,
    ) -> Result<bool, ParamError> {
        ui.horizontal(|ui| -> Result<bool, ParamError> {
            ui.label(format!("{}:", field.name()));
            let range = field.ui_range().unwrap_or(0.0..=1.0);

            let (response, edited) = match model.get().get(field) {
                ParamValue::Int(mut v) => {
                    let range = widget_range(&range, v as f64);
                    let r = ui.add(
                        egui::DragValue::new(&mut v)
                            .range(*range.start() as u32..=*range.end() as u32)
                            .speed(speed),
                    );
                    (r, ParamValue::Int(v))
                }
                ParamValue::Float(mut v) => {
                    let range = widget_range(&range, v as f64);
                    let r = ui.add(
                        egui::DragValue::new(&mut v)
                            .range(*range.start() as f32..=*range.end() as f32)
                            .speed(speed),
                    );
                    (r, ParamValue::Float(v))
                }
                ParamValue::Color(c) => {
                    let mut rgb = c.to_array();
                    let r = egui::color_picker::color_edit_button_rgb(ui, &mut rgb);
                    (r, ParamValue::Color(Rgb::from(rgb)))
                }
            };

            if response.changed() {
                model.set(field, edited)?;
            }
            Ok(response.drag_stopped() || response.lost_focus())
        })
        .inner
    }

    /// Builds the top panel (regenerate, revert, presets, camera).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    if self.model.is_dirty() {
                        self.commit();
                    } else {
                        self.regenerate_committed();
                    }
                }

                if ui
                    .add_enabled(self.model.is_dirty(), egui::Button::new("Revert"))
                    .clicked()
                {
                    self.model.revert();
                }

                ui.separator();
                let presets = preset::presets();
                let mut chosen = None;
                egui::ComboBox::from_label("Preset")
                    .selected_text(presets[self.selected_preset.min(presets.len() - 1)].name)
                    .show_ui(ui, |ui| {
                        for (i, p) in presets.iter().enumerate() {
                            if ui
                                .selectable_label(i == self.selected_preset, p.name)
                                .on_hover_text(p.description)
                                .clicked()
                            {
                                chosen = Some(i);
                            }
                        }
                    });
                if let Some(i) = chosen {
                    self.selected_preset = i;
                    self.apply_preset(&presets[i]);
                }

                ui.separator();
                ui.checkbox(&mut self.auto_rotate, "Auto-rotate");
                if ui.button("Reset view").clicked() {
                    self.yaw = 0.0;
                    self.pitch = 0.6;
                    self.distance = 12.0;
                }
            });
        });
    }

    /// Builds the bottom status bar.
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(field) = self.controller.active() {
                    ui.label(format!("particles = {}", field.buffer().len()));
                    ui.label(format!("field = {}", field.id()));
                }
                ui.label(format!("generation = {}", self.controller.generation()));
                if self.model.is_dirty() {
                    ui.colored_label(egui::Color32::YELLOW, "pending edits");
                }
                ui.separator();
                ui.label(self.status.as_str());
            });
        });
    }

    /// Builds the right-hand parameter panel.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading("Galaxy");
                ui.separator();

                let mut finalized = false;
                for (field, speed) in PARAM_ROWS {
                    match Self::param_row(ui, &mut self.model, field, speed) {
                        Ok(done) => finalized |= done,
                        Err(err) => self.status = err.to_string(),
                    }
                }
                if finalized {
                    self.commit();
                }

                ui.separator();
                ui.label("Preset file");
                ui.text_edit_singleline(&mut self.preset_path);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.save_preset();
                    }
                    if ui.button("Load").clicked() {
                        self.load_preset();
                    }
                });

                ui.separator();
                if ui.button("Reset params to default").clicked() {
                    self.reset_params();
                }
            });
    }

    /// Builds the central panel where the active field is painted.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let response =
                    ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                // Orbit with drag.
                if response.dragged() {
                    let delta = response.drag_delta();
                    self.yaw += delta.x * 0.01;
                    self.pitch = (self.pitch + delta.y * 0.01).clamp(-1.5, 1.5);
                }

                // Dolly with scroll.
                let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
                if scroll != 0.0 && response.hovered() {
                    let factor = (1.0 - scroll * 0.001).clamp(0.5, 2.0);
                    self.distance = (self.distance * factor).clamp(0.5, 200.0);
                }

                if self.auto_rotate {
                    self.yaw += ctx.input(|i| i.stable_dt) * 0.1;
                    ctx.request_repaint();
                }

                let Some(up) = self.controller.scene().uploaded() else {
                    return;
                };

                // Depth writes are off and colors are additive, so draw order
                // does not matter.
                let rot = self.view_rotation();
                let mut mesh = egui::Mesh::default();
                for (&p, &color) in up.positions.iter().zip(&up.colors) {
                    let Some((pos, scale)) = self.project(rot, p, rect) else {
                        continue;
                    };
                    if !rect.contains(pos) {
                        continue;
                    }
                    let px = if up.size_attenuation {
                        (up.size * scale).max(1.0)
                    } else {
                        up.size.max(1.0)
                    };
                    mesh.add_colored_rect(
                        egui::Rect::from_center_size(pos, egui::vec2(px, px)),
                        color,
                    );
                }
                painter.add(egui::Shape::mesh(mesh));
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    fn flat_viewer() -> Viewer {
        let mut viewer = Viewer::new();
        viewer.yaw = 0.0;
        viewer.pitch = 0.0;
        viewer.distance = 10.0;
        viewer
    }

    #[test]
    fn new_viewer_shows_default_field() {
        let viewer = Viewer::new();
        let field = viewer.controller.active().unwrap();
        assert_eq!(field.buffer().len(), GalaxyParams::default().count as usize);
        assert_eq!(viewer.controller.generation(), 1);
        assert!(viewer.controller.scene().uploaded().is_some());
    }

    #[test]
    fn origin_projects_to_rect_center() {
        let viewer = flat_viewer();
        let rect = test_rect();
        let (pos, scale) = viewer
            .project(viewer.view_rotation(), Vec3::ZERO, rect)
            .unwrap();
        assert_eq!(pos, rect.center());
        assert!(scale > 0.0);
    }

    #[test]
    fn projection_keeps_axis_orientation() {
        let viewer = flat_viewer();
        let rect = test_rect();
        let rot = viewer.view_rotation();

        let (right, _) = viewer.project(rot, Vec3::X, rect).unwrap();
        let (up, _) = viewer.project(rot, Vec3::Y, rect).unwrap();
        assert!(right.x > rect.center().x);
        assert!(up.y < rect.center().y);
    }

    #[test]
    fn points_behind_the_camera_are_culled() {
        let viewer = flat_viewer();
        let p = Vec3::new(0.0, 0.0, viewer.distance + 1.0);
        assert!(
            viewer
                .project(viewer.view_rotation(), p, test_rect())
                .is_none()
        );
    }

    #[test]
    fn commit_without_edits_does_not_regenerate() {
        let mut viewer = Viewer::new();
        viewer.commit();
        assert_eq!(viewer.controller.generation(), 1);
    }

    #[test]
    fn committed_edit_replaces_the_field() {
        let mut viewer = Viewer::new();
        viewer.model.set(ParamField::Count, 1_000u32).unwrap();
        // Staged edits leave the displayed field alone.
        assert_eq!(
            viewer.controller.active().unwrap().buffer().len(),
            GalaxyParams::default().count as usize
        );

        viewer.commit();

        assert_eq!(viewer.controller.generation(), 2);
        let scene = viewer.controller.scene();
        assert_eq!(scene.uploaded().unwrap().positions.len(), 1_000);
        assert_eq!(scene.releases(), 1);
        assert!(!viewer.model.is_dirty());
    }

    #[test]
    fn applying_a_preset_regenerates_with_its_params() {
        let mut viewer = Viewer::new();
        let ring = preset::find("Ring").unwrap();
        viewer.apply_preset(&ring);

        let field = viewer.controller.active().unwrap();
        assert_eq!(field.params(), &ring.params);
        assert_eq!(viewer.model.committed(), &ring.params);
    }

    #[test]
    fn reset_params_restores_defaults_and_regenerates() {
        let mut viewer = Viewer::new();
        viewer.model.set(ParamField::Branches, 7u32).unwrap();
        viewer.commit();
        assert_eq!(viewer.controller.generation(), 2);

        viewer.reset_params();
        assert_eq!(viewer.model.committed(), &GalaxyParams::default());
        assert_eq!(viewer.controller.active().unwrap().params(), &GalaxyParams::default());
        assert_eq!(viewer.controller.generation(), 3);
    }

    #[test]
    fn widget_range_covers_values_outside_the_panel_range() {
        let panel = 100.0..=1_000_000.0;
        assert_eq!(widget_range(&panel, 500.0), panel);
        assert_eq!(widget_range(&panel, 50.0), 50.0..=1_000_000.0);

        let radius = 0.01..=20.0;
        assert_eq!(widget_range(&radius, 30.0), 0.01..=30.0);
    }

    #[test]
    fn loaded_values_outside_panel_range_are_not_rewritten() {
        let path = std::env::temp_dir().join(format!(
            "galaxy-view-wide-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let wide = GalaxyParams {
            count: 50,
            radius: 30.0,
            spin: 8.0,
            ..GalaxyParams::default()
        };
        wide.save(&path).unwrap();

        let mut viewer = Viewer::new();
        viewer.preset_path = path.to_string_lossy().into_owned();
        viewer.load_preset();
        let _ = std::fs::remove_file(&path);
        assert_eq!(viewer.model.committed(), &wide);
        let generation = viewer.controller.generation();

        // Draw the parameter panel a few times, as eframe would.
        let ctx = egui::Context::default();
        for _ in 0..3 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| viewer.ui_config_panel(ctx));
        }

        assert!(!viewer.model.is_dirty());
        assert_eq!(viewer.model.get(), &wide);
        assert_eq!(viewer.controller.generation(), generation);
    }

    #[test]
    fn regenerate_committed_redraws_same_params() {
        let mut viewer = Viewer::new();
        let before = viewer.controller.active().unwrap().id();
        viewer.regenerate_committed();

        let field = viewer.controller.active().unwrap();
        assert_ne!(field.id(), before);
        assert_eq!(field.params(), viewer.model.committed());
    }
}
