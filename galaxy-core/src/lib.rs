//! Procedural spiral-galaxy particle field library.
//!
//! Main components:
//! - [`config`] — generation parameters and their legal ranges.
//! - [`editor`] — editable parameter model with an explicit commit step.
//! - [`field`] — position/color synthesis into a [`field::ParticleBuffer`].
//! - [`lifecycle`] — owns the active field and swaps it on regeneration.
//! - [`random`] — injectable uniform deviate sources.
//! - [`preset`] — built-in presets and JSON preset files.
//! - [`error`] — error types.
//! - [`types`] — colors and shared ids.

pub mod config;
pub mod editor;
pub mod error;
pub mod field;
pub mod lifecycle;
pub mod preset;
pub mod random;
pub mod types;
