//! Editable parameter model with an explicit commit step.
//!
//! A parameter panel calls [`ParameterModel::set`] on every intermediate
//! change (e.g. while a slider is being dragged) and [`ParameterModel::commit`]
//! only when the edit is finalized. Only a commit should lead to a
//! regeneration, since regenerating up to a million particles is expensive.

pub use crate::config::{ParamField, ParamValue};

use crate::{config::GalaxyParams, error::ParamError};

#[derive(Debug, Clone)]
pub struct ParameterModel {
    draft: GalaxyParams,
    committed: GalaxyParams,
}

impl Default for ParameterModel {
    fn default() -> Self {
        let params = GalaxyParams::default();
        Self {
            draft: params,
            committed: params,
        }
    }
}

impl ParameterModel {
    /// Creates a model whose draft and committed snapshots are both `params`.
    pub fn new(params: GalaxyParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self {
            draft: params,
            committed: params,
        })
    }

    /// Current snapshot, including uncommitted edits.
    pub fn get(&self) -> &GalaxyParams {
        &self.draft
    }

    /// Snapshot as of the last commit.
    pub fn committed(&self) -> &GalaxyParams {
        &self.committed
    }

    /// Validates and stages a single field edit.
    ///
    /// On error the draft is left unchanged.
    pub fn set(&mut self, field: ParamField, value: impl Into<ParamValue>) -> Result<(), ParamError> {
        self.draft.set(field, value.into())
    }

    /// Stages a whole snapshot, e.g. a loaded preset.
    pub fn replace(&mut self, params: GalaxyParams) -> Result<(), ParamError> {
        params.validate()?;
        self.draft = params;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.committed
    }

    /// Finalizes pending edits.
    ///
    /// ### Returns
    /// - `Some(params)` with the new committed snapshot if anything changed.
    /// - `None` if there was nothing to commit.
    pub fn commit(&mut self) -> Option<GalaxyParams> {
        if !self.is_dirty() {
            return None;
        }
        self.committed = self.draft;
        Some(self.committed)
    }

    /// Discards pending edits.
    pub fn revert(&mut self) {
        self.draft = self.committed;
    }

    /// Rolls the committed snapshot back to `params` and discards the draft.
    ///
    /// Used when a committed snapshot could not be turned into a field.
    pub fn restore(&mut self, params: GalaxyParams) -> Result<(), ParamError> {
        params.validate()?;
        self.committed = params;
        self.draft = params;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    #[test]
    fn set_stages_without_committing() {
        let mut model = ParameterModel::default();
        model.set(ParamField::Count, 500u32).unwrap();

        assert_eq!(model.get().count, 500);
        assert_eq!(model.committed().count, GalaxyParams::default().count);
        assert!(model.is_dirty());
    }

    #[test]
    fn commit_publishes_once() {
        let mut model = ParameterModel::default();
        model.set(ParamField::Spin, -1.5f32).unwrap();
        model.set(ParamField::Spin, -2.0f32).unwrap();

        let committed = model.commit().expect("pending edits");
        assert_eq!(committed.spin, -2.0);
        assert_eq!(model.committed().spin, -2.0);
        assert!(!model.is_dirty());
        assert_eq!(model.commit(), None);
    }

    #[test]
    fn edit_back_to_committed_value_is_not_dirty() {
        let mut model = ParameterModel::default();
        let radius = model.get().radius;
        model.set(ParamField::Radius, radius + 1.0).unwrap();
        model.set(ParamField::Radius, radius).unwrap();
        assert!(!model.is_dirty());
        assert_eq!(model.commit(), None);
    }

    #[test]
    fn rejected_edit_keeps_previous_draft() {
        let mut model = ParameterModel::default();
        model.set(ParamField::Branches, 6u32).unwrap();

        let err = model.set(ParamField::Branches, 0u32).unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
        assert_eq!(model.get().branches, 6);
    }

    #[test]
    fn revert_discards_pending_edits() {
        let mut model = ParameterModel::default();
        model
            .set(ParamField::InsideColor, Rgb::new(0.0, 1.0, 0.0))
            .unwrap();
        model.revert();
        assert_eq!(model.get(), model.committed());
        assert!(!model.is_dirty());
    }

    #[test]
    fn replace_validates_whole_snapshot() {
        let mut model = ParameterModel::default();
        let bad = GalaxyParams {
            randomness_power: 0.0,
            ..GalaxyParams::default()
        };
        assert!(model.replace(bad).is_err());
        assert!(!model.is_dirty());

        let good = GalaxyParams {
            count: 1234,
            ..GalaxyParams::default()
        };
        model.replace(good).unwrap();
        assert_eq!(model.commit(), Some(good));
    }

    #[test]
    fn restore_rolls_back_committed_snapshot() {
        let mut model = ParameterModel::default();
        let before = *model.committed();
        model.set(ParamField::Count, 42u32).unwrap();
        model.commit();

        model.restore(before).unwrap();
        assert_eq!(model.committed(), &before);
        assert_eq!(model.get(), &before);
    }

    #[test]
    fn new_rejects_invalid_initial_params() {
        let bad = GalaxyParams {
            radius: 0.0,
            ..GalaxyParams::default()
        };
        assert!(ParameterModel::new(bad).is_err());
    }
}
