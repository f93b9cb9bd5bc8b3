//! Select-then-confirm protocol for four-option rounds
//!
//! In a shared-button kiosk a single accidental tap must not submit an
//! answer, so four-option rounds require a deliberate double-activation:
//! the first activation of an option highlights it, and only re-activating
//! the already-highlighted option confirms it as the final answer.
//! Activating a *different* option while one is highlighted is a no-op.

use crate::rounds::OptionSlot;

/// Outcome of activating an option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// The option became the current selection; swap its visual
    Selected(OptionSlot),
    /// The already-selected option was re-activated; treat as the final answer
    Confirmed(OptionSlot),
    /// A different option was activated while one was selected; no effect
    Ignored,
}

/// Tracks the at-most-one currently selected option of a four-option round
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionController {
    selected: Option<OptionSlot>,
}

impl SelectionController {
    /// Applies one activation of `slot`
    ///
    /// Confirming does not clear the selection; the engine calls [`reset`]
    /// explicitly once feedback completes or the round changes, so the
    /// selected visual stays latched through the feedback interval.
    ///
    /// [`reset`]: SelectionController::reset
    pub fn activate(&mut self, slot: OptionSlot) -> Activation {
        match self.selected {
            None => {
                self.selected = Some(slot);
                Activation::Selected(slot)
            }
            Some(selected) if selected == slot => Activation::Confirmed(slot),
            Some(_) => Activation::Ignored,
        }
    }

    /// The currently selected option, if any
    pub fn selected(&self) -> Option<OptionSlot> {
        self.selected
    }

    /// Clears the selection
    ///
    /// Returns the slot that was selected so the caller can revert its
    /// visual. Must be called on every round transition and session start.
    pub fn reset(&mut self) -> Option<OptionSlot> {
        self.selected.take()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_first_activation_selects() {
        let mut selection = SelectionController::default();
        assert_eq!(
            selection.activate(OptionSlot::C),
            Activation::Selected(OptionSlot::C)
        );
        assert_eq!(selection.selected(), Some(OptionSlot::C));
    }

    #[test]
    fn test_reactivation_confirms_exactly_once_per_reset() {
        let mut selection = SelectionController::default();
        selection.activate(OptionSlot::A);
        assert_eq!(
            selection.activate(OptionSlot::A),
            Activation::Confirmed(OptionSlot::A)
        );
        // Selection stays latched until reset, so further activations keep
        // confirming the same slot rather than re-selecting.
        assert_eq!(
            selection.activate(OptionSlot::A),
            Activation::Confirmed(OptionSlot::A)
        );
    }

    #[test]
    fn test_different_option_is_ignored() {
        let mut selection = SelectionController::default();
        selection.activate(OptionSlot::A);
        assert_eq!(selection.activate(OptionSlot::B), Activation::Ignored);
        // The original selection is untouched.
        assert_eq!(selection.selected(), Some(OptionSlot::A));
        assert_eq!(
            selection.activate(OptionSlot::A),
            Activation::Confirmed(OptionSlot::A)
        );
    }

    #[test]
    fn test_select_then_other_yields_no_confirm() {
        let mut selection = SelectionController::default();
        let outcomes = [
            selection.activate(OptionSlot::A),
            selection.activate(OptionSlot::D),
        ];
        assert!(
            !outcomes
                .iter()
                .any(|outcome| matches!(outcome, Activation::Confirmed(_)))
        );
    }

    #[test]
    fn test_reset_reports_cleared_slot() {
        let mut selection = SelectionController::default();
        selection.activate(OptionSlot::D);
        assert_eq!(selection.reset(), Some(OptionSlot::D));
        assert_eq!(selection.reset(), None);
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_selection_restarts_after_reset() {
        let mut selection = SelectionController::default();
        selection.activate(OptionSlot::B);
        selection.reset();
        assert_eq!(
            selection.activate(OptionSlot::C),
            Activation::Selected(OptionSlot::C)
        );
    }
}
