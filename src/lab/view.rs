//! Read-only view of the simulation handed to the presentation layer.
//!
//! Every query here is side-effect free; enablement predicates mirror the
//! preconditions enforced by the state machine, so a caller that only offers
//! available actions never hits a rejected one.

use serde::Serialize;

use super::action::LabAction;
use super::catalog::{self, REACTION_STEP, REAGENT_STEPS, SEPARATION_STEP, TOTAL_STEPS};
use super::types::{LabPhase, Product, Reagent, StepDescriptor, StepStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabSnapshot {
    pub current_step: usize,
    pub vessel_contents: Vec<Reagent>,
    pub is_reacting: bool,
    pub is_completed: bool,
}

/// What the reaction vessel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VesselView<'a> {
    /// Layers of reagents poured so far, bottom first
    Charging(&'a [Reagent]),
    Reacting(&'a [Reagent]),
    /// Products settled into layers, upper first
    Separated(&'a [Product]),
    /// Experiment finished; the vessel gives way to the report
    Completed(&'a [Product]),
}

impl LabSnapshot {
    pub fn progress_fraction(&self) -> f64 {
        self.current_step as f64 / TOTAL_STEPS as f64
    }

    /// Whole-number percentage for progress bars
    pub fn progress_percent(&self) -> u8 {
        (self.current_step * 100 / TOTAL_STEPS).min(100) as u8
    }

    /// Slot of the reagent that may be added next
    pub fn enabled_reagent_index(&self) -> Option<usize> {
        (self.current_step < REAGENT_STEPS && !self.is_completed).then_some(self.current_step)
    }

    pub fn next_reagent(&self) -> Option<&'static Reagent> {
        self.enabled_reagent_index()
            .and_then(catalog::reagent_for_step)
    }

    pub fn current_step_descriptor(&self) -> &'static StepDescriptor {
        catalog::step_descriptor(self.current_step)
    }

    pub fn is_action_available(&self, action: &LabAction) -> bool {
        match action {
            LabAction::AddReagent(reagent) => self
                .next_reagent()
                .is_some_and(|next| next.id == reagent.id),
            LabAction::StartReaction => self.current_step == REACTION_STEP && !self.is_reacting,
            LabAction::FinishExperiment => {
                self.current_step == SEPARATION_STEP && !self.is_completed
            }
            LabAction::Reset => true,
        }
    }

    /// Every action that would currently be accepted
    pub fn available_actions(&self) -> Vec<LabAction> {
        let mut actions: Vec<LabAction> = self
            .next_reagent()
            .map(|reagent| LabAction::AddReagent(*reagent))
            .into_iter()
            .collect();
        for action in [LabAction::StartReaction, LabAction::FinishExperiment] {
            if self.is_action_available(&action) {
                actions.push(action);
            }
        }
        actions.push(LabAction::Reset);
        actions
    }

    pub fn step_status(&self, index: usize) -> StepStatus {
        if index < self.current_step {
            StepStatus::Done
        } else if index == self.current_step {
            StepStatus::Current
        } else {
            StepStatus::Pending
        }
    }

    /// Process steps paired with their status
    pub fn steps(&self) -> Vec<(&'static StepDescriptor, StepStatus)> {
        catalog::STEPS
            .iter()
            .enumerate()
            .map(|(index, step)| (step, self.step_status(index)))
            .collect()
    }

    pub fn phase(&self) -> LabPhase {
        if self.is_completed {
            return LabPhase::Complete;
        }
        if self.is_reacting {
            return LabPhase::Reacting;
        }
        match self.current_step {
            0 => LabPhase::Empty,
            1 => LabPhase::HasCastor,
            2 => LabPhase::HasCastorAndEthanol,
            REACTION_STEP => LabPhase::ReadyToReact,
            _ => LabPhase::Separating,
        }
    }

    pub fn vessel(&self) -> VesselView<'_> {
        if self.is_completed {
            VesselView::Completed(&catalog::PRODUCTS)
        } else if self.is_reacting {
            VesselView::Reacting(&self.vessel_contents)
        } else if self.current_step >= SEPARATION_STEP {
            VesselView::Separated(&catalog::PRODUCTS)
        } else {
            VesselView::Charging(&self.vessel_contents)
        }
    }

    /// Products obtained, available once the experiment is finished
    pub fn products(&self) -> Option<&'static [Product]> {
        self.is_completed.then_some(&catalog::PRODUCTS[..])
    }
}
