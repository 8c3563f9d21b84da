use statig::prelude::*;
use std::sync::Arc;

use super::catalog::{self, SEPARATION_STEP};
use super::notifications::{LabNotification, NotificationHandler};
use super::types::Reagent;
use super::view::LabSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabEvent {
    AddReagent(Reagent),
    StartReaction,
    /// Fired by the workspace once the reaction delay has elapsed
    ReactionElapsed,
    FinishExperiment,
}

/// Simulation state shared by every state of the lab machine.
///
/// Only the state handlers below mutate it, and a reset replaces the whole
/// machine rather than rewinding these fields.
pub struct LabBench {
    current_step: usize,
    vessel_contents: Vec<Reagent>,
    is_reacting: bool,
    is_completed: bool,
    notifier: Arc<dyn NotificationHandler>,
}

impl LabBench {
    pub fn new(notifier: Arc<dyn NotificationHandler>) -> Self {
        Self {
            current_step: 0,
            vessel_contents: Vec::new(),
            is_reacting: false,
            is_completed: false,
            notifier,
        }
    }
}

#[state_machine(initial = "State::empty()", state(derive(Debug)))]
impl LabBench {
    #[state]
    fn empty(&mut self, event: &LabEvent) -> Outcome<State> {
        self.pour(event, State::has_castor())
    }

    #[state]
    fn has_castor(&mut self, event: &LabEvent) -> Outcome<State> {
        self.pour(event, State::has_castor_and_ethanol())
    }

    #[state]
    fn has_castor_and_ethanol(&mut self, event: &LabEvent) -> Outcome<State> {
        self.pour(event, State::ready_to_react())
    }

    #[state]
    fn ready_to_react(&mut self, event: &LabEvent) -> Outcome<State> {
        match event {
            LabEvent::StartReaction => {
                self.is_reacting = true;
                tracing::info!(step = self.current_step, "Reaction started");
                self.notify(LabNotification::ReactionStarted);
                Transition(State::reacting())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn reacting(&mut self, event: &LabEvent) -> Outcome<State> {
        match event {
            LabEvent::ReactionElapsed => {
                self.is_reacting = false;
                self.current_step = SEPARATION_STEP;
                tracing::info!(step = self.current_step, "Reaction complete, mixture separating");
                self.notify(LabNotification::ReactionComplete);
                Transition(State::separating())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn separating(&mut self, event: &LabEvent) -> Outcome<State> {
        match event {
            LabEvent::FinishExperiment => {
                self.is_completed = true;
                tracing::info!(step = self.current_step, "Experiment completed");
                self.notify(LabNotification::ExperimentComplete);
                Transition(State::complete())
            }
            _ => self.ignore(event),
        }
    }

    #[state]
    fn complete(&mut self, event: &LabEvent) -> Outcome<State> {
        self.ignore(event)
    }
}

impl LabBench {
    /// Accept the reagent designated for the current step and move to `next`
    fn pour(&mut self, event: &LabEvent, next: State) -> Outcome<State> {
        let LabEvent::AddReagent(reagent) = event else {
            return self.ignore(event);
        };
        let expected = catalog::reagent_for_step(self.current_step);
        if expected.map(|r| r.id) != Some(reagent.id) {
            return self.ignore(event);
        }

        self.vessel_contents.push(*reagent);
        self.current_step += 1;
        tracing::info!(
            reagent = reagent.id,
            step = self.current_step,
            "Reagent added to vessel"
        );
        self.notify(LabNotification::ReagentAdded {
            name: reagent.name,
            formula: reagent.formula,
        });
        Transition(next)
    }

    /// Out-of-order actions are dropped without changing state
    fn ignore(&self, event: &LabEvent) -> Outcome<State> {
        tracing::debug!(
            step = self.current_step,
            reacting = self.is_reacting,
            completed = self.is_completed,
            event = ?event,
            "Action not available in current state, ignoring"
        );
        Handled
    }

    fn notify(&self, notification: LabNotification) {
        self.notifier.handle_notification(&notification);
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn vessel_contents(&self) -> &[Reagent] {
        &self.vessel_contents
    }

    pub fn is_reacting(&self) -> bool {
        self.is_reacting
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn snapshot(&self) -> LabSnapshot {
        LabSnapshot {
            current_step: self.current_step,
            vessel_contents: self.vessel_contents.clone(),
            is_reacting: self.is_reacting,
            is_completed: self.is_completed,
        }
    }
}
