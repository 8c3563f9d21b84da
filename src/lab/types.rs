// Core types for the lab simulation

use serde::Serialize;

/// A chemical that can be poured into the reaction vessel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reagent {
    /// Stable identifier used by commands (`add castor`)
    pub id: &'static str,
    pub name: &'static str,
    /// Chemical formula label shown next to the name
    pub formula: &'static str,
    /// Presentation-only color tag
    pub color: &'static str,
    /// Amount called for by the step instructions
    pub quantity: &'static str,
}

/// One required action in the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepDescriptor {
    pub title: &'static str,
    pub description: &'static str,
}

/// A product obtained once the mixture has separated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: &'static str,
    pub amount: &'static str,
}

/// Where a step sits relative to the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

/// Coarse phase of the experiment, derived from the simulation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabPhase {
    Empty,
    HasCastor,
    HasCastorAndEthanol,
    ReadyToReact,
    Reacting,
    Separating,
    Complete,
}

impl std::fmt::Display for LabPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            LabPhase::Empty => "empty vessel",
            LabPhase::HasCastor => "castor oil added",
            LabPhase::HasCastorAndEthanol => "castor oil and ethanol added",
            LabPhase::ReadyToReact => "ready to react",
            LabPhase::Reacting => "reacting",
            LabPhase::Separating => "separating",
            LabPhase::Complete => "complete",
        };
        f.write_str(label)
    }
}

/// Static copy for the lab's intro page
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LabIntro {
    pub title: &'static str,
    pub tagline: &'static str,
    pub process_title: &'static str,
    pub process_summary: &'static str,
    /// The three broad phases shown before entering the lab
    pub phases: [StepDescriptor; 3],
    pub equation: &'static str,
    pub equation_detail: &'static str,
}
