use std::str::FromStr;
use thiserror::Error;

use super::catalog;
use super::types::Reagent;

/// Something a user can attempt at the lab bench
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabAction {
    AddReagent(Reagent),
    StartReaction,
    FinishExperiment,
    Reset,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionParseError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown reagent '{0}' (expected one of: castor, ethanol, naoh)")]
    UnknownReagent(String),
    #[error("Missing reagent: usage is 'add <reagent>'")]
    MissingReagent,
    #[error("Unknown action '{0}'")]
    UnknownAction(String),
}

impl FromStr for LabAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().ok_or(ActionParseError::Empty)?;

        match verb.to_ascii_lowercase().as_str() {
            "add" | "pour" => {
                let id = words.next().ok_or(ActionParseError::MissingReagent)?;
                catalog::find_reagent(id)
                    .map(|reagent| LabAction::AddReagent(*reagent))
                    .ok_or_else(|| ActionParseError::UnknownReagent(id.to_string()))
            }
            "react" | "start" | "mix" => Ok(LabAction::StartReaction),
            "finish" | "complete" => Ok(LabAction::FinishExperiment),
            "reset" | "restart" => Ok(LabAction::Reset),
            other => Err(ActionParseError::UnknownAction(other.to_string())),
        }
    }
}

impl std::fmt::Display for LabAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LabAction::AddReagent(reagent) => write!(f, "add {}", reagent.id),
            LabAction::StartReaction => f.write_str("react"),
            LabAction::FinishExperiment => f.write_str("finish"),
            LabAction::Reset => f.write_str("reset"),
        }
    }
}
