use anyhow::Result;
use biodiesel_lab::lab::catalog;
use biodiesel_lab::{Reagent, StepDescriptor};
use serde::Serialize;

use super::Command;

pub struct StepsCommand {
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StepEntry {
    number: usize,
    #[serde(flatten)]
    step: &'static StepDescriptor,
    reagent: Option<&'static Reagent>,
}

fn entries() -> Vec<StepEntry> {
    catalog::STEPS
        .iter()
        .enumerate()
        .map(|(index, step)| StepEntry {
            number: index + 1,
            step,
            reagent: catalog::reagent_for_step(index),
        })
        .collect()
}

impl Command for StepsCommand {
    async fn execute(&self) -> Result<()> {
        let entries = entries();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        println!("📋 PROCESS STEPS");
        println!("================");
        for entry in &entries {
            println!("{}. {}", entry.number, entry.step.title);
            println!("   {}", entry.step.description);
            if let Some(reagent) = entry.reagent {
                println!("   🧴 {} ({}), {}", reagent.name, reagent.formula, reagent.quantity);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_entries_json() {
        let json = serde_json::to_value(entries()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 5);
        assert_eq!(json[0]["title"], "Add Castor Oil");
        assert_eq!(json[0]["reagent"]["id"], "castor");
        assert!(json[3]["reagent"].is_null());
    }
}
