//! Static reference data for the biodiesel experiment.
//!
//! The order of [`REAGENTS`] is the order in which they must be added, and
//! [`STEPS`] defines the total number of steps in the process.

use super::types::{LabIntro, Product, Reagent, StepDescriptor};

/// Total number of steps in the process
pub const TOTAL_STEPS: usize = 5;

/// Number of leading steps that add a reagent
pub const REAGENT_STEPS: usize = 3;

/// Step index at which the reaction may be started
pub const REACTION_STEP: usize = 3;

/// Step index reached once the reaction has run its course
pub const SEPARATION_STEP: usize = 4;

pub static REAGENTS: [Reagent; REAGENT_STEPS] = [
    Reagent {
        id: "castor",
        name: "Castor Oil",
        formula: "Triglyceride",
        color: "amber",
        quantity: "100ml",
    },
    Reagent {
        id: "ethanol",
        name: "Ethanol",
        formula: "C₂H₅OH",
        color: "blue",
        quantity: "30ml",
    },
    Reagent {
        id: "naoh",
        name: "Sodium Hydroxide",
        formula: "NaOH",
        color: "gray",
        quantity: "1g",
    },
];

pub static STEPS: [StepDescriptor; TOTAL_STEPS] = [
    StepDescriptor {
        title: "Add Castor Oil",
        description: "Pour 100ml of castor oil into the reaction vessel",
    },
    StepDescriptor {
        title: "Add Ethanol",
        description: "Add 30ml of ethanol to the mixture",
    },
    StepDescriptor {
        title: "Add NaOH Catalyst",
        description: "Carefully add 1g of sodium hydroxide",
    },
    StepDescriptor {
        title: "Mix & React",
        description: "Stir the mixture and observe the reaction",
    },
    StepDescriptor {
        title: "Separate Products",
        description: "Wait for biodiesel and glycerol to separate",
    },
];

/// Upper layer first
pub static PRODUCTS: [Product; 2] = [
    Product {
        name: "Biodiesel (FAEE)",
        amount: "~90ml",
    },
    Product {
        name: "Glycerol (byproduct)",
        amount: "~10ml",
    },
];

pub const INTRO: LabIntro = LabIntro {
    title: "Virtual Biodiesel Lab",
    tagline: "Experience realistic chemistry as you produce biodiesel from castor oil",
    process_title: "Transesterification Process",
    process_summary: "Learn the chemical reaction that converts vegetable oils into biodiesel fuel \
                      using an alcohol and a sodium hydroxide catalyst",
    phases: [
        StepDescriptor {
            title: "Step 1: Prepare Reactants",
            description: "Measure and add castor oil, ethanol, and NaOH catalyst to the reaction vessel",
        },
        StepDescriptor {
            title: "Step 2: Mix & React",
            description: "Stir the mixture at controlled temperature to initiate the transesterification reaction",
        },
        StepDescriptor {
            title: "Step 3: Separate Products",
            description: "Allow the mixture to settle and separate biodiesel from glycerol byproduct",
        },
    ],
    equation: "Triglyceride + 3 Methanol → 3 Biodiesel + Glycerol",
    equation_detail: "(Castor Oil) + CH₃OH + NaOH → Fatty Acid Methyl Esters + C₃H₈O₃",
};

/// The reagent that must be added at `step`, if that step adds one
pub fn reagent_for_step(step: usize) -> Option<&'static Reagent> {
    REAGENTS.get(step)
}

/// Look up a reagent by id, ignoring case
pub fn find_reagent(id: &str) -> Option<&'static Reagent> {
    REAGENTS.iter().find(|r| r.id.eq_ignore_ascii_case(id.trim()))
}

/// Descriptor to show as the current instruction; clamps past the last step
pub fn step_descriptor(step: usize) -> &'static StepDescriptor {
    &STEPS[step.min(TOTAL_STEPS - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reagents_follow_step_order() {
        let ids: Vec<_> = (0..REAGENT_STEPS)
            .filter_map(reagent_for_step)
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["castor", "ethanol", "naoh"]);
        assert!(reagent_for_step(REACTION_STEP).is_none());
    }

    #[test]
    fn test_find_reagent_is_case_insensitive() {
        assert_eq!(find_reagent("NaOH").map(|r| r.name), Some("Sodium Hydroxide"));
        assert_eq!(find_reagent(" castor ").map(|r| r.formula), Some("Triglyceride"));
        assert!(find_reagent("methanol").is_none());
    }

    #[test]
    fn test_step_descriptor_clamps_to_last_step() {
        assert_eq!(step_descriptor(0).title, "Add Castor Oil");
        assert_eq!(step_descriptor(4).title, "Separate Products");
        assert_eq!(step_descriptor(5).title, "Separate Products");
        assert_eq!(step_descriptor(usize::MAX).title, "Separate Products");
    }
}
