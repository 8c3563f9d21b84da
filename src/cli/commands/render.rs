// Text rendering of the lab for the terminal

use biodiesel_lab::lab::catalog::{self, TOTAL_STEPS};
use biodiesel_lab::{
    LabIntro, LabNotification, LabSnapshot, NotificationHandler, StepStatus, VesselView,
};
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Prints notifications as they arrive
pub struct ConsoleNotifier;

impl NotificationHandler for ConsoleNotifier {
    fn handle_notification(&self, notification: &LabNotification) {
        println!("🔔 {}: {}", notification.title(), notification.description());
    }
}

pub fn intro(intro: &LabIntro) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🧪 {}", intro.title.to_uppercase());
    let _ = writeln!(out, "{}", "=".repeat(intro.title.chars().count() + 3));
    let _ = writeln!(out, "{}", intro.tagline);
    let _ = writeln!(out);
    let _ = writeln!(out, "📖 {}", intro.process_title);
    let _ = writeln!(out, "   {}", intro.process_summary);
    let _ = writeln!(out);
    for phase in &intro.phases {
        let _ = writeln!(out, "   • {}", phase.title);
        let _ = writeln!(out, "     {}", phase.description);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "⚗️  Chemical Equation");
    let _ = writeln!(out, "   {}", intro.equation);
    let _ = writeln!(out, "   {}", intro.equation_detail);
    out
}

pub fn progress(snapshot: &LabSnapshot) -> String {
    let filled = (snapshot.progress_fraction() * BAR_WIDTH as f64).round() as usize;
    format!(
        "Progress: {}/{} steps [{}{}] {}%",
        snapshot.current_step,
        TOTAL_STEPS,
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        snapshot.progress_percent()
    )
}

pub fn steps(snapshot: &LabSnapshot) -> String {
    let mut out = String::new();
    for (index, (step, status)) in snapshot.steps().into_iter().enumerate() {
        let marker = match status {
            StepStatus::Done => "✅",
            StepStatus::Current => "👉",
            StepStatus::Pending => "⬜",
        };
        let _ = writeln!(out, "{marker} {}. {}: {}", index + 1, step.title, step.description);
    }
    out
}

pub fn vessel(snapshot: &LabSnapshot) -> String {
    let mut out = String::new();
    match snapshot.vessel() {
        VesselView::Charging([]) => {
            let _ = writeln!(out, "🫙 Reaction vessel is empty");
        }
        VesselView::Charging(layers) => {
            let _ = writeln!(out, "🫙 Reaction vessel (top to bottom):");
            for reagent in layers.iter().rev() {
                let _ = writeln!(
                    out,
                    "   ▒ {} ({}, {}) [{}]",
                    reagent.name, reagent.formula, reagent.quantity, reagent.color
                );
            }
        }
        VesselView::Reacting(layers) => {
            let names: Vec<_> = layers.iter().map(|r| r.name).collect();
            let _ = writeln!(out, "🫧 Reacting: {} (bubbling...)", names.join(" + "));
        }
        VesselView::Separated(products) | VesselView::Completed(products) => {
            let _ = writeln!(out, "🫙 Mixture separated into layers (top to bottom):");
            for product in products {
                let _ = writeln!(out, "   ▒ {}", product.name);
            }
        }
    }
    out
}

pub fn report(snapshot: &LabSnapshot) -> Option<String> {
    let products = snapshot.products()?;
    let mut out = String::new();
    let _ = writeln!(out, "🎉 Experiment Complete!");
    let _ = writeln!(
        out,
        "You have successfully produced biodiesel through the transesterification of castor oil \
         with ethanol using NaOH as a catalyst."
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Products Obtained:");
    for product in products {
        let _ = writeln!(out, "   {:<24}{:>8}", product.name, product.amount);
    }
    Some(out)
}

pub fn status(snapshot: &LabSnapshot) -> String {
    if let Some(report) = report(snapshot) {
        return report;
    }

    let mut out = String::new();
    let _ = writeln!(out, "📊 {}", progress(snapshot));
    let _ = writeln!(out, "🔬 State: {}", snapshot.phase());
    let current = snapshot.current_step_descriptor();
    let _ = writeln!(out, "📋 Current step: {}", current.description);
    let _ = writeln!(out);
    out.push_str(&vessel(snapshot));
    let _ = writeln!(out);
    out.push_str(&steps(snapshot));
    let _ = writeln!(out);
    let actions: Vec<String> = snapshot
        .available_actions()
        .iter()
        .map(ToString::to_string)
        .collect();
    let _ = writeln!(out, "Available: {}", actions.join(", "));
    out
}

pub fn help() -> String {
    let reagents: Vec<_> = catalog::REAGENTS.iter().map(|r| r.id).collect();
    format!(
        "Commands:\n  add <reagent>  pour a reagent ({})\n  react          start the reaction\n  \
         finish         complete the experiment\n  reset          start over\n  status         show the bench\n  \
         help           show this help\n  quit           leave the lab\n",
        reagents.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use biodiesel_lab::lab::catalog::REAGENTS;

    fn at_step(step: usize) -> LabSnapshot {
        LabSnapshot {
            current_step: step,
            vessel_contents: REAGENTS.iter().take(step).copied().collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(
            progress(&at_step(0)),
            format!("Progress: 0/5 steps [{}] 0%", "░".repeat(BAR_WIDTH))
        );
        let half = progress(&at_step(4));
        assert!(half.starts_with("Progress: 4/5 steps"));
        assert!(half.ends_with("80%"));
    }

    #[test]
    fn test_steps_marks_current() {
        let text = steps(&at_step(1));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("✅"));
        assert!(lines[1].starts_with("👉 2. Add Ethanol"));
        assert!(lines[4].starts_with("⬜"));
    }

    #[test]
    fn test_vessel_lists_top_layer_first() {
        let text = vessel(&at_step(2));
        let ethanol = text.find("Ethanol").unwrap();
        let castor = text.find("Castor Oil").unwrap();
        assert!(ethanol < castor);
        assert!(vessel(&at_step(0)).contains("empty"));
    }

    #[test]
    fn test_status_shows_report_when_completed() {
        let done = LabSnapshot {
            is_completed: true,
            ..at_step(4)
        };
        let text = status(&done);
        assert!(text.contains("Experiment Complete!"));
        assert!(text.contains("~90ml"));
        assert!(report(&at_step(4)).is_none());
    }

    #[test]
    fn test_status_lists_available_actions() {
        let text = status(&at_step(3));
        assert!(text.contains("Available: react, reset"));
        assert!(text.contains("Stir the mixture"));
    }
}
