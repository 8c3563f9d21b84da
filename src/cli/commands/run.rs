use anyhow::Result;
use biodiesel_lab::{
    LabAction, LabSnapshot, LabWorkspace, NotificationHandler, RecordingNotifier,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::render::{self, ConsoleNotifier};
use super::Command;

pub struct RunCommand {
    pub reaction_delay: Duration,
    pub json: bool,
    pub session_id: String,
}

/// Drive the workspace to completion, only ever taking an available action
pub async fn run_experiment<F>(workspace: &LabWorkspace, mut on_action: F) -> LabSnapshot
where
    F: FnMut(&LabAction, &LabSnapshot),
{
    loop {
        let snapshot = workspace.snapshot();
        if snapshot.is_completed {
            return snapshot;
        }
        if snapshot.is_reacting {
            workspace.reaction_settled().await;
            continue;
        }

        let next = snapshot
            .available_actions()
            .into_iter()
            .find(|action| *action != LabAction::Reset);
        let Some(action) = next else {
            return snapshot;
        };

        on_action(&action, &snapshot);
        workspace.apply(&action);
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        if self.json {
            let recorder = Arc::new(RecordingNotifier::new());
            let workspace = LabWorkspace::new(self.reaction_delay, recorder.clone());
            let outcome = run_experiment(&workspace, |_, _| {}).await;

            let log = json!({
                "session_id": self.session_id,
                "reaction_delay_ms": workspace.reaction_delay().as_millis() as u64,
                "notifications": recorder.records(),
                "final_state": outcome,
            });
            println!("{}", serde_json::to_string_pretty(&log)?);
            return Ok(());
        }

        println!("🧪 Running the biodiesel experiment");
        println!();
        let notifier: Arc<dyn NotificationHandler> = Arc::new(ConsoleNotifier);
        let workspace = LabWorkspace::new(self.reaction_delay, notifier);

        let outcome = run_experiment(&workspace, |action, snapshot| {
            println!("{}", render::progress(snapshot));
            println!("👉 {}: {}", snapshot.current_step_descriptor().title, action);
            if *action == LabAction::StartReaction {
                println!(
                    "⏳ Waiting {:.1}s for the reaction...",
                    workspace.reaction_delay().as_secs_f64()
                );
            }
        })
        .await;

        info!(step = outcome.current_step, "Automatic run finished");
        println!();
        print!("{}", render::status(&outcome));
        Ok(())
    }
}
