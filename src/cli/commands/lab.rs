use anyhow::Result;
use biodiesel_lab::{ActionParseError, LabAction, LabWorkspace, NotificationHandler};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use super::render::{self, ConsoleNotifier};
use super::Command;

/// One line typed at the lab prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Action(LabAction),
    Status,
    Help,
    Quit,
}

pub fn parse_shell_line(line: &str) -> Result<ShellCommand, ActionParseError> {
    match line.trim().to_ascii_lowercase().as_str() {
        "status" | "s" => Ok(ShellCommand::Status),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        _ => line.parse().map(ShellCommand::Action),
    }
}

pub struct LabShellCommand {
    pub reaction_delay: Duration,
}

impl LabShellCommand {
    /// Apply one action, telling the user when it is not available yet
    fn attempt(workspace: &LabWorkspace, action: &LabAction) {
        if !workspace.is_action_available(action) {
            let snapshot = workspace.snapshot();
            debug!(%action, step = snapshot.current_step, "Unavailable action requested");
            println!("🚫 '{action}' is not available right now.");
            println!("   📋 {}", snapshot.current_step_descriptor().description);
            return;
        }

        workspace.apply(action);
        if *action == LabAction::Reset {
            println!("🔄 Bench cleared. Starting a new experiment.");
        }
        if *action != LabAction::StartReaction {
            println!("{}", render::progress(&workspace.snapshot()));
        }
    }
}

impl Command for LabShellCommand {
    async fn execute(&self) -> Result<()> {
        let notifier: Arc<dyn NotificationHandler> = Arc::new(ConsoleNotifier);
        let workspace = LabWorkspace::new(self.reaction_delay, notifier);

        println!("🧪 BIODIESEL PRODUCTION LAB");
        println!("===========================");
        println!("Follow the steps to complete the transesterification process.");
        println!();
        print!("{}", render::status(&workspace.snapshot()));
        println!();
        print!("{}", render::help());

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            print!("🧪 > ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_shell_line(&line) {
                Ok(ShellCommand::Action(action)) => Self::attempt(&workspace, &action),
                Ok(ShellCommand::Status) => print!("{}", render::status(&workspace.snapshot())),
                Ok(ShellCommand::Help) => print!("{}", render::help()),
                Ok(ShellCommand::Quit) => break,
                Err(e) => {
                    println!("❓ {e}");
                    println!("   Type 'help' for the list of commands.");
                }
            }
        }

        info!(
            step = workspace.snapshot().current_step,
            "Leaving the lab"
        );
        println!("👋 Leaving the lab.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biodiesel_lab::lab::catalog::REAGENTS;
    use biodiesel_lab::RecordingNotifier;

    #[test]
    fn test_parse_shell_line() {
        assert_eq!(parse_shell_line("status"), Ok(ShellCommand::Status));
        assert_eq!(parse_shell_line(" Q "), Ok(ShellCommand::Quit));
        assert_eq!(parse_shell_line("?"), Ok(ShellCommand::Help));
        assert_eq!(
            parse_shell_line("add naoh"),
            Ok(ShellCommand::Action(LabAction::AddReagent(REAGENTS[2])))
        );
        assert_eq!(
            parse_shell_line("dance"),
            Err(ActionParseError::UnknownAction("dance".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_skips_unavailable_actions() {
        let recorder = Arc::new(RecordingNotifier::new());
        let workspace = LabWorkspace::new(Duration::from_millis(3000), recorder.clone());

        LabShellCommand::attempt(&workspace, &LabAction::AddReagent(REAGENTS[1]));
        assert_eq!(workspace.snapshot().current_step, 0);

        LabShellCommand::attempt(&workspace, &LabAction::AddReagent(REAGENTS[0]));
        assert_eq!(workspace.snapshot().current_step, 1);
        assert_eq!(recorder.notifications().len(), 1);
    }
}
