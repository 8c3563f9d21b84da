use anyhow::Result;
use biodiesel_lab::{config, create_session_span, generate_session_id, init_telemetry};
use clap::Parser;
use tracing::Instrument;

mod cli;

use cli::commands::{
    intro::IntroCommand, lab::LabShellCommand, run::RunCommand, steps::StepsCommand, Command,
};
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config()?.clone();
    if let Some(delay_ms) = cli.reaction_delay_ms {
        settings.lab.reaction_delay_ms = delay_ms;
    }
    init_telemetry(&settings.observability)?;

    let reaction_delay = settings.lab.reaction_delay();
    let session_id = generate_session_id();

    tokio::runtime::Runtime::new()?.block_on(async {
        match cli.command {
            Some(Commands::Intro) | None => IntroCommand.execute().await,
            Some(Commands::Steps { json }) => StepsCommand { json }.execute().await,
            Some(Commands::Run { json }) => {
                let span = create_session_span(&session_id, "run");
                RunCommand {
                    reaction_delay,
                    json,
                    session_id: session_id.clone(),
                }
                .execute()
                .instrument(span)
                .await
            }
            Some(Commands::Lab) => {
                let span = create_session_span(&session_id, "interactive");
                LabShellCommand { reaction_delay }
                    .execute()
                    .instrument(span)
                    .await
            }
        }
    })
}
