use clap::{Parser, Subcommand};

pub mod commands;

#[derive(Parser)]
#[command(name = "biodiesel-lab")]
#[command(about = "Virtual chemistry lab: produce biodiesel from castor oil")]
#[command(long_about = "A step-by-step transesterification experiment. Add castor oil, ethanol and \
                       the NaOH catalyst, start the reaction, then collect your biodiesel. Start with \
                       'biodiesel-lab intro', then enter the lab with 'biodiesel-lab lab'.")]
pub struct Cli {
    /// Override the configured reaction time
    #[arg(long, global = true, help = "Reaction time in milliseconds (default: 3000)")]
    pub reaction_delay_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the lab introduction and the chemical equation
    Intro,
    /// List the steps of the experiment
    Steps {
        /// Print the steps as JSON
        #[arg(long, help = "Output the step list as JSON")]
        json: bool,
    },
    /// Run the whole experiment automatically
    Run {
        /// Print the notification log and final state as JSON
        #[arg(long, help = "Output the run log as JSON instead of text")]
        json: bool,
    },
    /// Enter the lab and perform the experiment interactively
    Lab,
}
