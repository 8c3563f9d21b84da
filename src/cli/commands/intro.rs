use anyhow::Result;
use biodiesel_lab::lab::catalog;

use super::{render, Command};

pub struct IntroCommand;

impl Command for IntroCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", render::intro(&catalog::INTRO));
        println!();
        println!("🚪 Enter the laboratory: biodiesel-lab lab");
        println!("   Or watch a full run: biodiesel-lab run");
        Ok(())
    }
}
