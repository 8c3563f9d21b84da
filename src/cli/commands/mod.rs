use anyhow::Result;

pub mod intro;
pub mod lab;
pub mod render;
pub mod run;
pub mod steps;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
