use anyhow::{Context, Result};
use arithtrace_engine::run;
use clap::Parser;
use tracing::info;

mod args;
mod logger;
mod render;

use args::{Cli, Format};

fn main() -> Result<()> {
    logger::init_logger();
    let cli = Cli::parse();

    let outcome = run(cli.algorithm, &cli.first, &cli.second, cli.width).with_context(|| {
        format!(
            "{} of {} and {} failed",
            cli.algorithm, cli.first, cli.second
        )
    })?;
    info!(steps = outcome.steps().len(), "run finished");

    match cli.format {
        Format::Table => {
            let mut text = String::new();
            render::render_table(&mut text, cli.algorithm, &outcome, cli.stats)?;
            print!("{text}");
        }
        Format::Json => {
            let text = render::render_json(&outcome).context("failed to serialize the outcome")?;
            println!("{text}");
        }
    }
    Ok(())
}
