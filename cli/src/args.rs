use anyhow::Context;
use arithtrace_engine::{Algorithm, BitWidth, EngineError};
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "arithtrace")]
#[command(about = "Step-by-step Booth multiplication and binary division", long_about = None)]
pub struct Cli {
    /// Algorithm to run: booth, restoring or non-restoring
    pub algorithm: Algorithm,
    /// Multiplicand or dividend (decimal, or binary with a 0b prefix)
    #[arg(allow_negative_numbers = true)]
    pub first: String,
    /// Multiplier or divisor (decimal, or binary with a 0b prefix)
    #[arg(allow_negative_numbers = true)]
    pub second: String,
    /// Register width in bits: 4, 8, 16 or 32
    #[arg(short, long, env = "ARITHTRACE_WIDTH", default_value = "8", value_parser = parse_width)]
    pub width: BitWidth,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,
    /// Print per-action step counts after the table
    #[arg(long)]
    pub stats: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Json,
}

fn parse_width(text: &str) -> anyhow::Result<BitWidth> {
    let bits = text
        .trim()
        .parse::<u32>()
        .with_context(|| format!("bit width {text:?} is not a number"))?;
    Ok(BitWidth::try_from(bits).map_err(EngineError::from)?)
}
