//! Text and JSON output of an outcome.

use std::fmt::{self, Write};

use arithtrace_engine::{
    Algorithm, DivisionOutcome, MultiplicationOutcome, OperationStats, Outcome, Registers, Step,
    Trace,
};

const ACTION_COLUMN: usize = 28;

/// Writes the operands, the step table and the result.
pub fn render_table(
    out: &mut impl Write,
    algorithm: Algorithm,
    outcome: &Outcome,
    show_stats: bool,
) -> fmt::Result {
    match outcome {
        Outcome::Multiplication(outcome) => multiplication(out, outcome)?,
        Outcome::Division(outcome) => division(out, algorithm, outcome)?,
    }
    if show_stats {
        stats(out, outcome.stats())?;
    }
    Ok(())
}

pub fn render_json(outcome: &Outcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

fn multiplication(out: &mut impl Write, outcome: &MultiplicationOutcome) -> fmt::Result {
    let width = outcome.multiplicand.width();
    writeln!(out, "Booth multiplication ({width}-bit)")?;
    writeln!(out, "multiplicand M = {} ({})", outcome.multiplicand, outcome.multiplicand.decode())?;
    writeln!(out, "multiplier   Q = {} ({})", outcome.multiplier, outcome.multiplier.decode())?;
    writeln!(out)?;
    table(out, &outcome.steps, None, width, true)?;
    writeln!(out)?;
    writeln!(out, "product = {} ({})", outcome.product, outcome.product_decimal)
}

fn division(out: &mut impl Write, algorithm: Algorithm, outcome: &DivisionOutcome) -> fmt::Result {
    let width = outcome.divisor.width();
    let name = match algorithm {
        Algorithm::NonRestoring => "Non-restoring division",
        _ => "Restoring division",
    };
    writeln!(out, "{name} ({width}-bit)")?;
    writeln!(out, "dividend Q = {} ({})", outcome.dividend, outcome.dividend.decode_unsigned())?;
    writeln!(out, "divisor  M = {} ({})", outcome.divisor, outcome.divisor.decode_unsigned())?;
    writeln!(out)?;
    table(out, &outcome.steps, outcome.correction.as_ref(), width, false)?;
    writeln!(out)?;
    writeln!(out, "quotient  = {} ({})", outcome.quotient, outcome.quotient_decimal)?;
    writeln!(out, "remainder = {} ({})", outcome.remainder, outcome.remainder_decimal)
}

fn table(
    out: &mut impl Write,
    steps: &Trace,
    correction: Option<&Step>,
    width: u32,
    booth: bool,
) -> fmt::Result {
    let cell = width as usize;
    let mut header = format!(
        "{:>3} | {:>2} | {:<ACTION_COLUMN$} | {:<cell$} | {:<cell$}",
        "#", "it", "action", "A", "Q"
    );
    if booth {
        header.push_str(" | Q-1");
    }
    write!(header, " | {:<cell$} | explanation", "M")?;
    writeln!(out, "{header}")?;
    writeln!(out, "{}", "-".repeat(header.len()))?;

    for step in steps.iter().chain(correction) {
        row(out, step, cell)?;
    }
    Ok(())
}

fn row(out: &mut impl Write, step: &Step, cell: usize) -> fmt::Result {
    let Registers { a, q, q_minus_1, m } = step.registers();
    write!(
        out,
        "{:>3} | {:>2} | {:<ACTION_COLUMN$} | {:<cell$} | {:<cell$}",
        step.ordinal(),
        step.iteration(),
        step.label(),
        a.to_string(),
        q.to_string(),
    )?;
    if let Some(bit) = q_minus_1 {
        write!(out, " | {:<3}", bit.to_string())?;
    }
    writeln!(out, " | {:<cell$} | {}", m.to_string(), step.explanation())
}

fn stats(out: &mut impl Write, stats: &OperationStats) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "steps by action:")?;
    for (action, count) in stats.iter() {
        writeln!(out, "  {:<ACTION_COLUMN$} {count:>3}", action.label())?;
    }
    writeln!(
        out,
        "  {:<ACTION_COLUMN$} {:>3}",
        "additions and subtractions",
        stats.arithmetic_operations()
    )
}
