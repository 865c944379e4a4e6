//! Report
//!
//! Text trace of a solve, one line per observed event followed by the total, and a table
//! summarising one or more solver runs side by side.

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{items::Item, promotions::RankedPromotion, solvers::SolveObserver};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Formats an amount with two fractional digits, rounding midpoints away from zero.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);

    rounded.to_string()
}

/// Line-per-event trace of a solve.
#[derive(Debug, Default, Clone)]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Append the formatted total and render the report.
    ///
    /// Lines are separated by `\n`; the total is the last line and has no trailing newline.
    pub fn finish(mut self, total: Decimal) -> String {
        self.lines.push(format_amount(total));
        self.lines.join("\n")
    }
}

impl SolveObserver for Report {
    fn on_promotion(&mut self, ranked: &RankedPromotion) {
        self.lines.push(format!(
            "{}: {} for {} (saves {})",
            ranked.name(),
            ranked.promotion(),
            format_amount(ranked.promotion().bundle_price()),
            format_amount(ranked.saving()),
        ));
    }

    fn on_full_price(&mut self, item: &Item) {
        self.lines.push(format!(
            "{}: {} x {} = {}",
            item.id(),
            item.remaining(),
            format_amount(item.unit_price()),
            format_amount(item.worth()),
        ));
    }
}

/// Headline figures of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Solver name
    pub strategy: &'static str,

    /// Cost of buying everything at full price
    pub subtotal: Decimal,

    /// Cost found by the solver
    pub total: Decimal,

    /// Number of promotion applications on the chosen path
    pub applications: usize,
}

impl Summary {
    /// Amount saved against the full-price subtotal
    pub fn savings(&self) -> Decimal {
        self.subtotal - self.total
    }

    /// Savings as a fraction of the subtotal; zero when the subtotal is zero.
    pub fn savings_percent(&self) -> Percentage {
        if self.subtotal.is_zero() {
            return Percentage::from(Decimal::ZERO);
        }

        Percentage::from(self.savings() / self.subtotal)
    }
}

/// Writes a table comparing solver runs.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if writing to `out` fails.
pub fn write_table(mut out: impl io::Write, summaries: &[Summary]) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Strategy", "Subtotal", "Total", "Savings", "Promotions"]);

    for summary in summaries {
        builder.push_record([
            summary.strategy.to_string(),
            format_amount(summary.subtotal),
            format_amount(summary.total),
            format!(
                "({}%) {}",
                format_amount(percent_points(summary.savings_percent())),
                format_amount(summary.savings())
            ),
            summary.applications.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..5), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Converts a fractional percentage to percent points for display.
fn percent_points(percentage: Percentage) -> Decimal {
    (percentage * Decimal::ONE) * Decimal::ONE_HUNDRED
}
