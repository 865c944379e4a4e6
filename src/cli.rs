//! Command line front end

use std::{io, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use humanize_duration::{Truncate, prelude::DurationExt};
use tracing::info;

use crate::{
    catalog::Catalog,
    parse,
    promotions::PromotionIndex,
    report::{Report, Summary, write_table},
    scenario::Scenario,
    solvers::{ExhaustiveSolver, GreedySolver, SearchBudget, Solver, TraceMode},
};

/// Recursion depth allowed by default; keeps the search well inside the main thread's stack.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Solving strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Backtracking search for the true minimum
    Exhaustive,

    /// Biggest saving first, no backtracking
    Greedy,
}

/// What to list before the total
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Trace {
    /// Only the total
    Off,

    /// Every branch the exhaustive search tried (greedy lists its single path)
    Explored,

    /// The promotions and full-price items that make up the total
    BestPath,
}

impl From<Trace> for TraceMode {
    fn from(trace: Trace) -> Self {
        match trace {
            Trace::Off => TraceMode::Off,
            Trace::Explored => TraceMode::Explored,
            Trace::BestPath => TraceMode::BestPath,
        }
    }
}

/// Find the cheapest way to buy a list of items given bundle promotions.
#[derive(Debug, Parser)]
#[command(name = "cheapest", version)]
#[command(group(ArgGroup::new("input").required(true).args(["prices", "scenario"])))]
pub struct Args {
    /// Price list file: a record count, then `item_id quantity unit_price` per line
    #[arg(long, requires = "promotions")]
    pub prices: Option<PathBuf>,

    /// Promotion file: a record count, then `pairs (item_id quantity)... bundle_price` per line
    #[arg(long, requires = "prices")]
    pub promotions: Option<PathBuf>,

    /// YAML scenario file with items and named promotions
    #[arg(short, long, conflicts_with_all = ["prices", "promotions"])]
    pub scenario: Option<PathBuf>,

    /// Solving strategy
    #[arg(long, value_enum, default_value_t = Strategy::Exhaustive)]
    pub strategy: Strategy,

    /// Trace to print before the total
    #[arg(long, value_enum, default_value_t = Trace::BestPath)]
    pub trace: Trace,

    /// Abort the exhaustive search after visiting this many nodes
    #[arg(long)]
    pub max_nodes: Option<u64>,

    /// Abort the exhaustive search when promotions stack deeper than this on one path
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Run both strategies and print a comparison table
    #[arg(long)]
    pub compare: bool,
}

impl Args {
    /// Read and parse the configured input.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or its contents are malformed.
    pub fn load(&self) -> Result<(Catalog, PromotionIndex)> {
        if let Some(path) = &self.scenario {
            let scenario = Scenario::from_path(path)
                .with_context(|| format!("loading scenario {}", path.display()))?;

            return Ok(scenario.build()?);
        }

        let (Some(prices), Some(promotions)) = (&self.prices, &self.promotions) else {
            anyhow::bail!("either --scenario or both --prices and --promotions are required");
        };

        let prices = std::fs::read_to_string(prices)
            .with_context(|| format!("reading {}", prices.display()))?;
        let promotions = std::fs::read_to_string(promotions)
            .with_context(|| format!("reading {}", promotions.display()))?;

        Ok(parse::parse(&prices, &promotions)?)
    }

    fn exhaustive(&self) -> ExhaustiveSolver {
        let budget = SearchBudget {
            max_nodes: self.max_nodes,
            max_depth: Some(self.max_depth),
        };

        ExhaustiveSolver::new()
            .with_budget(budget)
            .with_trace(self.trace.into())
    }
}

/// Run the command, writing the report (or comparison table) to `out`.
///
/// # Errors
///
/// Returns an error if loading the input, solving, or writing fails.
pub fn run(args: &Args, mut out: impl io::Write) -> Result<()> {
    let (catalog, index) = args.load()?;

    info!(
        items = catalog.len(),
        promotions = index.len(),
        "loaded input"
    );

    if args.compare {
        let exhaustive = args.exhaustive();
        let solvers: [&dyn Solver; 2] = [&exhaustive, &GreedySolver];

        let summaries = solvers
            .into_iter()
            .map(|solver| summarise(solver, catalog.clone(), &index))
            .collect::<Result<Vec<_>>>()?;

        write_table(&mut out, &summaries)?;

        return Ok(());
    }

    let exhaustive = args.exhaustive();
    let solver: &dyn Solver = match args.strategy {
        Strategy::Exhaustive => &exhaustive,
        Strategy::Greedy => &GreedySolver,
    };

    let mut catalog = catalog;
    let mut report = Report::new();
    let start = Instant::now();

    let result = if args.trace == Trace::Off {
        solver.solve(&mut catalog, &index)?
    } else {
        solver.solve_with_observer(&mut catalog, &index, &mut report)?
    };

    info!(
        strategy = solver.name(),
        elapsed = %start.elapsed().human(Truncate::Nano),
        "solved"
    );

    writeln!(out, "{}", report.finish(result.total))?;

    Ok(())
}

fn summarise(solver: &dyn Solver, mut catalog: Catalog, index: &PromotionIndex) -> Result<Summary> {
    let subtotal = catalog.full_price_total();
    let start = Instant::now();

    let result = solver
        .solve(&mut catalog, index)
        .with_context(|| format!("{} solver failed", solver.name()))?;

    info!(
        strategy = solver.name(),
        elapsed = %start.elapsed().human(Truncate::Nano),
        "solved"
    );

    Ok(Summary {
        strategy: solver.name(),
        subtotal,
        total: result.total,
        applications: result.applications.len(),
    })
}
