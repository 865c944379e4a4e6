//! Exhaustive Solver
//!
//! Depth-first backtracking over promotion usage. Every call starts from the full-price cost
//! of what is outstanding, then tries each applicable promotion from its floor to the end of
//! the ascending index, recursing with the *same* floor so that any promotion can be reused
//! until quantities run out. Each successful application consumes at least one unit, so the
//! recursion depth is bounded by the total outstanding quantity.
//!
//! The search is exact but exponential in the worst case, and its recursion is as deep as the
//! number of units bought through promotions. [`SearchBudget`] caps visited nodes for callers
//! that need bounded latency, and recursion depth for callers that need bounded stack use.

use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::{
    catalog::{Catalog, FullPricePurchase},
    promotions::{PromotionIndex, RankedPromotion},
    solvers::{
        Applications, Solver, SolverError, SolverResult,
        observer::{NoopObserver, SolveObserver},
    },
};

/// Which events the exhaustive solver reports to its observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceMode {
    /// No events
    #[default]
    Off,

    /// Every promotion applied anywhere in the search tree, and at the end of every call
    /// each item still outstanding there. This logs explored branches, not only the winner.
    Explored,

    /// Only the promotions on the cheapest path followed by the full-price leftovers,
    /// replayed once the minimum is known.
    BestPath,
}

/// Limits on the exhaustive search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of search nodes (recursive calls) to visit
    pub max_nodes: Option<u64>,

    /// Maximum recursion depth, i.e. promotion applications stacked on one path
    pub max_depth: Option<usize>,
}

impl SearchBudget {
    /// No limit
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_nodes: None,
            max_depth: None,
        }
    }

    /// Limit the search to `limit` nodes
    #[must_use]
    pub const fn with_max_nodes(limit: u64) -> Self {
        Self {
            max_nodes: Some(limit),
            max_depth: None,
        }
    }

    /// Limit the search to `limit` levels of recursion
    #[must_use]
    pub const fn with_max_depth(limit: usize) -> Self {
        Self {
            max_nodes: None,
            max_depth: Some(limit),
        }
    }

    /// Limit both nodes and depth
    #[must_use]
    pub const fn with_both_limits(nodes: u64, depth: usize) -> Self {
        Self {
            max_nodes: Some(nodes),
            max_depth: Some(depth),
        }
    }

    /// Check if this budget has any constraints
    #[must_use]
    pub const fn has_constraints(&self) -> bool {
        self.max_nodes.is_some() || self.max_depth.is_some()
    }
}

/// Solver that searches every repeatable combination of promotions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveSolver {
    budget: SearchBudget,
    trace: TraceMode,
}

/// Best outcome found below a search node.
#[derive(Debug)]
struct Branch {
    cost: Decimal,

    /// Positions into the ascending index, deepest application first.
    plan: Vec<usize>,
}

/// Mutable state threaded through the recursion.
struct Search<'s> {
    catalog: &'s mut Catalog,
    ranked: &'s [RankedPromotion],
    observer: &'s mut dyn SolveObserver,
    explored: bool,
    budget: SearchBudget,
    nodes: u64,
}

impl ExhaustiveSolver {
    /// Create a solver with no budget and no trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search budget.
    #[must_use]
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Set the trace mode.
    #[must_use]
    pub fn with_trace(mut self, trace: TraceMode) -> Self {
        self.trace = trace;
        self
    }

    /// The configured budget
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    /// The configured trace mode
    pub fn trace(&self) -> TraceMode {
        self.trace
    }

    /// Cheapest total for what is outstanding in `catalog`, without buying anything.
    ///
    /// The catalog is left exactly as it was passed in.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::SearchBudgetExceeded`] or [`SolverError::SearchDepthExceeded`]
    /// if the budget runs out.
    pub fn minimum_spend(
        &self,
        catalog: &mut Catalog,
        index: &PromotionIndex,
    ) -> Result<Decimal, SolverError> {
        let mut observer = NoopObserver;
        let mut search = Search {
            catalog,
            ranked: index.ascending(),
            observer: &mut observer,
            explored: false,
            budget: self.budget,
            nodes: 0,
        };

        Ok(search.explore(0, 0)?.cost)
    }
}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve_with_observer(
        &self,
        catalog: &mut Catalog,
        index: &PromotionIndex,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolverResult, SolverError> {
        debug!(
            items = catalog.len(),
            promotions = index.len(),
            units = catalog.outstanding_units(),
            "starting exhaustive search"
        );

        let ranked = index.ascending();

        let mut search = Search {
            catalog,
            ranked,
            observer,
            explored: self.trace == TraceMode::Explored,
            budget: self.budget,
            nodes: 0,
        };

        let best = search.explore(0, 0)?;
        let nodes = search.nodes;

        let Search {
            catalog, observer, ..
        } = search;

        // Replay the winning choices against the restored catalog, then buy the rest.
        let emit = self.trace == TraceMode::BestPath;
        let mut applications = Applications::new();
        let mut spent = Decimal::ZERO;

        for &position in best.plan.iter().rev() {
            let chosen = ranked.get(position).ok_or(SolverError::InvariantViolation {
                message: "search plan refers to a position outside the promotion index",
            })?;

            if !catalog.try_apply(chosen.promotion()) {
                return Err(SolverError::InvariantViolation {
                    message: "promotion on the cheapest path no longer applies on replay",
                });
            }

            if emit {
                observer.on_promotion(chosen);
            }

            spent = spent
                .checked_add(chosen.promotion().bundle_price())
                .ok_or(SolverError::AmountOverflow)?;
            applications.push(chosen.id());
        }

        if emit {
            for item in catalog.remaining() {
                observer.on_full_price(item);
            }
        }

        let full_price = catalog.settle();
        spent = full_price
            .iter()
            .map(FullPricePurchase::cost)
            .try_fold(spent, Decimal::checked_add)
            .ok_or(SolverError::AmountOverflow)?;

        if spent != best.cost {
            return Err(SolverError::InvariantViolation {
                message: "replayed path cost differs from the searched minimum",
            });
        }

        debug!(
            nodes,
            total = %best.cost,
            applications = applications.len(),
            "exhaustive search finished"
        );

        Ok(SolverResult {
            total: best.cost,
            applications,
            full_price,
        })
    }
}

impl Search<'_> {
    /// Cheapest way to buy what is outstanding using promotions from `floor` onwards.
    fn explore(&mut self, floor: usize, depth: usize) -> Result<Branch, SolverError> {
        self.nodes += 1;

        if let Some(limit) = self.budget.max_nodes.filter(|&limit| self.nodes > limit) {
            return Err(SolverError::SearchBudgetExceeded { limit });
        }

        if let Some(limit) = self.budget.max_depth.filter(|&limit| depth > limit) {
            return Err(SolverError::SearchDepthExceeded { limit });
        }

        let mut best = Branch {
            cost: self.catalog.full_price_total(),
            plan: Vec::new(),
        };

        trace!(depth, floor, baseline = %best.cost, "search node");

        let ranked = self.ranked;

        for (position, candidate) in ranked.iter().enumerate().skip(floor) {
            let promotion = candidate.promotion();

            if !self.catalog.try_apply(promotion) {
                continue;
            }

            if self.explored {
                self.observer.on_promotion(candidate);
            }

            let below = self.explore(floor, depth + 1);

            // Undo before looking at the outcome so an aborted search still restores.
            self.catalog.restore(promotion);

            let below = below?;

            // An unrepresentable cost is above the baseline, which always fits.
            if let Some(cost) = promotion
                .bundle_price()
                .checked_add(below.cost)
                .filter(|&cost| cost < best.cost)
            {
                let mut plan = below.plan;
                plan.push(position);

                best = Branch { cost, plan };
            }
        }

        if self.explored {
            for item in self.catalog.remaining() {
                self.observer.on_full_price(item);
            }
        }

        Ok(best)
    }
}
