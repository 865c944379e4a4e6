//! Solvers for Promotions

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, FullPricePurchases},
    promotions::{PromotionId, PromotionIndex},
};

pub mod exhaustive;
pub mod greedy;
pub mod observer;

pub use exhaustive::{ExhaustiveSolver, SearchBudget, TraceMode};
pub use greedy::GreedySolver;
pub use observer::{NoopObserver, SolveObserver};

/// Solver Errors
#[derive(Debug, Error, PartialEq)]
pub enum SolverError {
    /// The exhaustive search visited more nodes than its budget allows.
    #[error("search budget of {limit} nodes exceeded")]
    SearchBudgetExceeded {
        /// Configured node limit
        limit: u64,
    },

    /// The exhaustive search recursed deeper than its budget allows.
    #[error("search depth limit of {limit} exceeded")]
    SearchDepthExceeded {
        /// Configured depth limit
        limit: usize,
    },

    /// The running total of a solve cannot be represented.
    #[error("total spend overflows")]
    AmountOverflow,

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Promotion applications on the chosen path, in application order.
pub type Applications = SmallVec<[PromotionId; 10]>;

/// Outcome of a solve
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    /// Total spend
    pub total: Decimal,

    /// Promotions applied on the chosen path, once per application
    pub applications: Applications,

    /// Units bought at full price once no further promotion was used
    pub full_price: FullPricePurchases,
}

impl SolverResult {
    /// How many times the given promotion was applied.
    pub fn application_count(&self, id: PromotionId) -> usize {
        self.applications
            .iter()
            .filter(|&&applied| applied == id)
            .count()
    }
}

/// Trait for solving the cheapest way to buy a catalog
pub trait Solver {
    /// Short name used in reports
    fn name(&self) -> &'static str;

    /// Solve the catalog, notifying `observer` of trace events.
    ///
    /// On success every quantity in `catalog` has been consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve_with_observer(
        &self,
        catalog: &mut Catalog,
        index: &PromotionIndex,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolverResult, SolverError>;

    /// Solve the catalog without recording a trace.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the solver encounters an error.
    fn solve(
        &self,
        catalog: &mut Catalog,
        index: &PromotionIndex,
    ) -> Result<SolverResult, SolverError> {
        self.solve_with_observer(catalog, index, &mut NoopObserver)
    }
}
