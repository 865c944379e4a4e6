//! Cheapest prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogError, FullPricePurchase, FullPricePurchases},
    items::{Item, ItemId},
    parse::{ParseError, parse, parse_prices, parse_promotions},
    promotions::{
        Promotion, PromotionError, PromotionId, PromotionIndex, RankedPromotion, Requirement,
    },
    report::{Report, ReportError, Summary, format_amount, write_table},
    scenario::{Scenario, ScenarioError},
    solvers::{
        ExhaustiveSolver, GreedySolver, NoopObserver, SearchBudget, SolveObserver, Solver,
        SolverError, SolverResult, TraceMode,
    },
};
