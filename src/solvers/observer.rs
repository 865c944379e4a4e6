//! Solve Observer

use crate::{items::Item, promotions::RankedPromotion};

/// Observer trait for capturing the trace of a solve.
///
/// Solvers call these hooks in the order events happen; what counts as an event depends on
/// the solver and its trace mode. The report builder records them as text.
pub trait SolveObserver {
    /// Called when a promotion is applied.
    fn on_promotion(&mut self, promotion: &RankedPromotion);

    /// Called for an item bought (or, while exploring, left to be bought) at full price.
    ///
    /// `item` carries the quantity outstanding at the time of the event.
    fn on_full_price(&mut self, item: &Item);
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SolveObserver for NoopObserver {
    fn on_promotion(&mut self, _: &RankedPromotion) {}

    fn on_full_price(&mut self, _: &Item) {}
}
