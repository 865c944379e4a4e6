//! Greedy Solver

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    catalog::{Catalog, FullPricePurchase},
    promotions::PromotionIndex,
    solvers::{Applications, Solver, SolverError, SolverResult, observer::SolveObserver},
};

/// Solver that applies the biggest saving first, as often as it fits, without backtracking.
///
/// Runs in a single pass over the descending index. The result is an upper bound on the true
/// minimum: taking the largest saving first can fragment quantities so that a better-fitting,
/// smaller saving is never reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedySolver;

impl Solver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve_with_observer(
        &self,
        catalog: &mut Catalog,
        index: &PromotionIndex,
        observer: &mut dyn SolveObserver,
    ) -> Result<SolverResult, SolverError> {
        let mut spent = Decimal::ZERO;
        let mut applications = Applications::new();

        for ranked in index.descending() {
            let promotion = ranked.promotion();

            while catalog.try_apply(promotion) {
                observer.on_promotion(ranked);

                spent = spent
                    .checked_add(promotion.bundle_price())
                    .ok_or(SolverError::AmountOverflow)?;
                applications.push(ranked.id());
            }
        }

        for item in catalog.remaining() {
            observer.on_full_price(item);
        }

        let full_price = catalog.settle();
        spent = full_price
            .iter()
            .map(FullPricePurchase::cost)
            .try_fold(spent, Decimal::checked_add)
            .ok_or(SolverError::AmountOverflow)?;

        debug!(
            total = %spent,
            applications = applications.len(),
            "greedy pass finished"
        );

        Ok(SolverResult {
            total: spent,
            applications,
            full_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::{
        items::{Item, ItemId},
        promotions::{Promotion, PromotionId},
        report::Report,
        solvers::ExhaustiveSolver,
    };

    use super::*;

    #[test]
    fn empty_index_pays_full_price() -> TestResult {
        let mut catalog = Catalog::with_items([Item::new(ItemId(1), 2, dec!(5.0))])?;
        let mut report = Report::new();

        let result = GreedySolver.solve_with_observer(
            &mut catalog,
            &PromotionIndex::default(),
            &mut report,
        )?;

        assert_eq!(result.total, dec!(10));
        assert_eq!(report.finish(result.total), "#1: 2 x 5.00 = 10.00\n10.00");
        assert!(catalog.is_settled());

        Ok(())
    }

    #[test]
    fn applies_largest_saving_repeatedly() -> TestResult {
        let mut catalog = Catalog::with_items([Item::new(ItemId(1), 5, dec!(4))])?;
        let index = PromotionIndex::new(
            &catalog,
            [
                Promotion::new([(ItemId(1), 1)], dec!(3.5))?, // saves 0.5
                Promotion::new([(ItemId(1), 2)], dec!(6))?,   // saves 2
            ],
        )?;

        let result = GreedySolver.solve(&mut catalog, &index)?;

        // 2 x (2 for 6) + 1 x (1 for 3.5)
        assert_eq!(result.total, dec!(15.5));
        assert_eq!(
            result.applications.as_slice(),
            &[PromotionId(1), PromotionId(1), PromotionId(0)]
        );
        assert!(result.full_price.is_empty());

        Ok(())
    }

    #[test]
    fn can_be_beaten_by_exhaustive_search() -> TestResult {
        // Greedy takes the 3-unit bundle and strands one unit at full price; two 2-unit
        // bundles are cheaper.
        let build = || -> TestResult<(Catalog, PromotionIndex)> {
            let catalog = Catalog::with_items([Item::new(ItemId(1), 4, dec!(10))])?;
            let index = PromotionIndex::new(
                &catalog,
                [
                    Promotion::new([(ItemId(1), 3)], dec!(21))?, // saves 9
                    Promotion::new([(ItemId(1), 2)], dec!(14))?, // saves 6
                ],
            )?;

            Ok((catalog, index))
        };

        let (mut catalog, index) = build()?;
        let greedy = GreedySolver.solve(&mut catalog, &index)?;

        let (mut catalog, index) = build()?;
        let exhaustive = ExhaustiveSolver::new().solve(&mut catalog, &index)?;

        assert_eq!(greedy.total, dec!(31));
        assert_eq!(exhaustive.total, dec!(28));

        Ok(())
    }

    #[test]
    fn overflowing_total_is_an_error() -> TestResult {
        let mut catalog = Catalog::with_items([Item::new(ItemId(1), 2, dec!(1))])?;
        let index =
            PromotionIndex::new(&catalog, [Promotion::new([(ItemId(1), 1)], Decimal::MAX)?])?;

        assert_eq!(
            GreedySolver.solve(&mut catalog, &index),
            Err(SolverError::AmountOverflow)
        );

        Ok(())
    }

    #[test]
    fn trace_lists_promotions_then_leftovers() -> TestResult {
        let mut catalog = Catalog::with_items([
            Item::new(ItemId(1), 3, dec!(10)),
            Item::new(ItemId(2), 1, dec!(2.5)),
        ])?;
        let index = PromotionIndex::new(&catalog, [Promotion::new([(ItemId(1), 2)], dec!(15))?])?;
        let mut report = Report::new();

        let result = GreedySolver.solve_with_observer(&mut catalog, &index, &mut report)?;

        assert_eq!(
            report.finish(result.total),
            "Promotion 1: 2 x #1 for 15.00 (saves 5.00)\n\
             #1: 1 x 10.00 = 10.00\n\
             #2: 1 x 2.50 = 2.50\n\
             27.50"
        );

        Ok(())
    }
}
