//! Promotion Index
//!
//! Promotions ranked by their saving against a catalog. The ascending order (ties kept in
//! insertion order) is built once and drives the exhaustive search; its exact reverse drives
//! the greedy pass.

use std::fmt;

use rust_decimal::Decimal;

use crate::{
    catalog::Catalog,
    promotions::{Promotion, PromotionError},
};

/// Insertion ordinal of a promotion within its index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromotionId(pub usize);

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// A promotion together with its rank key.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedPromotion {
    id: PromotionId,
    name: String,
    saving: Decimal,
    promotion: Promotion,
}

impl RankedPromotion {
    /// Insertion ordinal
    pub fn id(&self) -> PromotionId {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Saving computed against the catalog the index was built from
    pub fn saving(&self) -> Decimal {
        self.saving
    }

    /// The promotion itself
    pub fn promotion(&self) -> &Promotion {
        &self.promotion
    }
}

/// Promotions ordered ascending by `(saving, insertion order)`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromotionIndex {
    ranked: Vec<RankedPromotion>,
}

impl PromotionIndex {
    /// Build an index from unnamed promotions; each is named `Promotion <n>` after its
    /// 1-based position.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::UnknownItem`] if a promotion references an item missing
    /// from `catalog`.
    pub fn new(
        catalog: &Catalog,
        promotions: impl IntoIterator<Item = Promotion>,
    ) -> Result<Self, PromotionError> {
        Self::with_names(
            catalog,
            promotions
                .into_iter()
                .enumerate()
                .map(|(idx, promotion)| (format!("Promotion {}", idx + 1), promotion)),
        )
    }

    /// Build an index from named promotions.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::UnknownItem`] if a promotion references an item missing
    /// from `catalog`.
    pub fn with_names(
        catalog: &Catalog,
        promotions: impl IntoIterator<Item = (String, Promotion)>,
    ) -> Result<Self, PromotionError> {
        let mut ranked = promotions
            .into_iter()
            .enumerate()
            .map(|(ordinal, (name, promotion))| -> Result<_, PromotionError> {
                Ok(RankedPromotion {
                    id: PromotionId(ordinal),
                    name,
                    saving: promotion.saving(catalog)?,
                    promotion,
                })
            })
            .collect::<Result<Vec<_>, PromotionError>>()?;

        // `sort_by` is stable, so equal savings keep insertion order.
        ranked.sort_by(|a, b| a.saving.cmp(&b.saving));

        Ok(Self { ranked })
    }

    /// Promotions ascending by saving, ties in insertion order.
    pub fn ascending(&self) -> &[RankedPromotion] {
        &self.ranked
    }

    /// The exact reverse of [`PromotionIndex::ascending`].
    pub fn descending(&self) -> impl Iterator<Item = &RankedPromotion> {
        self.ranked.iter().rev()
    }

    /// Look up a promotion by id.
    pub fn get(&self, id: PromotionId) -> Option<&RankedPromotion> {
        self.ranked.iter().find(|ranked| ranked.id == id)
    }

    /// Number of promotions
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    /// Whether the index holds no promotions
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::items::{Item, ItemId};

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        let mut catalog = Catalog::new();

        catalog.insert(Item::new(ItemId(1), 4, dec!(10)))?;
        catalog.insert(Item::new(ItemId(2), 4, dec!(5)))?;

        Ok(catalog)
    }

    fn ids<'a>(ranked: impl Iterator<Item = &'a RankedPromotion>) -> Vec<usize> {
        ranked.map(|ranked| ranked.id().0).collect()
    }

    #[test]
    fn ascending_orders_by_saving() -> TestResult {
        let catalog = catalog()?;
        let index = PromotionIndex::new(
            &catalog,
            [
                Promotion::new([(ItemId(1), 2)], dec!(12))?, // saves 8
                Promotion::new([(ItemId(2), 2)], dec!(9))?,  // saves 1
                Promotion::new([(ItemId(1), 1)], dec!(5))?,  // saves 5
            ],
        )?;

        assert_eq!(ids(index.ascending().iter()), vec![1, 2, 0]);
        assert_eq!(ids(index.descending()), vec![0, 2, 1]);

        Ok(())
    }

    #[test]
    fn equal_savings_keep_insertion_order() -> TestResult {
        let catalog = catalog()?;
        let index = PromotionIndex::new(
            &catalog,
            [
                Promotion::new([(ItemId(1), 1)], dec!(8))?, // saves 2
                Promotion::new([(ItemId(2), 2)], dec!(8))?, // saves 2
                Promotion::new([(ItemId(2), 1)], dec!(4))?, // saves 1
                Promotion::new([(ItemId(1), 2)], dec!(18))?, // saves 2
            ],
        )?;

        assert_eq!(ids(index.ascending().iter()), vec![2, 0, 1, 3]);
        assert_eq!(ids(index.descending()), vec![3, 1, 0, 2]);

        Ok(())
    }

    #[test]
    fn unnamed_promotions_are_numbered_from_one() -> TestResult {
        let catalog = catalog()?;
        let index = PromotionIndex::new(&catalog, [Promotion::new([(ItemId(1), 1)], dec!(8))?])?;

        let first = index.get(PromotionId(0)).ok_or("missing promotion")?;

        assert_eq!(first.name(), "Promotion 1");
        assert_eq!(first.saving(), dec!(2));
        assert_eq!(first.id().to_string(), "P1");

        Ok(())
    }

    #[test]
    fn unknown_item_is_rejected() -> TestResult {
        let catalog = catalog()?;
        let result = PromotionIndex::new(&catalog, [Promotion::new([(ItemId(7), 1)], dec!(1))?]);

        assert!(matches!(result, Err(PromotionError::UnknownItem(ItemId(7)))));

        Ok(())
    }

    #[test]
    fn empty_index() {
        let index = PromotionIndex::default();

        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.descending().count(), 0);
    }
}
