//! Promotions

use std::fmt;

use rust_decimal::Decimal;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{catalog::Catalog, items::ItemId};

pub mod index;

pub use index::{PromotionId, PromotionIndex, RankedPromotion};

/// Errors raised while building promotions.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// The promotion references an item missing from the catalog.
    #[error("promotion references unknown item {0}")]
    UnknownItem(ItemId),

    /// The promotion does not require any units, so applying it would consume nothing.
    #[error("promotion requires no items")]
    EmptyBundle,

    /// The bundle price is negative.
    #[error("promotion bundle price {0} is negative")]
    NegativePrice(Decimal),

    /// Merged quantities of one item exceed what a quantity can hold.
    #[error("promotion quantity for item {0} overflows")]
    QuantityOverflow(ItemId),

    /// The full-price value of the bundle cannot be represented.
    #[error("promotion value for item {0} overflows")]
    AmountOverflow(ItemId),
}

/// A quantity of one item consumed by a promotion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Requirement {
    /// Item consumed
    pub item: ItemId,

    /// Units consumed per application
    pub quantity: u32,
}

/// Requirement list; most bundles only name a handful of items.
pub type Requirements = SmallVec<[Requirement; 4]>;

/// A bundle offer: a fixed quantity of specific items for a flat price.
#[derive(Clone, Debug, PartialEq)]
pub struct Promotion {
    requirements: Requirements,
    bundle_price: Decimal,
}

impl Promotion {
    /// Create a new promotion from `(item, quantity)` pairs.
    ///
    /// Pairs naming the same item are merged so that applicability is checked against the
    /// total demand on that item. Zero quantities are dropped.
    ///
    /// # Errors
    ///
    /// - [`PromotionError::EmptyBundle`]: no positive quantity remains after merging.
    /// - [`PromotionError::NegativePrice`]: `bundle_price` is below zero.
    /// - [`PromotionError::QuantityOverflow`]: merged quantities of one item overflow.
    pub fn new(
        pairs: impl IntoIterator<Item = (ItemId, u32)>,
        bundle_price: Decimal,
    ) -> Result<Self, PromotionError> {
        if bundle_price < Decimal::ZERO {
            return Err(PromotionError::NegativePrice(bundle_price));
        }

        let mut requirements = Requirements::new();

        for (item, quantity) in pairs {
            if quantity == 0 {
                continue;
            }

            match requirements.iter_mut().find(|req| req.item == item) {
                Some(existing) => {
                    existing.quantity = existing
                        .quantity
                        .checked_add(quantity)
                        .ok_or(PromotionError::QuantityOverflow(item))?;
                }
                None => requirements.push(Requirement { item, quantity }),
            }
        }

        if requirements.is_empty() {
            return Err(PromotionError::EmptyBundle);
        }

        Ok(Self {
            requirements,
            bundle_price,
        })
    }

    /// Items and quantities consumed by one application, in declaration order.
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Flat price paid per application
    pub fn bundle_price(&self) -> Decimal {
        self.bundle_price
    }

    /// Full-price value of the required items minus the bundle price.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::UnknownItem`] if a required item is not in the catalog, or
    /// [`PromotionError::AmountOverflow`] if the full-price value cannot be represented.
    pub fn saving(&self, catalog: &Catalog) -> Result<Decimal, PromotionError> {
        let full_price = self.requirements.iter().try_fold(Decimal::ZERO, |acc, req| -> Result<Decimal, PromotionError> {
            let item = catalog
                .get(req.item)
                .ok_or(PromotionError::UnknownItem(req.item))?;

            Decimal::from(req.quantity)
                .checked_mul(item.unit_price())
                .and_then(|value| acc.checked_add(value))
                .ok_or(PromotionError::AmountOverflow(req.item))
        })?;

        Ok(full_price - self.bundle_price)
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, req) in self.requirements.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            write!(f, "{} x {}", req.quantity, req.item)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::items::Item;

    use super::*;

    fn catalog() -> TestResult<Catalog> {
        let mut catalog = Catalog::new();

        catalog.insert(Item::new(ItemId(1), 3, dec!(10)))?;
        catalog.insert(Item::new(ItemId(2), 2, dec!(4.5)))?;

        Ok(catalog)
    }

    #[test]
    fn saving_is_full_price_minus_bundle_price() -> TestResult {
        let promotion = Promotion::new([(ItemId(1), 3), (ItemId(2), 1)], dec!(30))?;

        assert_eq!(promotion.saving(&catalog()?)?, dec!(4.5));

        Ok(())
    }

    #[test]
    fn saving_can_be_negative() -> TestResult {
        let promotion = Promotion::new([(ItemId(2), 2)], dec!(10))?;

        assert_eq!(promotion.saving(&catalog()?)?, dec!(-1));

        Ok(())
    }

    #[test]
    fn saving_errors_on_unknown_item() -> TestResult {
        let promotion = Promotion::new([(ItemId(9), 1)], dec!(1))?;

        assert_eq!(
            promotion.saving(&catalog()?),
            Err(PromotionError::UnknownItem(ItemId(9)))
        );

        Ok(())
    }

    #[test]
    fn duplicate_items_are_merged() -> TestResult {
        let promotion = Promotion::new([(ItemId(1), 2), (ItemId(2), 1), (ItemId(1), 2)], dec!(5))?;

        assert_eq!(
            promotion.requirements(),
            &[
                Requirement {
                    item: ItemId(1),
                    quantity: 4
                },
                Requirement {
                    item: ItemId(2),
                    quantity: 1
                },
            ]
        );

        Ok(())
    }

    #[test]
    fn merged_quantity_overflow_is_rejected() {
        assert_eq!(
            Promotion::new([(ItemId(1), 4_000_000_000), (ItemId(1), 4_000_000_000)], dec!(5)),
            Err(PromotionError::QuantityOverflow(ItemId(1)))
        );
    }

    #[test]
    fn saving_errors_when_value_overflows() -> TestResult {
        let catalog = Catalog::with_items([Item::new(ItemId(1), 1, Decimal::MAX)])?;
        let promotion = Promotion::new([(ItemId(1), 2)], dec!(1))?;

        assert_eq!(
            promotion.saving(&catalog),
            Err(PromotionError::AmountOverflow(ItemId(1)))
        );

        Ok(())
    }

    #[test]
    fn zero_quantities_are_rejected_when_nothing_is_left() {
        assert_eq!(
            Promotion::new([(ItemId(1), 0)], dec!(5)),
            Err(PromotionError::EmptyBundle)
        );
    }

    #[test]
    fn negative_bundle_price_is_rejected() {
        assert_eq!(
            Promotion::new([(ItemId(1), 1)], dec!(-0.01)),
            Err(PromotionError::NegativePrice(dec!(-0.01)))
        );
    }

    #[test]
    fn display_lists_requirements() -> TestResult {
        let promotion = Promotion::new([(ItemId(1), 3), (ItemId(2), 1)], dec!(30))?;

        assert_eq!(promotion.to_string(), "3 x #1, 1 x #2");

        Ok(())
    }
}
