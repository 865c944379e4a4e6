//! Catalog
//!
//! Per-item outstanding quantities and unit prices. Solvers mutate the catalog in place while
//! trying promotions and rely on [`Catalog::restore`] to undo a successful
//! [`Catalog::try_apply`] exactly.

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    items::{Item, ItemId},
    promotions::Promotion,
};

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The item id is already present in the catalog.
    #[error("item {0} is listed more than once")]
    DuplicateItem(ItemId),

    /// The unit price is negative.
    #[error("item {0} has negative unit price {1}")]
    NegativePrice(ItemId, Decimal),

    /// The full-price value of the item, or of the catalog with it, cannot be represented.
    #[error("full-price value overflows when adding item {0}")]
    AmountOverflow(ItemId),
}

/// Units of an item bought at full price.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FullPricePurchase {
    /// Item bought
    pub item: ItemId,

    /// Units bought
    pub quantity: u32,

    /// Price paid per unit
    pub unit_price: Decimal,
}

impl FullPricePurchase {
    /// Total paid for this purchase; saturates at [`Decimal::MAX`].
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.quantity).saturating_mul(self.unit_price)
    }
}

/// Purchases made while settling a catalog.
pub type FullPricePurchases = SmallVec<[FullPricePurchase; 10]>;

/// Items still to be bought, in insertion order.
///
/// The full-price value of everything inserted is checked to fit in a [`Decimal`]; quantities
/// only ever go down from there, so worth and totals computed later cannot overflow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
    positions: FxHashMap<ItemId, usize>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the given items.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if an item id repeats or a price is negative.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();

        items
            .into_iter()
            .try_for_each(|item| catalog.insert(item))?;

        Ok(catalog)
    }

    /// Add an item to the catalog.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateItem`]: the id is already present.
    /// - [`CatalogError::NegativePrice`]: the unit price is below zero.
    /// - [`CatalogError::AmountOverflow`]: the item's value or the new catalog total overflows.
    pub fn insert(&mut self, item: Item) -> Result<(), CatalogError> {
        if item.unit_price() < Decimal::ZERO {
            return Err(CatalogError::NegativePrice(item.id(), item.unit_price()));
        }

        if self.positions.contains_key(&item.id()) {
            return Err(CatalogError::DuplicateItem(item.id()));
        }

        Decimal::from(item.remaining())
            .checked_mul(item.unit_price())
            .and_then(|worth| self.full_price_total().checked_add(worth))
            .ok_or(CatalogError::AmountOverflow(item.id()))?;

        self.positions.insert(item.id(), self.items.len());
        self.items.push(item);

        Ok(())
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.positions
            .get(&id)
            .and_then(|&position| self.items.get(position))
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.positions
            .get(&id)
            .and_then(|&position| self.items.get_mut(position))
    }

    /// Whether the catalog lists the given item.
    pub fn contains(&self, id: ItemId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Items with a positive outstanding quantity, in insertion order.
    pub fn remaining(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.remaining() > 0)
    }

    /// Number of distinct items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog lists no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cost of buying everything outstanding at full price.
    pub fn full_price_total(&self) -> Decimal {
        self.items.iter().map(Item::worth).sum()
    }

    /// Total outstanding units across every item.
    pub fn outstanding_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.remaining())).sum()
    }

    /// Whether every requirement of the promotion can be met from what is outstanding.
    pub fn is_applicable(&self, promotion: &Promotion) -> bool {
        promotion.requirements().iter().all(|req| {
            self.get(req.item)
                .is_some_and(|item| item.remaining() >= req.quantity)
        })
    }

    /// Apply the promotion if it is applicable.
    ///
    /// Either every requirement is consumed or, when the promotion does not fit, nothing is.
    pub fn try_apply(&mut self, promotion: &Promotion) -> bool {
        if !self.is_applicable(promotion) {
            return false;
        }

        for req in promotion.requirements() {
            let taken = self.get_mut(req.item).is_some_and(|item| item.take(req.quantity));

            debug_assert!(taken, "applicability was checked before consuming");
        }

        true
    }

    /// Undo a successful [`Catalog::try_apply`] of the same promotion.
    pub fn restore(&mut self, promotion: &Promotion) {
        for req in promotion.requirements() {
            if let Some(item) = self.get_mut(req.item) {
                item.put_back(req.quantity);
            }
        }
    }

    /// Buy everything outstanding at full price, leaving every quantity at zero.
    pub fn settle(&mut self) -> FullPricePurchases {
        self.items
            .iter_mut()
            .filter(|item| item.remaining() > 0)
            .map(|item| FullPricePurchase {
                item: item.id(),
                unit_price: item.unit_price(),
                quantity: item.clear(),
            })
            .collect()
    }

    /// Whether nothing is left to buy.
    pub fn is_settled(&self) -> bool {
        self.items.iter().all(|item| item.remaining() == 0)
    }
}
