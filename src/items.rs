//! Items

use std::fmt;

use rust_decimal::Decimal;

/// Identifier of an item in the price list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An item still to be bought, with the quantity outstanding and its unit price.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    id: ItemId,
    remaining: u32,
    unit_price: Decimal,
}

impl Item {
    /// Creates a new item record
    pub fn new(id: ItemId, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            id,
            remaining: quantity,
            unit_price,
        }
    }

    /// Returns the item id
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Returns the quantity still to be bought
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the unit price
    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// Full-price value of the outstanding quantity.
    ///
    /// Exact for items held by a [`Catalog`](crate::catalog::Catalog), which checks the value on
    /// insert; saturates at [`Decimal::MAX`] otherwise.
    pub fn worth(&self) -> Decimal {
        Decimal::from(self.remaining).saturating_mul(self.unit_price)
    }

    /// Removes `quantity` units, returning `false` (and leaving the record untouched)
    /// when fewer units remain.
    pub(crate) fn take(&mut self, quantity: u32) -> bool {
        match self.remaining.checked_sub(quantity) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }

    /// Returns `quantity` units previously removed with [`Item::take`].
    pub(crate) fn put_back(&mut self, quantity: u32) {
        self.remaining += quantity;
    }

    /// Marks every outstanding unit as bought, returning how many there were.
    pub(crate) fn clear(&mut self) -> u32 {
        std::mem::take(&mut self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn worth_is_remaining_times_unit_price() {
        let item = Item::new(ItemId(1), 3, dec!(2.50));

        assert_eq!(item.worth(), dec!(7.50));
    }

    #[test]
    fn worth_saturates_instead_of_overflowing() {
        let item = Item::new(ItemId(1), 2, Decimal::MAX);

        assert_eq!(item.worth(), Decimal::MAX);
    }

    #[test]
    fn take_never_goes_below_zero() {
        let mut item = Item::new(ItemId(1), 2, dec!(1));

        assert!(!item.take(3));
        assert_eq!(item.remaining(), 2);

        assert!(item.take(2));
        assert_eq!(item.remaining(), 0);
    }

    #[test]
    fn put_back_restores_taken_units() {
        let mut item = Item::new(ItemId(4), 5, dec!(1));

        assert!(item.take(3));
        item.put_back(3);

        assert_eq!(item.remaining(), 5);
    }

    #[test]
    fn clear_returns_outstanding_quantity() {
        let mut item = Item::new(ItemId(2), 4, dec!(1));

        assert_eq!(item.clear(), 4);
        assert_eq!(item.remaining(), 0);
    }

    #[test]
    fn item_id_displays_with_hash_prefix() {
        assert_eq!(ItemId(17).to_string(), "#17");
    }
}
