//! Scenarios
//!
//! YAML description of a price list and its promotions, as an alternative to the
//! count-prefixed text format.
//!
//! ```yaml
//! items:
//!   - { id: 1, quantity: 3, price: "10.00" }
//! promotions:
//!   - name: Three for twenty
//!     items:
//!       - { id: 1, quantity: 3 }
//!     price: "20.00"
//! ```

use std::{fs, path::Path, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    items::{Item, ItemId},
    promotions::{Promotion, PromotionError, PromotionIndex},
};

/// Scenario Parsing Errors
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// IO error reading the scenario file
    #[error("Failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Wrapped catalog error
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Wrapped promotion error
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

/// Item line in a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct ItemFixture {
    /// Item id
    pub id: u32,

    /// Quantity needed
    pub quantity: u32,

    /// Unit price, as a decimal string
    pub price: String,
}

/// Quantity of an item required by a promotion
#[derive(Debug, Clone, Deserialize)]
pub struct RequirementFixture {
    /// Item id
    pub id: u32,

    /// Units per application
    pub quantity: u32,
}

/// Promotion in a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionFixture {
    /// Display name; defaults to `Promotion <n>`
    #[serde(default)]
    pub name: Option<String>,

    /// Items consumed per application
    pub items: Vec<RequirementFixture>,

    /// Bundle price, as a decimal string
    pub price: String,
}

/// A complete scenario
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Items to buy
    pub items: Vec<ItemFixture>,

    /// Available promotions
    #[serde(default)]
    pub promotions: Vec<PromotionFixture>,
}

impl Scenario {
    /// Load a scenario from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path)?;

        contents.parse()
    }

    /// Build the catalog and promotion index described by this scenario.
    ///
    /// # Errors
    ///
    /// Returns an error if a price is malformed, an item repeats, or a promotion is invalid
    /// or references an unknown item.
    pub fn build(&self) -> Result<(Catalog, PromotionIndex), ScenarioError> {
        let items = self
            .items
            .iter()
            .map(|item| -> Result<Item, ScenarioError> {
                Ok(Item::new(
                    ItemId(item.id),
                    item.quantity,
                    parse_price(&item.price)?,
                ))
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        let catalog = Catalog::with_items(items)?;

        let promotions = self
            .promotions
            .iter()
            .enumerate()
            .map(|(idx, fixture)| -> Result<(String, Promotion), ScenarioError> {
                let name = fixture
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Promotion {}", idx + 1));

                let promotion = Promotion::new(
                    fixture
                        .items
                        .iter()
                        .map(|req| (ItemId(req.id), req.quantity)),
                    parse_price(&fixture.price)?,
                )?;

                Ok((name, promotion))
            })
            .collect::<Result<Vec<_>, ScenarioError>>()?;

        let index = PromotionIndex::with_names(&catalog, promotions)?;

        Ok((catalog, index))
    }
}

impl FromStr for Scenario {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_norway::from_str(s)?)
    }
}

/// Parse a decimal price string such as `"10.00"`.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidPrice`] if the string is not a decimal number.
pub fn parse_price(s: &str) -> Result<Decimal, ScenarioError> {
    Decimal::from_str(s.trim()).map_err(|_err| ScenarioError::InvalidPrice(s.to_string()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use crate::promotions::PromotionId;

    use super::*;

    const BAKERY: &str = r#"
items:
  - { id: 1, quantity: 3, price: "10.00" }
  - { id: 2, quantity: 2, price: "2.50" }
promotions:
  - name: Three loaves
    items:
      - { id: 1, quantity: 3 }
    price: "20.00"
  - items:
      - { id: 1, quantity: 1 }
      - { id: 2, quantity: 2 }
    price: "12"
"#;

    #[test]
    fn builds_catalog_and_index() -> TestResult {
        let scenario: Scenario = BAKERY.parse()?;
        let (catalog, index) = scenario.build()?;

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.full_price_total(), dec!(35));
        assert_eq!(index.len(), 2);

        let named = index.get(PromotionId(0)).ok_or("missing promotion")?;
        let unnamed = index.get(PromotionId(1)).ok_or("missing promotion")?;

        assert_eq!(named.name(), "Three loaves");
        assert_eq!(named.saving(), dec!(10));
        assert_eq!(unnamed.name(), "Promotion 2");
        assert_eq!(unnamed.saving(), dec!(3));

        Ok(())
    }

    #[test]
    fn promotions_are_optional() -> TestResult {
        let scenario: Scenario = "items:\n  - { id: 4, quantity: 2, price: \"5\" }\n".parse()?;
        let (catalog, index) = scenario.build()?;

        assert_eq!(catalog.full_price_total(), dec!(10));
        assert!(index.is_empty());

        Ok(())
    }

    #[test]
    fn invalid_price_is_rejected() -> TestResult {
        let scenario: Scenario = "items:\n  - { id: 1, quantity: 1, price: \"£1\" }\n".parse()?;

        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::InvalidPrice(price)) if price == "£1"
        ));

        Ok(())
    }

    #[test]
    fn unknown_item_in_promotion_is_rejected() -> TestResult {
        let scenario: Scenario = r#"
items:
  - { id: 1, quantity: 1, price: "1" }
promotions:
  - items: [{ id: 2, quantity: 1 }]
    price: "1"
"#
        .parse()?;

        assert!(matches!(
            scenario.build(),
            Err(ScenarioError::Promotion(PromotionError::UnknownItem(ItemId(2))))
        ));

        Ok(())
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(BAKERY.as_bytes())?;

        let scenario = Scenario::from_path(file.path())?;

        assert_eq!(scenario.items.len(), 2);
        assert_eq!(scenario.promotions.len(), 2);

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            Scenario::from_path("does/not/exist.yml"),
            Err(ScenarioError::Io(_))
        ));
    }
}
