//! Text input
//!
//! Both inputs start with a line holding a record count, followed by at least that many
//! records. Lines past the count are ignored.
//!
//! Price list records are `item_id quantity unit_price`. Promotion records are
//! `pair_count item_id quantity [item_id quantity ...] bundle_price`, where the bundle price
//! is the last token of the record.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    items::{Item, ItemId},
    promotions::{Promotion, PromotionError, PromotionIndex},
};

/// Input Parsing Errors
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The price list text is blank.
    #[error("empty price list")]
    EmptyPrices,

    /// The promotion text is blank.
    #[error("empty promotion list")]
    EmptyPromotions,

    /// The first line is not a record count.
    #[error("invalid record count: {0:?}")]
    InvalidCount(String),

    /// Fewer records than the count announced.
    #[error("expected {expected} records, found {found}")]
    MissingRecords {
        /// Announced record count
        expected: usize,
        /// Records present
        found: usize,
    },

    /// A price record does not have exactly three tokens.
    #[error("line {line}: price records need exactly three tokens")]
    InvalidPriceRecord {
        /// 1-based line number
        line: usize,
    },

    /// A promotion record has a zero pair count or too few tokens for its pair count.
    #[error("line {line}: malformed promotion record")]
    InvalidPromotionRecord {
        /// 1-based line number
        line: usize,
    },

    /// A token is not a non-negative integer.
    #[error("line {line}: invalid integer {token:?}")]
    InvalidInteger {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// A token is not a decimal number.
    #[error("line {line}: invalid decimal {token:?}")]
    InvalidDecimal {
        /// 1-based line number
        line: usize,
        /// Offending token
        token: String,
    },

    /// A price record was rejected by the catalog.
    #[error("line {line}: {source}")]
    InvalidItem {
        /// 1-based line number
        line: usize,
        /// Catalog error
        #[source]
        source: CatalogError,
    },

    /// A promotion record was rejected.
    #[error("line {line}: {source}")]
    InvalidPromotion {
        /// 1-based line number
        line: usize,
        /// Promotion error
        #[source]
        source: PromotionError,
    },

    /// Wrapped promotion index error
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

/// A record line with its 1-based line number.
type Record<'t> = (usize, &'t str);

/// Parse a price list into a catalog.
///
/// # Errors
///
/// Returns a [`ParseError`] for any malformed record; nothing is returned on failure.
pub fn parse_prices(text: &str) -> Result<Catalog, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyPrices);
    }

    let mut catalog = Catalog::new();

    for (line, record) in records(text)? {
        let tokens: Vec<&str> = record.split_whitespace().collect();

        let [id, quantity, price] = tokens.as_slice() else {
            return Err(ParseError::InvalidPriceRecord { line });
        };

        let item = Item::new(
            ItemId(integer(line, id)?),
            integer(line, quantity)?,
            decimal(line, price)?,
        );

        catalog
            .insert(item)
            .map_err(|source| ParseError::InvalidItem { line, source })?;
    }

    Ok(catalog)
}

/// Parse promotions against an already parsed catalog.
///
/// # Errors
///
/// Returns a [`ParseError`] for any malformed record or a reference to an item missing from
/// `catalog`.
pub fn parse_promotions(text: &str, catalog: &Catalog) -> Result<PromotionIndex, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::EmptyPromotions);
    }

    let promotions = records(text)?
        .into_iter()
        .map(|(line, record)| parse_promotion(line, record, catalog))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PromotionIndex::new(catalog, promotions)?)
}

/// Parse both inputs.
///
/// # Errors
///
/// Returns the first [`ParseError`] found, prices first.
pub fn parse(prices: &str, promotions: &str) -> Result<(Catalog, PromotionIndex), ParseError> {
    let catalog = parse_prices(prices)?;
    let index = parse_promotions(promotions, &catalog)?;

    Ok((catalog, index))
}

fn parse_promotion(line: usize, record: &str, catalog: &Catalog) -> Result<Promotion, ParseError> {
    let tokens: Vec<&str> = record.split_whitespace().collect();

    let Some((count, rest)) = tokens.split_first() else {
        return Err(ParseError::InvalidPromotionRecord { line });
    };

    let pair_count: usize = integer(line, count)?;

    let needed = pair_count.checked_mul(2).and_then(|pairs| pairs.checked_add(2));

    if pair_count == 0 || needed.is_none_or(|needed| tokens.len() < needed) {
        return Err(ParseError::InvalidPromotionRecord { line });
    }

    let Some(price) = rest.last() else {
        return Err(ParseError::InvalidPromotionRecord { line });
    };

    let pairs = rest
        .chunks_exact(2)
        .take(pair_count)
        .map(|pair| match pair {
            [id, quantity] => {
                let id = ItemId(integer(line, id)?);

                if !catalog.contains(id) {
                    return Err(ParseError::InvalidPromotion {
                        line,
                        source: PromotionError::UnknownItem(id),
                    });
                }

                Ok((id, integer(line, quantity)?))
            }
            _ => Err(ParseError::InvalidPromotionRecord { line }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Promotion::new(pairs, decimal(line, price)?)
        .map_err(|source| ParseError::InvalidPromotion { line, source })
}

/// Split off the count line and return exactly that many records.
fn records(text: &str) -> Result<Vec<Record<'_>>, ParseError> {
    let mut lines = text.lines().map(str::trim);

    let header = lines.next().unwrap_or_default();
    let expected: usize = header
        .parse()
        .map_err(|_err| ParseError::InvalidCount(header.to_string()))?;

    let records: Vec<Record<'_>> = lines
        .enumerate()
        .take(expected)
        .map(|(idx, record)| (idx + 2, record))
        .collect();

    if records.len() < expected {
        return Err(ParseError::MissingRecords {
            expected,
            found: records.len(),
        });
    }

    Ok(records)
}

fn integer<T: FromStr>(line: usize, token: &str) -> Result<T, ParseError> {
    token.parse().map_err(|_err| ParseError::InvalidInteger {
        line,
        token: token.to_string(),
    })
}

fn decimal(line: usize, token: &str) -> Result<Decimal, ParseError> {
    Decimal::from_str(token).map_err(|_err| ParseError::InvalidDecimal {
        line,
        token: token.to_string(),
    })
}
