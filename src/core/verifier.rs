//! Independent re-check of a finished block.
//!
//! Nothing here trusts the builder: both tables are recounted from the raw
//! labels and compared with the values the configuration implies.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::Category;
use crate::config::{ConfigError, SequenceConfig};
use crate::tables::{BlockTables, Table};

/// One way a block can break its balance invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Violation {
    /// The shape itself is invalid, so no block can satisfy it.
    #[error("invalid configuration: {error}")]
    Config {
        #[source]
        error: ConfigError,
    },
    #[error("block has {actual} presentations, expected {expected}")]
    Length { expected: usize, actual: usize },
    #[error("label {category} at position {position} is outside [0, {special}]")]
    UnknownCategory {
        position: usize,
        category: Category,
        special: Category,
    },
    #[error("{table} table: category {category} counted {actual}, expected {expected}")]
    Count {
        table: Table,
        category: Category,
        expected: usize,
        actual: usize,
    },
}

impl Violation {
    /// Signed difference `actual - expected` for count and length mismatches.
    pub fn delta(&self) -> Option<i64> {
        match *self {
            Violation::Length { expected, actual }
            | Violation::Count {
                expected, actual, ..
            } => Some(actual as i64 - expected as i64),
            Violation::UnknownCategory { .. } | Violation::Config { .. } => None,
        }
    }
}

/// Every violation in `labels`, in a fixed order: length, unknown labels,
/// category table, then predecessor table (each by ascending category).
///
/// An invalid configuration yields a single [`Violation::Config`] and nothing
/// is counted.
pub fn audit(labels: &[Category], cfg: &SequenceConfig) -> Vec<Violation> {
    let mut found = Vec::new();
    if let Err(error) = cfg.validate() {
        found.push(Violation::Config { error });
        return found;
    }

    let expected_len = cfg.block_len();
    if labels.len() != expected_len {
        found.push(Violation::Length {
            expected: expected_len,
            actual: labels.len(),
        });
    }

    let special = cfg.special();
    for (position, &category) in labels.iter().enumerate() {
        if category > special {
            found.push(Violation::UnknownCategory {
                position,
                category,
                special,
            });
        }
    }

    let tables = BlockTables::tally(labels, cfg);
    for category in 0..cfg.category_count() {
        let expected = cfg.expected_occurrences(category);
        let actual = tables.get(Table::Category, category);
        if actual != expected {
            found.push(Violation::Count {
                table: Table::Category,
                category,
                expected,
                actual,
            });
        }
    }

    let expected = cfg.pairs_per_predecessor();
    for category in 0..cfg.category_count() {
        let actual = tables.get(Table::Predecessor, category);
        if actual != expected {
            found.push(Violation::Count {
                table: Table::Predecessor,
                category,
                expected,
                actual,
            });
        }
    }

    found
}

/// Check a block, returning its recounted tables or the first violation
/// (in [`audit`] order).
pub fn verify(labels: &[Category], cfg: &SequenceConfig) -> Result<BlockTables, Violation> {
    match audit(labels, cfg).into_iter().next() {
        Some(v) => Err(v),
        None => Ok(BlockTables::tally(labels, cfg)),
    }
}
