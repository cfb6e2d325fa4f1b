#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::Category;
use crate::config::SequenceConfig;

/// Which count table a figure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Table {
    /// Total occurrences per category.
    Category,
    /// Occurrences immediately before a special presentation.
    Predecessor,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Category => f.write_str("category-count"),
            Table::Predecessor => f.write_str("predecessor-count"),
        }
    }
}

/// Category-count and predecessor-count tables of one block, indexed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockTables {
    pub occurrences: Vec<usize>,
    pub predecessors: Vec<usize>,
}

impl BlockTables {
    /// Count a block from scratch.
    ///
    /// Labels outside `[0, K]` are not counted in either table. A special
    /// presentation at position 0 has no predecessor and adds nothing to the
    /// predecessor table.
    pub fn tally(labels: &[Category], cfg: &SequenceConfig) -> Self {
        let n = cfg.category_count();
        let special = cfg.special();
        let mut occurrences = vec![0usize; n];
        let mut predecessors = vec![0usize; n];

        for (i, &c) in labels.iter().enumerate() {
            if c >= n {
                continue;
            }
            occurrences[c] += 1;
            if c != special || i == 0 {
                continue;
            }
            let prev = labels[i - 1];
            if prev < n {
                predecessors[prev] += 1;
            }
        }

        Self {
            occurrences,
            predecessors,
        }
    }

    pub fn get(&self, table: Table, c: Category) -> usize {
        let column = match table {
            Table::Category => &self.occurrences,
            Table::Predecessor => &self.predecessors,
        };
        column.get(c).copied().unwrap_or(0)
    }
}
