#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::Category;

/// Configuration rejected before any block is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "reason", rename_all = "snake_case"))]
pub enum ConfigError {
    #[error("at least one ordinary category is required")]
    NoOrdinaryCategories,
    #[error("at least one presentation per category is required")]
    NoPresentations,
    #[error(
        "{special} special presentations cannot be split evenly across {predecessors} predecessor categories"
    )]
    Indivisible { special: usize, predecessors: usize },
    #[error("block size overflows: {ordinary_categories} categories x {presentations_per_category} presentations")]
    Overflow {
        ordinary_categories: usize,
        presentations_per_category: usize,
    },
}

/// Shape of one block: `K` ordinary categories, `P` presentations of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequenceConfig {
    pub ordinary_categories: usize,
    pub presentations_per_category: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            ordinary_categories: 2,
            presentations_per_category: 6,
        }
    }
}

impl SequenceConfig {
    pub fn new(ordinary_categories: usize, presentations_per_category: usize) -> Self {
        Self {
            ordinary_categories,
            presentations_per_category,
        }
    }

    /// Validate the configuration.
    ///
    /// The special category appears `K*P` times and must be preceded equally
    /// often by each of the `K+1` categories, so `K*P` has to divide exactly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ordinary_categories < 1 {
            return Err(ConfigError::NoOrdinaryCategories);
        }
        if self.presentations_per_category < 1 {
            return Err(ConfigError::NoPresentations);
        }
        let special = self
            .ordinary_categories
            .checked_mul(self.presentations_per_category)
            .and_then(|n| n.checked_mul(2).map(|_| n))
            .ok_or(ConfigError::Overflow {
                ordinary_categories: self.ordinary_categories,
                presentations_per_category: self.presentations_per_category,
            })?;
        let predecessors = self.ordinary_categories + 1;
        if special % predecessors != 0 {
            return Err(ConfigError::Indivisible {
                special,
                predecessors,
            });
        }
        Ok(())
    }

    /// Label of the special category (`K`).
    pub fn special(&self) -> Category {
        self.ordinary_categories
    }

    pub fn is_special(&self, c: Category) -> bool {
        c == self.special()
    }

    /// Number of distinct labels, ordinary plus special.
    pub fn category_count(&self) -> usize {
        self.ordinary_categories + 1
    }

    /// Total special presentations per block (`K*P`).
    pub fn special_presentations(&self) -> usize {
        self.ordinary_categories * self.presentations_per_category
    }

    /// How often each category must precede the special one (`K*P / (K+1)`).
    pub fn pairs_per_predecessor(&self) -> usize {
        self.special_presentations() / self.category_count()
    }

    /// Ordinary presentations per category not consumed as pair heads.
    pub fn fillers_per_category(&self) -> usize {
        self.presentations_per_category
            .saturating_sub(self.pairs_per_predecessor())
    }

    pub fn block_len(&self) -> usize {
        2 * self.special_presentations()
    }

    /// Expected occurrences of `c` in a balanced block.
    pub fn expected_occurrences(&self, c: Category) -> usize {
        if self.is_special(c) {
            self.special_presentations()
        } else {
            self.presentations_per_category
        }
    }
}

/// How blocks of a run are scheduled.
///
/// - `Sequential`: one block after another on the calling thread.
/// - `Parallel`: blocks fan out over rayon's pool (requires the `parallel` feature).
///
/// Both produce identical output for the same seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ExecutionTier {
    #[default]
    Sequential,
    Parallel,
}

impl ExecutionTier {
    /// The tier that will actually run, given the compiled features.
    pub fn effective(self) -> ExecutionTier {
        match self {
            ExecutionTier::Sequential => ExecutionTier::Sequential,
            ExecutionTier::Parallel => {
                #[cfg(feature = "parallel")]
                {
                    ExecutionTier::Parallel
                }
                #[cfg(not(feature = "parallel"))]
                {
                    ExecutionTier::Sequential
                }
            }
        }
    }

    pub fn parse(s: &str) -> Option<ExecutionTier> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("sequential") || s.eq_ignore_ascii_case("scalar") {
            Some(ExecutionTier::Sequential)
        } else if s.eq_ignore_ascii_case("parallel") {
            Some(ExecutionTier::Parallel)
        } else {
            None
        }
    }
}

/// A full generation request: block shape, block count, seed and scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub sequence: SequenceConfig,
    pub blocks: usize,
    /// `None` draws a seed at run time; the drawn seed is reported on the run.
    pub seed: Option<u64>,
    pub tier: ExecutionTier,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            sequence: SequenceConfig::default(),
            blocks: 30,
            seed: None,
            tier: ExecutionTier::Sequential,
        }
    }
}

impl RunConfig {
    pub fn new(sequence: SequenceConfig, blocks: usize) -> Self {
        Self {
            sequence,
            blocks,
            ..Default::default()
        }
    }

    /// Set the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_blocks(mut self, blocks: usize) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_tier(mut self, tier: ExecutionTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sequence.validate()
    }
}
