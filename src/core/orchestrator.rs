#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::builder;
use crate::config::{ConfigError, ExecutionTier, RunConfig, SequenceConfig};
use crate::prng::{derive_seed, Prng};
use crate::verifier::{self, Violation};

/// Why a run produced no output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("block {block} failed verification: {violation}")]
    Invariant { block: usize, violation: Violation },
}

/// A verified block together with the seed that reproduces it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockRecord {
    pub index: usize,
    pub seed: u64,
    pub block: Block,
}

/// Output of one run. `config.seed` always holds the seed actually used.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Run {
    pub config: RunConfig,
    pub blocks: Vec<BlockRecord>,
}

impl Run {
    pub fn seed(&self) -> Option<u64> {
        self.config.seed
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks.into_iter().map(|r| r.block).collect()
    }
}

type BuildFn = fn(&SequenceConfig, &mut Prng) -> Block;

/// Runs the builder and verifier once per block.
///
/// Every block draws from its own stream seeded by `derive_seed(run_seed, index)`,
/// so the schedule (sequential or parallel) never changes the output.
#[derive(Clone)]
pub struct Orchestrator {
    config: RunConfig,
    build: BuildFn,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Validates the configuration before anything is generated.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            build: builder::build_validated,
        })
    }

    #[cfg(test)]
    fn with_builder(mut self, build: BuildFn) -> Self {
        self.build = build;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Generate and verify every block. The first failing block aborts the run.
    ///
    /// With the parallel tier, if several blocks fail the one reported is
    /// whichever worker finished first.
    pub fn run(&self) -> Result<Run, GenerateError> {
        let seed = self.config.seed.unwrap_or_else(entropy_seed);
        let n = self.config.blocks;

        let blocks: Result<Vec<BlockRecord>, GenerateError> = match self.config.tier.effective()
        {
            ExecutionTier::Parallel => {
                #[cfg(feature = "parallel")]
                {
                    (0..n)
                        .into_par_iter()
                        .map(|i| self.make_block(seed, i))
                        .collect()
                }
                #[cfg(not(feature = "parallel"))]
                {
                    (0..n).map(|i| self.make_block(seed, i)).collect()
                }
            }
            ExecutionTier::Sequential => (0..n).map(|i| self.make_block(seed, i)).collect(),
        };

        Ok(Run {
            config: RunConfig {
                seed: Some(seed),
                ..self.config
            },
            blocks: blocks?,
        })
    }

    fn make_block(&self, run_seed: u64, index: usize) -> Result<BlockRecord, GenerateError> {
        let cfg = &self.config.sequence;
        let seed = derive_seed(run_seed, index as u64);
        let mut rng = Prng::new(seed);
        let block = (self.build)(cfg, &mut rng);
        verifier::verify(&block, cfg).map_err(|violation| GenerateError::Invariant {
            block: index,
            violation,
        })?;
        Ok(BlockRecord { index, seed, block })
    }
}

/// Generate `blocks` verified blocks of `ordinary_categories` x `presentations_per_category`.
pub fn generate(
    ordinary_categories: usize,
    presentations_per_category: usize,
    blocks: usize,
    seed: Option<u64>,
) -> Result<Vec<Block>, GenerateError> {
    let mut config = RunConfig::new(
        SequenceConfig::new(ordinary_categories, presentations_per_category),
        blocks,
    );
    config.seed = seed;
    Ok(Orchestrator::new(config)?.run()?.into_blocks())
}

/// Rebuild a single block from the per-block seed recorded in a [`BlockRecord`].
pub fn regenerate_block(cfg: &SequenceConfig, seed: u64) -> Result<Block, ConfigError> {
    builder::build_block(cfg, &mut Prng::new(seed))
}

/// A seed for unseeded runs.
#[cfg(feature = "std")]
pub fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    derive_seed(nanos, u64::from(std::process::id()))
}

/// A seed for unseeded runs. Without a clock this is fixed.
#[cfg(not(feature = "std"))]
pub fn entropy_seed() -> u64 {
    1
}
