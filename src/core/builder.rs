//! Two-phase construction of one balanced block.
//!
//! Phase 1 fixes the predecessor table: `q = K*P/(K+1)` ordinary→special pairs
//! per ordinary category are shuffled, then `q` extra specials are chained onto
//! randomly chosen pairs (special→special). Phase 2 fixes the category table:
//! the `P - q` leftover presentations of each ordinary category are dropped into
//! random gaps in front of pairs (or after the last one). A filler never lands
//! between a pair head and its special, so phase 2 cannot disturb phase 1.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::iter;

use crate::block::{Block, Category};
use crate::config::{ConfigError, SequenceConfig};
use crate::prng::Prng;

/// Intermediate form of a block: pairs, their special chains and the fillers
/// waiting in each gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    special: Category,
    /// Ordinary category heading pair `i`.
    heads: Vec<Category>,
    /// Extra specials chained after pair `i`'s own special.
    chains: Vec<usize>,
    /// Ordinary fillers placed in gap `i` (before pair `i`); the last gap trails the block.
    gaps: Vec<Vec<Category>>,
}

impl Layout {
    /// Phase 1: shuffled ordinary→special pairs plus special→special chains.
    pub fn place_pairs(cfg: &SequenceConfig, rng: &mut Prng) -> Self {
        let q = cfg.pairs_per_predecessor();
        let mut heads: Vec<Category> = (0..cfg.ordinary_categories)
            .flat_map(|c| iter::repeat(c).take(q))
            .collect();
        rng.shuffle(&mut heads);

        let pairs = heads.len();
        let mut layout = Self {
            special: cfg.special(),
            heads,
            chains: vec![0; pairs],
            gaps: vec![Vec::new(); pairs + 1],
        };
        layout.chain_specials(q, rng);
        layout
    }

    /// Attach `count` extra specials after randomly chosen pairs.
    fn chain_specials(&mut self, count: usize, rng: &mut Prng) {
        if self.heads.is_empty() {
            return;
        }
        for slot in rng.sorted_slots(count, self.heads.len()) {
            self.chains[slot] += 1;
        }
    }

    /// Phase 2: scatter the leftover ordinary presentations into the gaps.
    pub fn scatter_fillers(&mut self, cfg: &SequenceConfig, rng: &mut Prng) {
        let per_category = cfg.fillers_per_category();
        let mut fillers: Vec<Category> = (0..cfg.ordinary_categories)
            .flat_map(|c| iter::repeat(c).take(per_category))
            .collect();
        rng.shuffle(&mut fillers);

        let slots = rng.sorted_slots(fillers.len(), self.gaps.len());
        for (slot, c) in slots.into_iter().zip(fillers) {
            self.gaps[slot].push(c);
        }
    }

    pub fn pair_heads(&self) -> &[Category] {
        &self.heads
    }

    pub fn chain_lengths(&self) -> &[usize] {
        &self.chains
    }

    pub fn gaps(&self) -> &[Vec<Category>] {
        &self.gaps
    }

    /// Flatten gaps and pairs in order.
    pub fn assemble(self) -> Block {
        let len = self.heads.len() * 2
            + self.chains.iter().sum::<usize>()
            + self.gaps.iter().map(Vec::len).sum::<usize>();
        let mut labels = Vec::with_capacity(len);

        for (i, &head) in self.heads.iter().enumerate() {
            labels.extend_from_slice(&self.gaps[i]);
            labels.push(head);
            labels.extend(iter::repeat(self.special).take(1 + self.chains[i]));
        }
        if let Some(tail) = self.gaps.last() {
            labels.extend_from_slice(tail);
        }

        Block::new(labels)
    }
}

/// Build one balanced block.
///
/// Fails only on an invalid configuration; the randomness source is untouched
/// in that case.
pub fn build_block(cfg: &SequenceConfig, rng: &mut Prng) -> Result<Block, ConfigError> {
    cfg.validate()?;
    Ok(build_validated(cfg, rng))
}

/// Build a block for a configuration that already passed `validate()`.
pub(crate) fn build_validated(cfg: &SequenceConfig, rng: &mut Prng) -> Block {
    let mut layout = Layout::place_pairs(cfg, rng);
    layout.scatter_fillers(cfg, rng);
    layout.assemble()
}
