use crate::block::{Block, Category};
use crate::config::SequenceConfig;
use crate::orchestrator::Run;
use crate::tables::BlockTables;

/// A read-only summary of one block.
///
/// Design intent:
/// - Observers cannot alter a block; summaries are computed on demand.
/// - Nothing here decides validity, that is the verifier's job. A summary of an
///   unbalanced block simply shows the unbalanced tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub index: usize,
    pub len: usize,
    pub tables: BlockTables,
    /// Longest stretch of consecutive special presentations.
    pub longest_special_run: usize,
    /// Longest stretch of consecutive ordinary presentations.
    pub longest_ordinary_run: usize,
}

pub struct BlockAdapter<'a> {
    block: &'a Block,
    cfg: &'a SequenceConfig,
}

impl<'a> BlockAdapter<'a> {
    pub fn new(block: &'a Block, cfg: &'a SequenceConfig) -> Self {
        Self { block, cfg }
    }

    pub fn summary(&self, index: usize) -> BlockSummary {
        let special = self.cfg.special();
        BlockSummary {
            index,
            len: self.block.len(),
            tables: BlockTables::tally(self.block, self.cfg),
            longest_special_run: longest_run(self.block, |c| c == special),
            longest_ordinary_run: longest_run(self.block, |c| c < special),
        }
    }
}

fn longest_run(labels: &[Category], pred: impl Fn(Category) -> bool) -> usize {
    let mut best = 0;
    let mut current = 0;
    for &c in labels {
        if pred(c) {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }
    best
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: Option<u64>,
    pub blocks: Vec<BlockSummary>,
}

impl RunSummary {
    /// Longest special run across all blocks.
    pub fn max_special_run(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.longest_special_run)
            .max()
            .unwrap_or(0)
    }

    pub fn max_ordinary_run(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.longest_ordinary_run)
            .max()
            .unwrap_or(0)
    }
}

pub struct RunAdapter<'a> {
    run: &'a Run,
}

impl<'a> RunAdapter<'a> {
    pub fn new(run: &'a Run) -> Self {
        Self { run }
    }

    pub fn summary(&self) -> RunSummary {
        let cfg = &self.run.config.sequence;
        RunSummary {
            seed: self.run.seed(),
            blocks: self
                .run
                .blocks
                .iter()
                .map(|r| BlockAdapter::new(&r.block, cfg).summary(r.index))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::orchestrator::Orchestrator;

    #[test]
    fn summarizes_hand_built_block() {
        let cfg = SequenceConfig::new(2, 6);
        let block = Block::new(vec![0, 0, 1, 2, 2, 2, 1]);
        let s = BlockAdapter::new(&block, &cfg).summary(3);
        assert_eq!(s.index, 3);
        assert_eq!(s.len, 7);
        assert_eq!(s.longest_special_run, 3);
        assert_eq!(s.longest_ordinary_run, 3);
        assert_eq!(s.tables.occurrences, vec![2, 2, 3]);
        assert_eq!(s.tables.predecessors, vec![0, 1, 2]);
    }

    #[test]
    fn run_summary_covers_every_block() {
        let run = Orchestrator::new(RunConfig::new(SequenceConfig::new(2, 6), 6).with_seed(8))
            .unwrap()
            .run()
            .unwrap();
        let summary = RunAdapter::new(&run).summary();
        assert_eq!(summary.seed, Some(8));
        assert_eq!(summary.blocks.len(), 6);
        for b in &summary.blocks {
            assert_eq!(b.tables.predecessors, vec![4, 4, 4]);
            // Every special run starts right after an ordinary pair head.
            assert!(b.longest_special_run >= 1 && b.longest_special_run <= 5);
            assert!(b.longest_ordinary_run >= 1);
        }
        assert!(summary.max_special_run() >= 1);
        assert!(summary.max_ordinary_run() >= 1);
    }
}
