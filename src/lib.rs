//! # stimseq
//!
//! Randomized, predecessor-balanced stimulus sequences for block-design
//! experiments.
//!
//! Given `K` ordinary stimulus categories (`0..K`) and one special category
//! (`K`), every block presents each ordinary category `P` times and the special
//! category `K*P` times, and the special category is immediately preceded by
//! every category, itself included, exactly `K*P / (K+1)` times.
//!
//! ## Quick Start
//!
//! ```
//! use stimseq::prelude::*;
//!
//! let cfg = RunConfig::new(SequenceConfig::new(2, 6), 30).with_seed(42);
//! let run = Orchestrator::new(cfg).unwrap().run().unwrap();
//!
//! for rec in &run.blocks {
//!     let tables = verify(&rec.block, &cfg.sequence).unwrap();
//!     assert_eq!(tables.predecessors, vec![4, 4, 4]);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `serde` (default): Serialization and JSON export
//! - `parallel`: Generate blocks on multiple threads via rayon
//!
//! ## no_std Support
//!
//! Disable default features for `no_std` environments:
//! ```toml
//! stimseq = { version = "0.1", default-features = false }
//! ```
//!
//! ## Modules
//!
//! - [`builder`]: Two-phase construction of one block
//! - [`verifier`]: Independent recount of a finished block
//! - [`orchestrator`]: Multi-block runs with per-block seeds
//! - [`observer`]: Read-only block summaries

// no_std support
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[path = "core/block.rs"]
pub mod block;

#[path = "core/config.rs"]
pub mod config;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/tables.rs"]
pub mod tables;

#[path = "core/builder.rs"]
pub mod builder;

#[path = "core/verifier.rs"]
pub mod verifier;

#[path = "core/orchestrator.rs"]
pub mod orchestrator;

#[cfg(feature = "std")]
#[path = "core/export.rs"]
pub mod export;

#[cfg(feature = "std")]
pub mod observer;

/// Prelude module for convenient imports.
///
/// ```
/// use stimseq::prelude::*;
/// ```
pub mod prelude {
    pub use crate::block::{Block, Category};
    pub use crate::builder::build_block;
    pub use crate::config::{ConfigError, ExecutionTier, RunConfig, SequenceConfig};
    pub use crate::orchestrator::{
        generate, regenerate_block, BlockRecord, GenerateError, Orchestrator, Run,
    };
    pub use crate::prng::Prng;
    pub use crate::tables::{BlockTables, Table};
    pub use crate::verifier::{audit, verify, Violation};
}
