//! Secure Shred
//!
//! Irreversibly destroys file contents by overwriting every byte with one or
//! more patterns, optionally renaming the file to a random name, and then
//! removing it. Batches run concurrently on a bounded worker pool with
//! cooperative cancellation and progress reporting.
//!
//! # Algorithms
//!
//! - **Simple**: one zero pass
//! - **DoD 5220.22-M**: `00`, `FF`, random
//! - **Gutmann**: 4 random, 21 fixed, 4 random (29 passes)
//! - **Custom**: a user cycle of hex bytes and `RANDOM`, repeated to a pass count
//!
//! # Architecture
//!
//! ```text
//! ShredConfig → PatternProvider → PatternSequence
//!                                      ↓
//! paths → ShredEngine (worker pool) → FileShredder → write_pass
//!                ↓                          ↓
//!           BatchSummary              ShredEvent → LogSink
//! ```
//!
//! Pattern overwrites do not guarantee physical erasure on SSDs or other
//! flash media with wear leveling.
//!
//! # Example
//!
//! ```rust,no_run
//! use secure_shred::{Algorithm, ShredConfig, ShredEngine, TracingSink};
//! use std::path::PathBuf;
//!
//! let engine = ShredEngine::new(ShredConfig::new(Algorithm::Dod)).unwrap();
//! let files = vec![PathBuf::from("secret.txt")];
//!
//! let summary = engine.shred_files(&files, &mut TracingSink, |done, total| {
//!     println!("{}/{}", done, total);
//! });
//! assert_eq!(summary.total, 1);
//! ```

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod events;
pub mod pattern;
pub mod shredder;
pub mod writer;

pub use config::{Algorithm, ShredConfig};
pub use engine::{BatchSummary, CancellationToken, ShredEngine};
pub use error::{Error, Result};
pub use events::{LogSink, ShredEvent, TracingSink};
pub use pattern::{PassPattern, PatternProvider, PatternSequence};
pub use shredder::{FileShredder, ShredOutcome};
