//! rkbackup-core - Chunked-read planning and backup orchestration
//!
//! This crate holds everything about a flash backup that does not depend on
//! how the device is actually reached: parsing the geometry and partition
//! listings printed by the flashing tool, splitting sector ranges into
//! bounded reads, tracking progress, and sequencing a whole backup run.
//!
//! The device itself is abstracted by the [`FlashTool`] trait. Backends live
//! in their own crates (`rkbackup-rkdeveloptool`, `rkbackup-dummy`).
//!
//! # Example
//!
//! ```ignore
//! use rkbackup_core::{Backup, BackupConfig, BackupMode, CancelToken, NoProgress};
//!
//! let config = BackupConfig::new(BackupMode::Partitions);
//! let mut backup = Backup::new(config);
//! let outcome = backup.run(&mut tool, &mut NoProgress, &CancelToken::new())?;
//! println!("{:?}", outcome);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod backup;
pub mod cancel;
pub mod chunk;
pub mod error;
pub mod geometry;
pub mod partition;
pub mod progress;
pub mod tool;

pub use backup::{
    Backup, BackupConfig, BackupMode, BackupOutcome, BackupPlan, BackupProgress, BackupState,
    NoProgress, DEFAULT_DISK_NAME, DEFAULT_MAX_CHUNK_BYTES,
};
pub use cancel::CancelToken;
pub use chunk::{plan_chunks, round_chunk_size, ChunkDescriptor, Chunks};
pub use error::{BackupError, ParseError, PlanError, Result, ToolError};
pub use geometry::{parse_geometry, FlashGeometry};
pub use partition::{
    parse_partitions, PartitionIndex, PartitionRecord, PartitionTable, LEADING_REGION_NAME,
};
pub use progress::{format_eta, progress_report, Eta, ProgressReport, ProgressTracker};
pub use tool::FlashTool;
