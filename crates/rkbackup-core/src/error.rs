//! Error types for rkbackup-core
//!
//! Every error here is fatal to a backup run. Parse errors keep the raw text
//! (or the single offending line) so a tool-version mismatch can be
//! diagnosed from the message alone.

use std::io;
use thiserror::Error;

/// Failure reported by a [`FlashTool`](crate::FlashTool) backend
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be started at all
    #[error("unable to run '{command}': {source}")]
    Unavailable {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        #[source]
        source: io::Error,
    },

    /// The tool ran but reported failure
    #[error("'{command}' failed, the tool may be a different version:\n{output}")]
    ExecutionFailed {
        /// Command line that was run
        command: String,
        /// Whatever the tool printed
        output: String,
    },
}

/// Free-form tool output did not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required geometry field was not found
    #[error("failed to parse flash info, '{field}' not found in:\n{text}")]
    FieldMissing {
        /// Label of the missing field
        field: &'static str,
        /// Complete text that was scanned
        text: String,
    },

    /// Geometry numbers do not add up
    #[error(
        "flash numbers do not add up: {size_mb} MB != {sector_count} sectors * {block_size_bytes} bytes"
    )]
    GeometryInconsistent {
        /// Reported size in MB
        size_mb: u64,
        /// Reported number of sectors
        sector_count: u64,
        /// Bytes per sector
        block_size_bytes: u64,
    },

    /// The partition listing header is not the one we know
    #[error("partition list header unknown:\n{text}")]
    HeaderUnrecognized {
        /// Complete listing
        text: String,
    },

    /// A partition line did not match the five-field pattern
    #[error("unable to parse partition line {line_number}: '{line}'")]
    LinePatternMismatch {
        /// 1-based line number within the listing
        line_number: usize,
        /// The offending line
        line: String,
    },
}

/// Chunk planning was given parameters it cannot satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    /// The maximum chunk size rounds down to zero blocks
    #[error("chunk size {max_chunk_bytes} is smaller than one block of {block_size_bytes} bytes")]
    ChunkSizeTooSmall {
        /// Configured maximum chunk size
        max_chunk_bytes: u64,
        /// Block size it was rounded against
        block_size_bytes: u64,
    },

    /// The block size is zero
    #[error("block size must not be zero")]
    ZeroBlockSize,

    /// The range is too large to express in bytes
    #[error(
        "sector range {start_sector}..={end_sector} of {block_size_bytes}-byte blocks is too large"
    )]
    RangeTooLarge {
        /// First sector
        start_sector: u64,
        /// Last sector (inclusive)
        end_sector: u64,
        /// Block size the range was measured in
        block_size_bytes: u64,
    },

    /// End sector lies before start sector
    #[error("invalid sector range {start_sector}..={end_sector}")]
    InvalidRange {
        /// First sector
        start_sector: u64,
        /// Last sector (inclusive)
        end_sector: u64,
    },
}

/// Any error that ends a backup run
#[derive(Debug, Error)]
pub enum BackupError {
    /// A geometry or partition query failed
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Tool output could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Chunk planning failed
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// A dispatched chunk read did not succeed
    #[error("reading {size_bytes} bytes from sector {start_sector} into '{output_name}' failed: {source}")]
    ChunkReadFailed {
        /// Output name of the failed chunk
        output_name: String,
        /// First sector of the chunk
        start_sector: u64,
        /// Size of the chunk in bytes
        size_bytes: u64,
        /// Error reported by the tool
        #[source]
        source: ToolError,
    },
}

/// Result type alias using [`BackupError`]
pub type Result<T> = std::result::Result<T, BackupError>;
