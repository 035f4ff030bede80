//! rkbackup-rkdeveloptool - Backend driving the `rkdeveloptool` binary
//!
//! Rockchip devices in download (Maskrom/Loader) mode are reached through
//! `rkdeveloptool`. This crate runs it as a subprocess for each command:
//!
//! - `rkdeveloptool read-flash-info` for the geometry
//! - `rkdeveloptool list-partitions` for the partition table
//! - `rkdeveloptool read <start> <size> <file>` for each chunk
//!
//! A single `read` cannot transfer more than about 2 GB, which is why the
//! core splits large ranges into chunks.
//!
//! # Usage with rkbackup CLI
//!
//! ```bash
//! # Binary from $PATH
//! rkbackup backup -t partitions -d backup/
//!
//! # Binary somewhere else
//! rkbackup backup -p rkdeveloptool:path=/opt/rk/rkdeveloptool -t disk
//! ```

pub mod device;
pub mod error;

pub use device::{parse_options, RkDevelopTool, RkDevelopToolConfig, DEFAULT_PROGRAM};
pub use error::{Result, RkDevelopToolError};

/// Open the rkdeveloptool backend and return a boxed `FlashTool`
///
/// # Example Options
///
/// - `path=/usr/local/bin/rkdeveloptool` - Optional: executable to run
pub fn open_rkdeveloptool(
    options: &[(&str, &str)],
) -> std::result::Result<Box<dyn rkbackup_core::FlashTool>, Box<dyn std::error::Error>> {
    let config = parse_options(options)?;
    Ok(Box::new(RkDevelopTool::new(config)))
}
