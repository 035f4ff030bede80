//! rkdeveloptool subprocess handling

use crate::error::{Result, RkDevelopToolError};
use log::{debug, warn};
use rkbackup_core::{FlashTool, ToolError};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable looked up in `$PATH` when no path is given
pub const DEFAULT_PROGRAM: &str = "rkdeveloptool";

/// Configuration for the rkdeveloptool backend
#[derive(Debug, Clone)]
pub struct RkDevelopToolConfig {
    /// Executable to run
    pub program: PathBuf,
}

impl Default for RkDevelopToolConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
        }
    }
}

/// `rkdeveloptool` as a [`FlashTool`]
///
/// Every call spawns the executable once and waits for it to exit.
pub struct RkDevelopTool {
    program: PathBuf,
}

impl RkDevelopTool {
    /// Create a backend for the configured executable
    pub fn new(config: RkDevelopToolConfig) -> Self {
        Self {
            program: config.program,
        }
    }

    /// Run the tool with `args` and return its standard output
    fn run(&self, args: &[&str]) -> std::result::Result<String, ToolError> {
        let command = format!("{} {}", self.program.display(), args.join(" "));
        debug!("Running '{}'", command);

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| {
                warn!("Is {} in your $PATH?", self.program.display());
                ToolError::Unavailable {
                    command: command.clone(),
                    source,
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ToolError::ExecutionFailed {
                command,
                output: format!("{}{}", stdout, stderr),
            });
        }

        Ok(stdout)
    }
}

impl FlashTool for RkDevelopTool {
    fn query_geometry(&mut self) -> std::result::Result<String, ToolError> {
        self.run(&["read-flash-info"])
    }

    fn query_partitions(&mut self) -> std::result::Result<String, ToolError> {
        self.run(&["list-partitions"])
    }

    fn read_chunk(
        &mut self,
        start_sector: u64,
        size_bytes: u64,
        destination: &Path,
    ) -> std::result::Result<(), ToolError> {
        let start = start_sector.to_string();
        let size = size_bytes.to_string();
        let file = destination.to_string_lossy();
        self.run(&["read", start.as_str(), size.as_str(), &*file])
            .map(|_| ())
    }
}

/// Parse backend options from key-value pairs
///
/// # Supported options
/// - `path=<file>` - executable to run (default: `rkdeveloptool` from `$PATH`)
pub fn parse_options(options: &[(&str, &str)]) -> Result<RkDevelopToolConfig> {
    let mut config = RkDevelopToolConfig::default();

    for (key, value) in options {
        match *key {
            "path" => {
                if value.is_empty() {
                    return Err(RkDevelopToolError::InvalidParameter {
                        name: "path",
                        message: "must not be empty".to_string(),
                    });
                }
                config.program = PathBuf::from(value);
            }
            _ => {
                warn!("Unknown rkdeveloptool option: {}={}", key, value);
            }
        }
    }

    Ok(config)
}
