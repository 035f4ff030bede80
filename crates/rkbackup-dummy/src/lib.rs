//! rkbackup-dummy - Emulated flashing tool for testing
//!
//! This crate provides a [`FlashTool`] that emulates a device in memory. It
//! prints geometry and partition listings in the same format as
//! `rkdeveloptool` and writes real files on `read_chunk`, so a complete
//! backup can be exercised without hardware.
//!
//! Device contents are generated from the byte offset, nothing is held in
//! memory. [`DummyTool::expected`] returns the bytes a read should produce.

use rkbackup_core::{FlashTool, ToolError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Errors in dummy tool options
#[derive(Debug, Error)]
pub enum DummyError {
    /// Option value could not be parsed
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Option name
        name: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// A partition on the emulated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyPartition {
    /// Partition name
    pub name: String,
    /// First sector
    pub start_sector: u64,
    /// Last sector (inclusive)
    pub end_sector: u64,
}

impl DummyPartition {
    /// Create a partition entry
    pub fn new(name: impl Into<String>, start_sector: u64, end_sector: u64) -> Self {
        Self {
            name: name.into(),
            start_sector,
            end_sector,
        }
    }
}

/// Configuration for the emulated device
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Bytes per sector
    pub sector_size: u64,
    /// Number of sectors, total size must be a whole number of MiB
    pub sector_count: u64,
    /// Reported page size in KB
    pub page_size_kb: u64,
    /// Partition list, in device order
    pub partitions: Vec<DummyPartition>,
    /// Fail the read with this 0-based number
    pub fail_read: Option<usize>,
}

impl Default for DummyConfig {
    /// 128 MiB device with 512-byte sectors and a PineNote-like layout
    fn default() -> Self {
        Self::with_size_mib(128)
    }
}

impl DummyConfig {
    /// Device of `size_mib` MiB; the last partition (`userdata`) takes
    /// whatever is left after 50 MiB of fixed partitions
    pub fn with_size_mib(size_mib: u64) -> Self {
        let sector_size = 512;
        let sector_count = size_mib * MIB / sector_size;
        let mut partitions = vec![
            DummyPartition::new("uboot", 16384, 24575),
            DummyPartition::new("waveform", 24576, 32767),
            DummyPartition::new("misc", 32768, 36863),
            DummyPartition::new("boot", 36864, 102399),
        ];
        if sector_count > 102400 {
            partitions.push(DummyPartition::new("userdata", 102400, sector_count - 1));
        }
        Self {
            sector_size,
            sector_count,
            page_size_kb: 2,
            partitions,
            fail_read: None,
        }
    }

    /// Total size in bytes
    pub fn total_bytes(&self) -> u64 {
        self.sector_size * self.sector_count
    }
}

/// Parse dummy options from the tool string
///
/// - `size=<MiB>` - device size, at least 64
/// - `fail=<n>` - make the n-th read (0-based) fail
pub fn parse_options(options: &[(&str, &str)]) -> Result<DummyConfig, DummyError> {
    let mut size_mib = 128;
    let mut fail_read = None;

    for &(key, value) in options {
        match key {
            "size" => {
                size_mib = value
                    .parse()
                    .ok()
                    .filter(|&mib: &u64| mib >= 64)
                    .ok_or_else(|| DummyError::InvalidParameter {
                        name: "size",
                        message: format!("'{}' is not a size in MiB of at least 64", value),
                    })?;
            }
            "fail" => {
                fail_read = Some(value.parse().map_err(|_| DummyError::InvalidParameter {
                    name: "fail",
                    message: format!("'{}' is not a read number", value),
                })?);
            }
            _ => {
                log::warn!("Unknown dummy option: {}={}", key, value);
            }
        }
    }

    let mut config = DummyConfig::with_size_mib(size_mib);
    config.fail_read = fail_read;
    Ok(config)
}

/// A read issued to the emulated device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyRead {
    /// First sector
    pub start_sector: u64,
    /// Bytes requested
    pub size_bytes: u64,
    /// File written
    pub destination: PathBuf,
}

/// Emulated flashing tool
pub struct DummyTool {
    config: DummyConfig,
    reads: Vec<DummyRead>,
}

impl DummyTool {
    /// Create a tool for the given device
    pub fn new(config: DummyConfig) -> Self {
        log::info!(
            "Dummy device: {} sectors of {} bytes, {} partitions",
            config.sector_count,
            config.sector_size,
            config.partitions.len()
        );
        Self {
            config,
            reads: Vec::new(),
        }
    }

    /// Create a tool for the default 128 MiB device
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Reads issued so far, in order
    pub fn reads(&self) -> &[DummyRead] {
        &self.reads
    }

    /// Content of the device byte at `offset`
    pub fn byte_at(&self, offset: u64) -> u8 {
        let sector = offset / self.config.sector_size;
        (sector as u8) ^ ((offset % self.config.sector_size) as u8).rotate_left(3)
    }

    /// Bytes a read of `size_bytes` at `start_sector` should produce
    pub fn expected(&self, start_sector: u64, size_bytes: u64) -> Vec<u8> {
        let start = start_sector * self.config.sector_size;
        (start..start + size_bytes).map(|o| self.byte_at(o)).collect()
    }

    /// Text `read-flash-info` would print
    pub fn geometry_text(&self) -> String {
        let c = &self.config;
        format!(
            "Flash Info:\n\
             \tManufacturer: SAMSUNG, value=00\n\
             \tFlash Size: {} MB\n\
             \tFlash Size: {} Sectors\n\
             \tBlock Size: {} KB\n\
             \tPage Size: {} KB\n\
             \tECC Bits: 0\n\
             \tAccess Time: 40\n\
             \tFlash CS: Flash<0>\n",
            c.total_bytes() / MIB,
            c.sector_count,
            c.sector_size,
            c.page_size_kb
        )
    }

    /// Text `list-partitions` would print
    pub fn partitions_text(&self) -> String {
        let mut text =
            String::from("#   LBA start (sectors)  LBA end (sectors)  Size (bytes)       Name\n");
        for (i, p) in self.config.partitions.iter().enumerate() {
            let bytes = (p.end_sector - p.start_sector + 1) * self.config.sector_size;
            text.push_str(&format!(
                "{:02}{:>22}{:>19}{:>17}       {}\n",
                i, p.start_sector, p.end_sector, bytes, p.name
            ));
        }
        text
    }

    fn write_image(
        &self,
        start_sector: u64,
        size_bytes: u64,
        destination: &Path,
    ) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(destination)?);
        let start = start_sector * self.config.sector_size;
        let mut buf = Vec::with_capacity(64 * 1024);
        let mut offset = start;
        while offset < start + size_bytes {
            let n = (start + size_bytes - offset).min(64 * 1024);
            buf.clear();
            buf.extend((offset..offset + n).map(|o| self.byte_at(o)));
            out.write_all(&buf)?;
            offset += n;
        }
        out.flush()
    }
}

impl FlashTool for DummyTool {
    fn query_geometry(&mut self) -> Result<String, ToolError> {
        Ok(self.geometry_text())
    }

    fn query_partitions(&mut self) -> Result<String, ToolError> {
        Ok(self.partitions_text())
    }

    fn read_chunk(
        &mut self,
        start_sector: u64,
        size_bytes: u64,
        destination: &Path,
    ) -> Result<(), ToolError> {
        let command = format!(
            "dummy read {} {} {}",
            start_sector,
            size_bytes,
            destination.display()
        );
        log::debug!("{}", command);

        let failed = |output: String| ToolError::ExecutionFailed {
            command: command.clone(),
            output,
        };

        if self.config.fail_read == Some(self.reads.len()) {
            return Err(failed("Read LBA failed!".to_string()));
        }
        let end = start_sector * self.config.sector_size + size_bytes;
        if end > self.config.total_bytes() {
            return Err(failed(format!(
                "read past end of device ({} > {} bytes)",
                end,
                self.config.total_bytes()
            )));
        }

        self.write_image(start_sector, size_bytes, destination)
            .map_err(|e| failed(format!("writing {}: {}", destination.display(), e)))?;

        self.reads.push(DummyRead {
            start_sector,
            size_bytes,
            destination: destination.to_path_buf(),
        });
        Ok(())
    }
}
