//! Flash geometry as reported by `read-flash-info`
//!
//! The tool prints a short block of labeled lines:
//!
//! ```text
//! Flash Info:
//!     Manufacturer: SAMSUNG, value=00
//!     Flash Size: 119276 MB
//!     Flash Size: 244277248 Sectors
//!     Block Size: 512 KB
//!     Page Size: 2 KB
//! ```
//!
//! Although the block size is labeled "KB", the number is the size of one
//! addressable sector in bytes. The consistency check below relies on that.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;

static SIZE_MB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Flash\s+Size:\s+([0-9]+)\s*MB").expect("valid regex"));
static SECTORS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Flash\s+Size:\s+([0-9]+)\s*Sectors").expect("valid regex"));
static BLOCK_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Block\s+Size:\s+([0-9]+)\s*KB").expect("valid regex"));
static PAGE_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Page\s+Size:\s+([0-9]+)\s*KB").expect("valid regex"));

/// Device flash geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashGeometry {
    /// Total size in MB
    pub size_mb: u64,
    /// Total number of addressable sectors
    pub sector_count: u64,
    /// Value of the "Block Size" line
    pub block_size: u64,
    /// Value of the "Page Size" line, in KB
    pub page_size_kb: u64,
}

impl FlashGeometry {
    /// Build a geometry from its four numbers, checking that they add up
    pub fn new(
        size_mb: u64,
        sector_count: u64,
        block_size: u64,
        page_size_kb: u64,
    ) -> Result<Self, ParseError> {
        let geometry = Self {
            size_mb,
            sector_count,
            block_size,
            page_size_kb,
        };
        if !geometry.is_consistent() {
            return Err(ParseError::GeometryInconsistent {
                size_mb,
                sector_count,
                block_size_bytes: block_size,
            });
        }
        Ok(geometry)
    }

    /// Bytes per sector; every read is a whole multiple of this
    pub fn block_size_bytes(&self) -> u64 {
        self.block_size
    }

    /// Total device size in bytes
    pub fn total_bytes(&self) -> u64 {
        self.sector_count * self.block_size_bytes()
    }

    /// Index of the last sector
    pub fn last_sector(&self) -> u64 {
        self.sector_count.saturating_sub(1)
    }

    fn is_consistent(&self) -> bool {
        if self.sector_count == 0 || self.block_size == 0 {
            return false;
        }
        let by_size = self.size_mb.checked_mul(1024 * 1024);
        let by_sectors = self.sector_count.checked_mul(self.block_size);
        matches!((by_size, by_sectors), (Some(a), Some(b)) if a == b)
    }
}

/// Parse the output of `read-flash-info`
///
/// Lines may come in any order; a repeated label overrides the earlier value.
pub fn parse_geometry(text: &str) -> Result<FlashGeometry, ParseError> {
    let mut size_mb = None;
    let mut sector_count = None;
    let mut block_size = None;
    let mut page_size_kb = None;

    for line in text.lines() {
        if let Some(v) = capture_number(&SIZE_MB_RE, line) {
            size_mb = Some(v);
        }
        if let Some(v) = capture_number(&SECTORS_RE, line) {
            sector_count = Some(v);
        }
        if let Some(v) = capture_number(&BLOCK_SIZE_RE, line) {
            block_size = Some(v);
        }
        if let Some(v) = capture_number(&PAGE_SIZE_RE, line) {
            page_size_kb = Some(v);
        }
    }

    let missing = |field: &'static str| ParseError::FieldMissing {
        field,
        text: text.to_string(),
    };

    let geometry = FlashGeometry::new(
        size_mb.ok_or_else(|| missing("Flash Size (MB)"))?,
        sector_count.ok_or_else(|| missing("Flash Size (Sectors)"))?,
        block_size.ok_or_else(|| missing("Block Size"))?,
        page_size_kb.ok_or_else(|| missing("Page Size"))?,
    )?;

    log::debug!(
        "Flash geometry: {} MB, {} sectors of {} bytes, page {} KB",
        geometry.size_mb,
        geometry.sector_count,
        geometry.block_size_bytes(),
        geometry.page_size_kb
    );

    Ok(geometry)
}

fn capture_number(re: &Regex, line: &str) -> Option<u64> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
