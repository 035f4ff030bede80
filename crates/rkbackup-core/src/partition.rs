//! Partition table as reported by `list-partitions`
//!
//! ```text
//! #   LBA start (sectors)  LBA end (sectors)  Size (bytes)       Name
//! 00                 16384              24575          4194304       uboot
//! 01                 24576              32767          4194304       waveform
//! ```
//!
//! The listing does not include the area in front of the first partition
//! (GPT, loader). It is synthesized as a record of its own so a partition
//! backup still captures every byte up to the last partition.

use crate::error::ParseError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

/// Name of the synthesized region in front of the first partition
pub const LEADING_REGION_NAME: &str = "data_at_beginning";

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"#\s+LBA\s+start\s+\(sectors\)\s+LBA\s+end\s+\(sectors\)\s+Size\s+\(bytes\)\s+Name",
    )
    .expect("valid regex")
});
static LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+(\w+)\s*$").expect("valid regex"));

/// Where a partition record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionIndex {
    /// Region before the first partition, not listed by the device
    Leading,
    /// Partition with this device index
    Device(u32),
}

impl fmt::Display for PartitionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leading => write!(f, "---"),
            Self::Device(index) => write!(f, "{:03}", index),
        }
    }
}

/// A named sector range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionRecord {
    /// Device index or the leading-region tag
    pub index: PartitionIndex,
    /// Partition name
    pub name: String,
    /// First sector
    pub start_sector: u64,
    /// Last sector (inclusive)
    pub end_sector: u64,
    /// Size in bytes as reported
    pub byte_length: u64,
}

impl PartitionRecord {
    /// Base name for the image file(s) of this record
    ///
    /// Device partitions get their two-digit index as prefix (`03_boot`),
    /// the leading region keeps its bare name.
    pub fn output_base_name(&self) -> String {
        match self.index {
            PartitionIndex::Leading => self.name.clone(),
            PartitionIndex::Device(index) => format!("{:02}_{}", index, self.name),
        }
    }

    /// Number of sectors covered
    pub fn sector_count(&self) -> u64 {
        self.end_sector - self.start_sector + 1
    }
}

/// Parsed partition listing with the skip set applied
#[derive(Debug, Clone, Default)]
pub struct PartitionTable {
    records: Vec<PartitionRecord>,
    skipped: Vec<PartitionRecord>,
    skip_set: BTreeSet<String>,
    total_selected_bytes: u64,
}

impl PartitionTable {
    /// Records selected for backup, in device order (leading region first)
    pub fn records(&self) -> &[PartitionRecord] {
        &self.records
    }

    /// Records excluded by the skip set, for display only
    pub fn skipped(&self) -> &[PartitionRecord] {
        &self.skipped
    }

    /// Sum of the byte lengths of all selected records
    pub fn total_selected_bytes(&self) -> u64 {
        self.total_selected_bytes
    }

    /// Check whether a name is excluded
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skip_set.contains(name)
    }

    /// Number of selected records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record is selected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in listing order, each paired with whether it is skipped
    pub fn listing(&self) -> Vec<(&PartitionRecord, bool)> {
        let mut all: Vec<_> = self
            .records
            .iter()
            .map(|r| (r, false))
            .chain(self.skipped.iter().map(|r| (r, true)))
            .collect();
        all.sort_by_key(|(r, _)| (r.start_sector, r.index));
        all
    }

    /// Add a record; `None` if the selected total would overflow
    fn add(&mut self, record: PartitionRecord) -> Option<()> {
        if self.skip_set.contains(&record.name) {
            log::debug!("Skipping partition '{}'", record.name);
            self.skipped.push(record);
        } else {
            self.total_selected_bytes =
                self.total_selected_bytes.checked_add(record.byte_length)?;
            self.records.push(record);
        }
        Some(())
    }
}

/// Parse the output of `list-partitions`
///
/// Parsing is all-or-nothing: one unrecognized line fails the whole table.
pub fn parse_partitions(
    text: &str,
    block_size_bytes: u64,
    skip_set: &BTreeSet<String>,
) -> Result<PartitionTable, ParseError> {
    let mut lines = text.lines();

    let header_ok = lines.next().is_some_and(|header| HEADER_RE.is_match(header));
    if !header_ok {
        return Err(ParseError::HeaderUnrecognized {
            text: text.to_string(),
        });
    }

    let mut table = PartitionTable {
        skip_set: skip_set.clone(),
        ..Default::default()
    };

    for (i, line) in lines.enumerate() {
        let mismatch = || ParseError::LinePatternMismatch {
            line_number: i + 2,
            line: line.to_string(),
        };

        let caps = LINE_RE.captures(line).ok_or_else(mismatch)?;
        let number = |n: usize| caps[n].parse::<u64>().map_err(|_| mismatch());

        let index = u32::try_from(number(1)?).map_err(|_| mismatch())?;
        let start_sector = number(2)?;
        let end_sector = number(3)?;
        let byte_length = number(4)?;
        let name = caps[5].to_string();

        // The range must be addressable in bytes
        if end_sector < start_sector {
            return Err(mismatch());
        }
        (end_sector - start_sector)
            .checked_add(1)
            .and_then(|sectors| sectors.checked_mul(block_size_bytes))
            .ok_or_else(mismatch)?;

        if index == 0 && start_sector > 0 {
            let leading_bytes = block_size_bytes
                .checked_mul(start_sector)
                .ok_or_else(mismatch)?;
            table
                .add(PartitionRecord {
                    index: PartitionIndex::Leading,
                    name: LEADING_REGION_NAME.to_string(),
                    start_sector: 0,
                    end_sector: start_sector - 1,
                    byte_length: leading_bytes,
                })
                .ok_or_else(mismatch)?;
        }

        table
            .add(PartitionRecord {
                index: PartitionIndex::Device(index),
                name,
                start_sector,
                end_sector,
                byte_length,
            })
            .ok_or_else(mismatch)?;
    }

    log::debug!(
        "Parsed {} partitions ({} skipped), {} bytes selected",
        table.records.len(),
        table.skipped.len(),
        table.total_selected_bytes
    );

    Ok(table)
}
