//! Splitting sector ranges into bounded reads
//!
//! The flashing tool cannot transfer more than about 2 GB per invocation, so
//! large ranges are read as several chunks, each written to its own file.

use crate::error::PlanError;

/// One read request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDescriptor {
    /// Position within its range, starting at 0
    pub sequence: u64,
    /// First sector to read
    pub start_sector: u64,
    /// Number of bytes to read, a whole multiple of the block size
    pub size_bytes: u64,
    /// File name the chunk is written to (without destination prefix)
    pub output_name: String,
}

impl ChunkDescriptor {
    /// Number of sectors covered by this chunk
    pub fn sector_count(&self, block_size_bytes: u64) -> u64 {
        self.size_bytes / block_size_bytes
    }
}

/// Round a maximum chunk size down to whole blocks
pub fn round_chunk_size(max_chunk_bytes: u64, block_size_bytes: u64) -> Result<u64, PlanError> {
    if block_size_bytes == 0 {
        return Err(PlanError::ZeroBlockSize);
    }
    let rounded = max_chunk_bytes / block_size_bytes * block_size_bytes;
    if rounded == 0 {
        return Err(PlanError::ChunkSizeTooSmall {
            max_chunk_bytes,
            block_size_bytes,
        });
    }
    Ok(rounded)
}

/// Lazily generated reads covering one sector range
///
/// Chunk descriptors are produced on demand, so a range split into millions
/// of reads does not need memory for all of them at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunks {
    base_name: String,
    start_sector: u64,
    block_size_bytes: u64,
    chunk_limit: u64,
    total_bytes: u64,
    offset: u64,
    sequence: u64,
}

impl Chunks {
    /// Bytes covered by the whole range
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Number of chunks the whole range is split into
    pub fn chunk_count(&self) -> u64 {
        self.total_bytes.div_ceil(self.chunk_limit)
    }

    fn split(&self) -> bool {
        self.total_bytes > self.chunk_limit
    }
}

impl Iterator for Chunks {
    type Item = ChunkDescriptor;

    fn next(&mut self) -> Option<ChunkDescriptor> {
        if self.offset >= self.total_bytes {
            return None;
        }
        let size_bytes = (self.total_bytes - self.offset).min(self.chunk_limit);
        let output_name = if self.split() {
            format!("{}.{:04}", self.base_name, self.sequence)
        } else {
            self.base_name.clone()
        };
        let chunk = ChunkDescriptor {
            sequence: self.sequence,
            start_sector: self.start_sector + self.offset / self.block_size_bytes,
            size_bytes,
            output_name,
        };
        self.offset += size_bytes;
        self.sequence += 1;
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.total_bytes - self.offset).div_ceil(self.chunk_limit);
        match usize::try_from(left) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Split `start_sector..=end_sector` into reads of at most `max_chunk_bytes`
///
/// A range that fits into one read keeps `base_name`; otherwise every chunk
/// is named `base_name.NNNN` with a zero-padded sequence number. All checks
/// happen here; iterating the result cannot fail.
pub fn plan_chunks(
    start_sector: u64,
    end_sector: u64,
    block_size_bytes: u64,
    max_chunk_bytes: u64,
    base_name: &str,
) -> Result<Chunks, PlanError> {
    if end_sector < start_sector {
        return Err(PlanError::InvalidRange {
            start_sector,
            end_sector,
        });
    }
    let chunk_limit = round_chunk_size(max_chunk_bytes, block_size_bytes)?;

    let total_bytes = (end_sector - start_sector)
        .checked_add(1)
        .and_then(|sectors| sectors.checked_mul(block_size_bytes))
        .ok_or(PlanError::RangeTooLarge {
            start_sector,
            end_sector,
            block_size_bytes,
        })?;

    Ok(Chunks {
        base_name: base_name.to_string(),
        start_sector,
        block_size_bytes,
        chunk_limit,
        total_bytes,
        offset: 0,
        sequence: 0,
    })
}
