//! Device access through the vendor flashing tool

use crate::error::ToolError;
use std::path::Path;

/// Command interface of the flashing tool
///
/// The tool accepts one command at a time. Every call blocks until the
/// command has finished; there is no timeout.
///
/// # Example
///
/// ```ignore
/// use rkbackup_core::{parse_geometry, FlashTool};
///
/// fn sector_size<T: FlashTool>(tool: &mut T) -> rkbackup_core::Result<u64> {
///     let text = tool.query_geometry()?;
///     Ok(parse_geometry(&text)?.block_size_bytes())
/// }
/// ```
pub trait FlashTool {
    /// Raw text describing the flash geometry
    fn query_geometry(&mut self) -> Result<String, ToolError>;

    /// Raw text listing the partitions
    fn query_partitions(&mut self) -> Result<String, ToolError>;

    /// Read `size_bytes` starting at `start_sector` into a new file
    fn read_chunk(
        &mut self,
        start_sector: u64,
        size_bytes: u64,
        destination: &Path,
    ) -> Result<(), ToolError>;
}

impl<T: FlashTool + ?Sized> FlashTool for Box<T> {
    fn query_geometry(&mut self) -> Result<String, ToolError> {
        (**self).query_geometry()
    }

    fn query_partitions(&mut self) -> Result<String, ToolError> {
        (**self).query_partitions()
    }

    fn read_chunk(
        &mut self,
        start_sector: u64,
        size_bytes: u64,
        destination: &Path,
    ) -> Result<(), ToolError> {
        (**self).read_chunk(start_sector, size_bytes, destination)
    }
}
