//! Info command: show what a backup would see

use super::{geometry_lines, partition_lines};
use rkbackup_core::{parse_geometry, parse_partitions, FlashTool};
use std::collections::BTreeSet;

/// Print geometry and partition table without reading any data
pub fn run_info(tool: &mut dyn FlashTool) -> Result<(), Box<dyn std::error::Error>> {
    let geometry = parse_geometry(&tool.query_geometry()?)?;
    for line in geometry_lines(&geometry) {
        println!("{}", line);
    }
    println!();

    let table = parse_partitions(
        &tool.query_partitions()?,
        geometry.block_size_bytes(),
        &BTreeSet::new(),
    )?;
    for line in partition_lines(&table) {
        println!("{}", line);
    }
    println!();
    println!(
        "{} partition(s), {} bytes",
        table.len(),
        table.total_selected_bytes()
    );

    Ok(())
}
