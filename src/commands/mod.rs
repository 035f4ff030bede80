//! CLI command implementations
//!
//! Commands receive an opened `FlashTool` and do their own printing; exit
//! codes are decided in `main`.

pub mod backup;
pub mod info;
mod list;

pub use list::list_tools;

use rkbackup_core::{FlashGeometry, PartitionTable};

/// Format a byte count with a binary unit
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.1} GiB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}

/// Lines describing the flash geometry
pub fn geometry_lines(geometry: &FlashGeometry) -> Vec<String> {
    vec![
        format!(
            "Flash size: {} MB ({} sectors of {} bytes)",
            geometry.size_mb,
            geometry.sector_count,
            geometry.block_size_bytes()
        ),
        format!("Page size:  {} KB", geometry.page_size_kb),
    ]
}

/// Lines listing every partition in device order, skipped ones marked
pub fn partition_lines(table: &PartitionTable) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>3}  {:>12} {:>12} {:>12}  {}",
        "#", "Start", "End", "Size", "Name"
    )];
    for (record, skipped) in table.listing() {
        lines.push(format!(
            "{:>3}  {:>12} {:>12} {:>12}  {}{}",
            record.index.to_string(),
            record.start_sector,
            record.end_sector,
            format_size(record.byte_length),
            record.name,
            if skipped { " SKIPPED!" } else { "" }
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rkbackup_core::{parse_geometry, parse_partitions};
    use std::collections::BTreeSet;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(4096), "4 KiB");
        assert_eq!(format_size(4 << 20), "4 MiB");
        assert_eq!(format_size(3 << 29), "1.5 GiB");
    }

    #[test]
    fn test_partition_lines_mark_skipped() {
        let text = "# LBA start (sectors) LBA end (sectors) Size (bytes) Name\n\
                    0 2048 4095 1048576 uboot\n\
                    1 4096 8191 2097152 userdata\n";
        let skip: BTreeSet<String> = ["userdata".to_string()].into();
        let table = parse_partitions(text, 512, &skip).unwrap();
        let lines = partition_lines(&table);
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("---"));
        assert!(lines[1].ends_with("data_at_beginning"));
        assert!(lines[2].ends_with("uboot"));
        assert!(lines[3].ends_with("userdata SKIPPED!"));
    }

    #[test]
    fn test_geometry_lines() {
        let geometry = parse_geometry(
            "Flash Size: 128 MB\nFlash Size: 262144 Sectors\nBlock Size: 512 KB\nPage Size: 2 KB\n",
        )
        .unwrap();
        assert_eq!(
            geometry_lines(&geometry)[0],
            "Flash size: 128 MB (262144 sectors of 512 bytes)"
        );
    }
}
