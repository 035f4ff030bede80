//! Backup command implementation

use super::{format_size, geometry_lines, partition_lines};
use crate::cli::{BackupArgs, BackupType};
use indicatif::{ProgressBar, ProgressStyle};
use rkbackup_core::{
    Backup, BackupConfig, BackupMode, BackupOutcome, BackupPlan, BackupProgress, CancelToken,
    ChunkDescriptor, FlashGeometry, FlashTool, PartitionTable, ProgressReport,
};
use std::collections::BTreeSet;
use std::path::Path;

/// Build the core configuration from command-line options
pub fn backup_config(args: &BackupArgs) -> BackupConfig {
    let mode = match args.backup_type {
        BackupType::Disk => BackupMode::Disk,
        BackupType::Partitions => BackupMode::Partitions,
    };
    let mut config = BackupConfig::new(mode);
    config.max_chunk_bytes = args.chunk_size;
    config.destination_prefix = args.destination.clone();
    config.disk_name = args.disk_name.clone();
    config.skip = args.skip_names().into_iter().collect::<BTreeSet<_>>();
    config.dry_run = args.dry_run;
    config
}

/// Status line printed before each read
pub fn status_line(chunk: &ChunkDescriptor, destination: &Path, report: &ProgressReport) -> String {
    format!(
        "Reading {:>12} bytes from sector {:>9} to {:<15} done: {:>2.0}% eta. {}",
        chunk.size_bytes,
        chunk.start_sector,
        destination.display().to_string(),
        report.percent,
        report.eta
    )
}

/// Run a backup and print progress to the terminal
pub fn run_backup(
    tool: &mut dyn FlashTool,
    args: &BackupArgs,
    cancel: &CancelToken,
) -> Result<BackupOutcome, Box<dyn std::error::Error>> {
    let mut backup = Backup::new(backup_config(args));
    let mut progress = IndicatifProgress::new();

    let outcome = backup.run(tool, &mut progress, cancel)?;

    if let BackupOutcome::Cancelled { .. } = outcome {
        eprintln!();
        eprintln!("Backup cancelled, the last files written are complete but the set is not.");
        eprintln!("The device may need a power cycle before it returns to download mode.");
    }
    Ok(outcome)
}

/// Terminal progress: status lines above an indicatif bar
struct IndicatifProgress {
    pb: Option<ProgressBar>,
}

impl IndicatifProgress {
    fn new() -> Self {
        Self { pb: None }
    }

    fn println(&self, line: String) {
        match &self.pb {
            // println() on a hidden bar drops the line, suspend() does not
            Some(pb) => pb.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }
}

impl BackupProgress for IndicatifProgress {
    fn geometry(&mut self, geometry: &FlashGeometry) {
        for line in geometry_lines(geometry) {
            self.println(line);
        }
        self.println(String::new());
    }

    fn partitions(&mut self, table: &PartitionTable) {
        for line in partition_lines(table) {
            self.println(line);
        }
        self.println(String::new());
    }

    fn reading(&mut self, plan: &BackupPlan) {
        let pb = ProgressBar::new(plan.total_bytes);
        // Fall back to the default style if the template is rejected
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        self.pb = Some(pb);
    }

    fn chunk_started(
        &mut self,
        chunk: &ChunkDescriptor,
        destination: &Path,
        report: &ProgressReport,
    ) {
        self.println(status_line(chunk, destination, report));
    }

    fn dry_run(&mut self, chunk: &ChunkDescriptor, destination: &Path) {
        self.println(format!(
            "    would read {} bytes from sector {} into {}",
            chunk.size_bytes,
            chunk.start_sector,
            destination.display()
        ));
    }

    fn chunk_done(&mut self, _chunk: &ChunkDescriptor, transferred: u64) {
        if let Some(pb) = &self.pb {
            pb.set_position(transferred);
        }
    }

    fn finished(&mut self, outcome: &BackupOutcome) {
        let message = match *outcome {
            BackupOutcome::Completed { chunks, bytes } => format!(
                "Backup complete: {} file(s), {}",
                chunks,
                format_size(bytes)
            ),
            BackupOutcome::Cancelled {
                chunks,
                bytes,
                total_bytes,
            } => format!(
                "Backup cancelled: {} file(s), {} of {}",
                chunks,
                format_size(bytes),
                format_size(total_bytes)
            ),
        };
        match self.pb.take() {
            Some(pb) if outcome.is_completed() => pb.finish_with_message(message.clone()),
            Some(pb) => pb.abandon_with_message(message.clone()),
            None => {}
        }
        println!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use rkbackup_core::{Eta, LEADING_REGION_NAME};

    fn backup_args(argv: &[&str]) -> BackupArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Backup(args) => args,
            _ => panic!("expected backup command"),
        }
    }

    #[test]
    fn test_backup_config() {
        let args = backup_args(&[
            "rkbackup",
            "backup",
            "-t",
            "disk",
            "-b",
            "64M",
            "-d",
            "pn_",
            "--skip-partition-table",
            "-n",
        ]);
        let config = backup_config(&args);
        assert_eq!(config.mode, BackupMode::Disk);
        assert_eq!(config.max_chunk_bytes, 64 << 20);
        assert!(config.dry_run);
        assert!(config.skip.contains(LEADING_REGION_NAME));
        assert_eq!(
            config.destination_for("all_flash.0000"),
            Path::new("pn_all_flash.0000")
        );
    }

    #[test]
    fn test_status_line() {
        let chunk = ChunkDescriptor {
            sequence: 1,
            start_sector: 2048,
            size_bytes: 1048576,
            output_name: "00_uboot".to_string(),
        };
        let report = ProgressReport {
            percent: 50.0,
            eta: Eta::Remaining(75),
        };
        assert_eq!(
            status_line(&chunk, Path::new("00_uboot"), &report),
            "Reading      1048576 bytes from sector      2048 to 00_uboot        done: 50% eta. 1m:15s"
        );

        let report = ProgressReport {
            percent: 0.0,
            eta: Eta::Unknown,
        };
        assert!(status_line(&chunk, Path::new("00_uboot"), &report)
            .ends_with("done:  0% eta. N/A"));
    }
}
