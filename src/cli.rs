//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use rkbackup_core::{DEFAULT_DISK_NAME, LEADING_REGION_NAME};

/// Name skipped by `--skip-userdata-partition`
pub const USERDATA_PARTITION: &str = "userdata";

/// Parse a byte count: decimal, hex, or with a K/M/G (KiB/MiB/GiB) suffix
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();

    if let Ok(n) = s.parse::<u64>() {
        return Ok(n);
    }

    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        return u64::from_str_radix(hex.trim(), 16)
            .map_err(|e| format!("Invalid hex value: {}", e));
    }

    let s_lower = s.to_lowercase();
    let units: [(&str, u64); 9] = [
        ("gib", 1 << 30),
        ("mib", 1 << 20),
        ("kib", 1 << 10),
        ("gb", 1 << 30),
        ("mb", 1 << 20),
        ("kb", 1 << 10),
        ("g", 1 << 30),
        ("m", 1 << 20),
        ("k", 1 << 10),
    ];
    let (num_str, multiplier) = units
        .iter()
        .find_map(|(suffix, mult)| s_lower.strip_suffix(suffix).map(|n| (n.trim(), *mult)))
        .ok_or_else(|| format!("Invalid size: {}", s))?;

    let num: u64 = num_str.parse().map_err(|_| format!("Invalid size: {}", s))?;
    num.checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: {}", s))
}

#[derive(Parser)]
#[command(name = "rkbackup")]
#[command(author, version, about = "Back up device flash through rkdeveloptool", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Tool backend, "name" or "name:key=value,..." (see list-tools)
    #[arg(short = 'p', long, global = true, default_value = "rkdeveloptool")]
    pub tool: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// What to back up
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackupType {
    /// Each partition into its own file(s)
    Partitions,
    /// Every byte of the device, including the partition table
    Disk,
}

/// Options of the backup command
#[derive(clap::Args, Debug, Clone)]
pub struct BackupArgs {
    /// Type of backup
    #[arg(short = 't', long = "type", value_enum)]
    pub backup_type: BackupType,

    /// Maximum bytes per read; larger partitions/disks are split into
    /// several files to stay under the tool's 2GB limit
    #[arg(short = 'b', long, alias = "block-size", default_value = "1GiB", value_parser = parse_size)]
    pub chunk_size: u64,

    /// Prefix prepended to every output file name (e.g. "backup/")
    #[arg(short, long, default_value = "")]
    pub destination: String,

    /// Base name of the image in disk mode
    #[arg(long, default_value = DEFAULT_DISK_NAME)]
    pub disk_name: String,

    /// Partition mode only: skip the bytes before the first partition
    #[arg(long)]
    pub skip_partition_table: bool,

    /// Skip the partition named 'userdata'; it is large and Android can recreate it
    #[arg(short = 'u', long)]
    pub skip_userdata_partition: bool,

    /// Skip these partitions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Print the reads instead of performing them
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl BackupArgs {
    /// All partition names to skip
    pub fn skip_names(&self) -> Vec<String> {
        let mut names = self.skip.clone();
        if self.skip_partition_table {
            names.push(LEADING_REGION_NAME.to_string());
        }
        if self.skip_userdata_partition {
            names.push(USERDATA_PARTITION.to_string());
        }
        names
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Back up the device flash
    Backup(BackupArgs),

    /// Show flash geometry and partition table
    Info,

    /// List compiled-in tool backends
    ListTools,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("0x1000").unwrap(), 4096);
        assert_eq!(parse_size("1GiB").unwrap(), 1 << 30);
        assert_eq!(parse_size("512 MiB").unwrap(), 512 << 20);
        assert_eq!(parse_size("64k").unwrap(), 64 << 10);
        assert_eq!(parse_size("2G").unwrap(), 2 << 30);
        assert!(parse_size("lots").is_err());
    }

    #[test]
    fn test_backup_args() {
        let cli = Cli::try_parse_from([
            "rkbackup",
            "backup",
            "-t",
            "partitions",
            "-u",
            "--skip-partition-table",
            "--skip",
            "misc,cache",
            "-b",
            "512M",
            "-d",
            "out/",
        ])
        .unwrap();
        let Commands::Backup(args) = cli.command else {
            panic!("expected backup command");
        };
        assert_eq!(args.backup_type, BackupType::Partitions);
        assert_eq!(args.chunk_size, 512 << 20);
        assert_eq!(args.destination, "out/");
        assert_eq!(args.disk_name, DEFAULT_DISK_NAME);
        assert_eq!(
            args.skip_names(),
            ["misc", "cache", LEADING_REGION_NAME, USERDATA_PARTITION]
        );
        assert_eq!(cli.tool, "rkdeveloptool");
    }

    #[test]
    fn test_type_required() {
        assert!(Cli::try_parse_from(["rkbackup", "backup"]).is_err());
    }
}
