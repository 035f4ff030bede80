//! Backup orchestration
//!
//! A [`Backup`] drives one run against a [`FlashTool`]:
//!
//! ```text
//! Idle -> GeometryKnown -> Planning -> Reading -> Completed
//!                                             \-> Cancelled
//! any step that fails                          -> Failed
//! ```
//!
//! Everything is validated before the first read, so a bad chunk size or an
//! unparsable partition table is reported without touching the device.
//! Individual chunks are only generated as they are read.
//! Cancellation is polled between chunks only; a read that has been issued
//! always runs to completion.

use crate::cancel::CancelToken;
use crate::chunk::{plan_chunks, round_chunk_size, ChunkDescriptor, Chunks};
use crate::error::{BackupError, Result};
use crate::geometry::{parse_geometry, FlashGeometry};
use crate::partition::{parse_partitions, PartitionTable};
use crate::progress::{ProgressReport, ProgressTracker};
use crate::tool::FlashTool;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Default upper bound for a single read (1 GiB)
pub const DEFAULT_MAX_CHUNK_BYTES: u64 = 1024 * 1024 * 1024;

/// Default base name of a whole-disk image
pub const DEFAULT_DISK_NAME: &str = "all_flash";

/// What to back up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupMode {
    /// Every sector of the device into one image
    Disk,
    /// One image per partition
    Partitions,
}

/// Settings for one backup run
#[derive(Debug, Clone)]
pub struct BackupConfig {
    /// Disk or partition backup
    pub mode: BackupMode,
    /// Upper bound for a single read, rounded down to whole sectors
    pub max_chunk_bytes: u64,
    /// Prepended verbatim to every output name (e.g. `backup/` or `pn_`)
    pub destination_prefix: String,
    /// Base name used in disk mode
    pub disk_name: String,
    /// Partition names to leave out
    pub skip: BTreeSet<String>,
    /// Report reads instead of performing them
    pub dry_run: bool,
}

impl BackupConfig {
    /// Configuration with default chunk size and naming
    pub fn new(mode: BackupMode) -> Self {
        Self {
            mode,
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            destination_prefix: String::new(),
            disk_name: DEFAULT_DISK_NAME.to_string(),
            skip: BTreeSet::new(),
            dry_run: false,
        }
    }

    /// Path a chunk is written to
    pub fn destination_for(&self, output_name: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", self.destination_prefix, output_name))
    }
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupState {
    /// Nothing done yet
    Idle,
    /// Geometry has been read and validated
    GeometryKnown,
    /// Building sector ranges and chunks
    Planning,
    /// Issuing reads
    Reading,
    /// Every chunk was read
    Completed,
    /// Stopped at a chunk boundary on request
    Cancelled,
    /// Stopped by an error
    Failed,
}

/// How a run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// Every planned chunk was read
    Completed {
        /// Chunks read
        chunks: u64,
        /// Bytes read
        bytes: u64,
    },
    /// Cancellation was observed before all chunks were read
    Cancelled {
        /// Chunks read before stopping
        chunks: u64,
        /// Bytes read before stopping
        bytes: u64,
        /// Bytes that were planned
        total_bytes: u64,
    },
}

impl BackupOutcome {
    /// Whether everything was read
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Ranges to read, in order, and their combined size
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupPlan {
    /// One entry per sector range, each yielding its chunks
    pub ranges: Vec<Chunks>,
    /// Denominator for progress
    pub total_bytes: u64,
}

impl BackupPlan {
    /// Number of reads across all ranges
    pub fn chunk_count(&self) -> u64 {
        self.ranges.iter().map(Chunks::chunk_count).sum()
    }

    /// Every chunk across all ranges, in read order
    pub fn chunks(&self) -> impl Iterator<Item = ChunkDescriptor> + '_ {
        self.ranges.iter().cloned().flatten()
    }
}

/// Progress callbacks for a backup run
pub trait BackupProgress {
    /// Geometry was read
    fn geometry(&mut self, geometry: &FlashGeometry);

    /// Partition table was read (partition mode only)
    fn partitions(&mut self, table: &PartitionTable);

    /// Planning finished, reading is about to start
    fn reading(&mut self, plan: &BackupPlan);

    /// A chunk is about to be read; `report` is the progress before it
    fn chunk_started(
        &mut self,
        chunk: &ChunkDescriptor,
        destination: &Path,
        report: &ProgressReport,
    );

    /// A chunk was skipped because this is a dry run
    fn dry_run(&mut self, chunk: &ChunkDescriptor, destination: &Path);

    /// A chunk finished; `transferred` is the running total
    fn chunk_done(&mut self, chunk: &ChunkDescriptor, transferred: u64);

    /// The run ended without error
    fn finished(&mut self, outcome: &BackupOutcome);
}

/// A progress sink that ignores everything
pub struct NoProgress;

impl BackupProgress for NoProgress {
    fn geometry(&mut self, _geometry: &FlashGeometry) {}
    fn partitions(&mut self, _table: &PartitionTable) {}
    fn reading(&mut self, _plan: &BackupPlan) {}
    fn chunk_started(
        &mut self,
        _chunk: &ChunkDescriptor,
        _destination: &Path,
        _report: &ProgressReport,
    ) {
    }
    fn dry_run(&mut self, _chunk: &ChunkDescriptor, _destination: &Path) {}
    fn chunk_done(&mut self, _chunk: &ChunkDescriptor, _transferred: u64) {}
    fn finished(&mut self, _outcome: &BackupOutcome) {}
}

/// One backup run
pub struct Backup {
    config: BackupConfig,
    state: BackupState,
    geometry: Option<FlashGeometry>,
    partitions: Option<PartitionTable>,
}

impl Backup {
    /// Prepare a run; nothing is sent to the device yet
    pub fn new(config: BackupConfig) -> Self {
        Self {
            config,
            state: BackupState::Idle,
            geometry: None,
            partitions: None,
        }
    }

    /// Current state
    pub fn state(&self) -> BackupState {
        self.state
    }

    /// Geometry, once known
    pub fn geometry(&self) -> Option<&FlashGeometry> {
        self.geometry.as_ref()
    }

    /// Partition table, once read (partition mode only)
    pub fn partitions(&self) -> Option<&PartitionTable> {
        self.partitions.as_ref()
    }

    /// Run the backup to the end
    ///
    /// Returns `Ok` for both completed and cancelled runs; any error leaves
    /// the run in [`BackupState::Failed`].
    pub fn run<T, P>(
        &mut self,
        tool: &mut T,
        progress: &mut P,
        cancel: &CancelToken,
    ) -> Result<BackupOutcome>
    where
        T: FlashTool + ?Sized,
        P: BackupProgress + ?Sized,
    {
        let result = self
            .plan(tool, progress)
            .and_then(|plan| self.read(tool, &plan, progress, cancel));

        match result {
            Ok(outcome) => {
                progress.finished(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                self.set_state(BackupState::Failed);
                Err(e)
            }
        }
    }

    /// Query the device and build the list of chunks to read
    pub fn plan<T, P>(&mut self, tool: &mut T, progress: &mut P) -> Result<BackupPlan>
    where
        T: FlashTool + ?Sized,
        P: BackupProgress + ?Sized,
    {
        let geometry = parse_geometry(&tool.query_geometry()?)?;
        self.geometry = Some(geometry);
        self.set_state(BackupState::GeometryKnown);
        progress.geometry(&geometry);

        self.set_state(BackupState::Planning);
        let block = geometry.block_size_bytes();
        let max_chunk = self.config.max_chunk_bytes;
        round_chunk_size(max_chunk, block)?;

        let plan = match self.config.mode {
            BackupMode::Disk => {
                log::info!("Planning backup of all {} sectors", geometry.sector_count);
                let range = plan_chunks(
                    0,
                    geometry.last_sector(),
                    block,
                    max_chunk,
                    &self.config.disk_name,
                )?;
                BackupPlan {
                    total_bytes: range.total_bytes(),
                    ranges: vec![range],
                }
            }
            BackupMode::Partitions => {
                let text = tool.query_partitions()?;
                let table = parse_partitions(&text, block, &self.config.skip)?;
                progress.partitions(&table);

                for record in table.skipped() {
                    log::info!("Skipping partition '{}'", record.name);
                }
                if table.is_empty() {
                    log::warn!("No partitions left to back up");
                }

                let mut ranges = Vec::with_capacity(table.len());
                for record in table.records() {
                    ranges.push(plan_chunks(
                        record.start_sector,
                        record.end_sector,
                        block,
                        max_chunk,
                        &record.output_base_name(),
                    )?);
                }
                let total_bytes = table.total_selected_bytes();
                self.partitions = Some(table);
                BackupPlan {
                    ranges,
                    total_bytes,
                }
            }
        };

        log::debug!(
            "Planned {} chunk(s) in {} range(s), {} bytes total",
            plan.chunk_count(),
            plan.ranges.len(),
            plan.total_bytes
        );
        Ok(plan)
    }

    fn read<T, P>(
        &mut self,
        tool: &mut T,
        plan: &BackupPlan,
        progress: &mut P,
        cancel: &CancelToken,
    ) -> Result<BackupOutcome>
    where
        T: FlashTool + ?Sized,
        P: BackupProgress + ?Sized,
    {
        self.set_state(BackupState::Reading);
        progress.reading(plan);

        let mut tracker = ProgressTracker::new(plan.total_bytes);
        let mut done = 0u64;
        for chunk in plan.chunks() {
            if cancel.is_cancelled() {
                log::warn!(
                    "Backup cancelled after {} of {} chunk(s)",
                    done,
                    plan.chunk_count()
                );
                self.set_state(BackupState::Cancelled);
                return Ok(BackupOutcome::Cancelled {
                    chunks: done,
                    bytes: tracker.transferred(),
                    total_bytes: plan.total_bytes,
                });
            }

            let destination = self.config.destination_for(&chunk.output_name);
            progress.chunk_started(&chunk, &destination, &tracker.report());

            if self.config.dry_run {
                progress.dry_run(&chunk, &destination);
            } else {
                tool.read_chunk(chunk.start_sector, chunk.size_bytes, &destination)
                    .map_err(|source| BackupError::ChunkReadFailed {
                        output_name: chunk.output_name.clone(),
                        start_sector: chunk.start_sector,
                        size_bytes: chunk.size_bytes,
                        source,
                    })?;
            }

            tracker.advance(chunk.size_bytes);
            done += 1;
            progress.chunk_done(&chunk, tracker.transferred());
        }

        self.set_state(BackupState::Completed);
        Ok(BackupOutcome::Completed {
            chunks: done,
            bytes: tracker.transferred(),
        })
    }

    fn set_state(&mut self, state: BackupState) {
        log::trace!("Backup state {:?} -> {:?}", self.state, state);
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, PlanError, ToolError};
    use crate::partition::LEADING_REGION_NAME;

    const GEOMETRY: &str = "Flash Size: 128 MB\nFlash Size: 262144 Sectors\nBlock Size: 512 KB\nPage Size: 2 KB\n";
    const PARTITIONS: &str = "# LBA start (sectors) LBA end (sectors) Size (bytes) Name
0 2048 4095 1048576 uboot
1 4096 8191 2097152 boot
2 8192 262143 129826816 userdata
";

    /// Scripted tool that records every read
    #[derive(Default)]
    struct FakeTool {
        reads: Vec<(u64, u64, PathBuf)>,
        fail_read: Option<usize>,
        cancel_after: Option<(usize, CancelToken)>,
        partitions: Option<String>,
        geometry: Option<String>,
        missing: bool,
        fail_partitions: bool,
    }

    impl FlashTool for FakeTool {
        fn query_geometry(&mut self) -> std::result::Result<String, ToolError> {
            if self.missing {
                return Err(ToolError::Unavailable {
                    command: "rkdeveloptool read-flash-info".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            Ok(self.geometry.clone().unwrap_or_else(|| GEOMETRY.to_string()))
        }

        fn query_partitions(&mut self) -> std::result::Result<String, ToolError> {
            if self.fail_partitions {
                return Err(ToolError::ExecutionFailed {
                    command: "rkdeveloptool list-partitions".to_string(),
                    output: "Creating Comm Object failed!".to_string(),
                });
            }
            Ok(self
                .partitions
                .clone()
                .unwrap_or_else(|| PARTITIONS.to_string()))
        }

        fn read_chunk(
            &mut self,
            start_sector: u64,
            size_bytes: u64,
            destination: &Path,
        ) -> std::result::Result<(), ToolError> {
            if self.fail_read == Some(self.reads.len()) {
                return Err(ToolError::ExecutionFailed {
                    command: "read".to_string(),
                    output: "Read LBA failed!".to_string(),
                });
            }
            self.reads
                .push((start_sector, size_bytes, destination.to_path_buf()));
            if let Some((n, token)) = &self.cancel_after {
                if self.reads.len() == *n {
                    token.cancel();
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: Vec<(String, f64)>,
        dry: Vec<PathBuf>,
        done: Vec<u64>,
        finished: Option<BackupOutcome>,
    }

    impl BackupProgress for Recorder {
        fn geometry(&mut self, _geometry: &FlashGeometry) {}
        fn partitions(&mut self, _table: &PartitionTable) {}
        fn reading(&mut self, _plan: &BackupPlan) {}
        fn chunk_started(
            &mut self,
            chunk: &ChunkDescriptor,
            _destination: &Path,
            report: &ProgressReport,
        ) {
            self.started.push((chunk.output_name.clone(), report.percent));
        }
        fn dry_run(&mut self, _chunk: &ChunkDescriptor, destination: &Path) {
            self.dry.push(destination.to_path_buf());
        }
        fn chunk_done(&mut self, _chunk: &ChunkDescriptor, transferred: u64) {
            self.done.push(transferred);
        }
        fn finished(&mut self, outcome: &BackupOutcome) {
            self.finished = Some(*outcome);
        }
    }

    fn config(mode: BackupMode, max_chunk_bytes: u64) -> BackupConfig {
        BackupConfig {
            max_chunk_bytes,
            ..BackupConfig::new(mode)
        }
    }

    #[test]
    fn test_disk_backup_chunked() {
        let mut tool = FakeTool::default();
        let mut recorder = Recorder::default();
        let mut backup = Backup::new(BackupConfig {
            disk_name: "diskimage".to_string(),
            destination_prefix: "out/".to_string(),
            ..config(BackupMode::Disk, 48 * 1024 * 1024)
        });

        let outcome = backup
            .run(&mut tool, &mut recorder, &CancelToken::new())
            .unwrap();
        assert_eq!(
            outcome,
            BackupOutcome::Completed {
                chunks: 3,
                bytes: 128 * 1024 * 1024,
            }
        );
        assert_eq!(backup.state(), BackupState::Completed);
        assert_eq!(
            tool.reads,
            vec![
                (0, 48 << 20, PathBuf::from("out/diskimage.0000")),
                (98304, 48 << 20, PathBuf::from("out/diskimage.0001")),
                (196608, 32 << 20, PathBuf::from("out/diskimage.0002")),
            ]
        );
        assert_eq!(recorder.done.last(), Some(&(128 << 20)));
        assert_eq!(recorder.finished, Some(outcome));
    }

    #[test]
    fn test_disk_backup_single_file() {
        let mut tool = FakeTool::default();
        let mut backup = Backup::new(BackupConfig::new(BackupMode::Disk));
        backup
            .run(&mut tool, &mut NoProgress, &CancelToken::new())
            .unwrap();
        assert_eq!(
            tool.reads,
            vec![(0, 128 << 20, PathBuf::from(DEFAULT_DISK_NAME))]
        );
    }

    #[test]
    fn test_partition_backup_with_skip() {
        let mut tool = FakeTool::default();
        let mut recorder = Recorder::default();
        let mut cfg = config(BackupMode::Partitions, 1 << 20);
        cfg.skip.insert("userdata".to_string());
        let mut backup = Backup::new(cfg);

        let outcome = backup
            .run(&mut tool, &mut recorder, &CancelToken::new())
            .unwrap();
        assert_eq!(
            outcome,
            BackupOutcome::Completed {
                chunks: 4,
                bytes: 4 << 20,
            }
        );

        let names: Vec<_> = tool
            .reads
            .iter()
            .map(|(s, n, p)| (*s, *n, p.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            names,
            [
                (0, 1 << 20, LEADING_REGION_NAME.to_string()),
                (2048, 1 << 20, "00_uboot".to_string()),
                (4096, 1 << 20, "01_boot.0000".to_string()),
                (6144, 1 << 20, "01_boot.0001".to_string()),
            ]
        );

        // Progress is measured against the selected partitions only
        let percents: Vec<_> = recorder.started.iter().map(|(_, p)| *p).collect();
        assert_eq!(percents, [0.0, 25.0, 50.0, 75.0]);
        assert_eq!(backup.partitions().unwrap().total_selected_bytes(), 4 << 20);
    }

    #[test]
    fn test_dry_run_reads_nothing() {
        let mut tool = FakeTool::default();
        let mut recorder = Recorder::default();
        let mut backup = Backup::new(BackupConfig {
            dry_run: true,
            ..config(BackupMode::Disk, 64 << 20)
        });

        let outcome = backup
            .run(&mut tool, &mut recorder, &CancelToken::new())
            .unwrap();
        assert!(outcome.is_completed());
        assert!(tool.reads.is_empty());
        assert_eq!(
            recorder.dry,
            [
                PathBuf::from("all_flash.0000"),
                PathBuf::from("all_flash.0001")
            ]
        );
        assert_eq!(recorder.done, [64u64 << 20, 128 << 20]);
    }

    #[test]
    fn test_cancel_stops_at_chunk_boundary() {
        let token = CancelToken::new();
        let mut tool = FakeTool {
            cancel_after: Some((2, token.clone())),
            ..Default::default()
        };
        let mut backup = Backup::new(config(BackupMode::Disk, 16 << 20));

        let outcome = backup.run(&mut tool, &mut NoProgress, &token).unwrap();
        assert_eq!(
            outcome,
            BackupOutcome::Cancelled {
                chunks: 2,
                bytes: 32 << 20,
                total_bytes: 128 << 20,
            }
        );
        assert_eq!(tool.reads.len(), 2);
        assert_eq!(backup.state(), BackupState::Cancelled);
    }

    #[test]
    fn test_cancel_before_first_read() {
        let token = CancelToken::new();
        token.cancel();
        let mut tool = FakeTool::default();
        let mut backup = Backup::new(BackupConfig::new(BackupMode::Partitions));
        let outcome = backup.run(&mut tool, &mut NoProgress, &token).unwrap();
        assert!(!outcome.is_completed());
        assert!(tool.reads.is_empty());
    }

    #[test]
    fn test_read_failure_is_fatal() {
        let mut tool = FakeTool {
            fail_read: Some(1),
            ..Default::default()
        };
        let mut backup = Backup::new(config(BackupMode::Disk, 32 << 20));

        match backup.run(&mut tool, &mut NoProgress, &CancelToken::new()) {
            Err(BackupError::ChunkReadFailed {
                output_name,
                start_sector,
                size_bytes,
                ..
            }) => {
                assert_eq!(output_name, "all_flash.0001");
                assert_eq!(start_sector, 65536);
                assert_eq!(size_bytes, 32 << 20);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(tool.reads.len(), 1);
        assert_eq!(backup.state(), BackupState::Failed);
    }

    #[test]
    fn test_chunk_size_checked_before_reading() {
        let mut tool = FakeTool::default();
        let mut backup = Backup::new(config(BackupMode::Partitions, 100));
        let err = backup
            .run(&mut tool, &mut NoProgress, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            BackupError::Plan(PlanError::ChunkSizeTooSmall { .. })
        ));
        assert!(tool.reads.is_empty());
        assert_eq!(backup.state(), BackupState::Failed);
    }

    #[test]
    fn test_bad_partition_table_fails() {
        let mut tool = FakeTool {
            partitions: Some("nothing useful\n".to_string()),
            ..Default::default()
        };
        let mut backup = Backup::new(BackupConfig::new(BackupMode::Partitions));
        let err = backup
            .run(&mut tool, &mut NoProgress, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(
            err,
            BackupError::Parse(ParseError::HeaderUnrecognized { .. })
        ));
        assert_eq!(backup.state(), BackupState::Failed);
        assert!(backup.geometry().is_some());
    }

    fn run_failing(tool: &mut FakeTool, mode: BackupMode) -> (Backup, BackupError) {
        let mut backup = Backup::new(BackupConfig::new(mode));
        let err = backup
            .run(tool, &mut NoProgress, &CancelToken::new())
            .unwrap_err();
        assert_eq!(backup.state(), BackupState::Failed);
        assert!(tool.reads.is_empty());
        (backup, err)
    }

    #[test]
    fn test_tool_unavailable_fails() {
        for mode in [BackupMode::Disk, BackupMode::Partitions] {
            let mut tool = FakeTool {
                missing: true,
                ..Default::default()
            };
            let (backup, err) = run_failing(&mut tool, mode);
            assert!(matches!(
                err,
                BackupError::Tool(ToolError::Unavailable { .. })
            ));
            assert!(backup.geometry().is_none());
        }
    }

    #[test]
    fn test_partition_query_failure_fails() {
        let mut tool = FakeTool {
            fail_partitions: true,
            ..Default::default()
        };
        let (backup, err) = run_failing(&mut tool, BackupMode::Partitions);
        assert!(matches!(
            err,
            BackupError::Tool(ToolError::ExecutionFailed { .. })
        ));
        assert!(backup.geometry().is_some());
        assert!(backup.partitions().is_none());
    }

    #[test]
    fn test_geometry_field_missing_fails() {
        let mut tool = FakeTool {
            geometry: Some(
                "Flash Size: 128 MB\nFlash Size: 262144 Sectors\nBlock Size: 512 KB\n".to_string(),
            ),
            ..Default::default()
        };
        let (backup, err) = run_failing(&mut tool, BackupMode::Disk);
        match err {
            BackupError::Parse(ParseError::FieldMissing { field, .. }) => {
                assert_eq!(field, "Page Size");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(backup.geometry().is_none());
    }

    #[test]
    fn test_geometry_inconsistent_fails() {
        let mut tool = FakeTool {
            geometry: Some(
                "Flash Size: 128 MB\nFlash Size: 262143 Sectors\nBlock Size: 512 KB\nPage Size: 2 KB\n"
                    .to_string(),
            ),
            ..Default::default()
        };
        let (_, err) = run_failing(&mut tool, BackupMode::Partitions);
        assert!(matches!(
            err,
            BackupError::Parse(ParseError::GeometryInconsistent {
                size_mb: 128,
                sector_count: 262143,
                ..
            })
        ));
    }

    #[test]
    fn test_oversized_partition_fails_before_reading() {
        let mut tool = FakeTool {
            partitions: Some(format!("{}3 262144 18446744073709551615 512 huge\n", PARTITIONS)),
            ..Default::default()
        };
        let (_, err) = run_failing(&mut tool, BackupMode::Partitions);
        assert!(matches!(
            err,
            BackupError::Parse(ParseError::LinePatternMismatch { line_number: 5, .. })
        ));
    }

    #[test]
    fn test_plan_is_lazy() {
        let mut tool = FakeTool::default();
        let mut backup = Backup::new(config(BackupMode::Disk, 512));
        let plan = backup.plan(&mut tool, &mut NoProgress).unwrap();
        assert_eq!(plan.ranges.len(), 1);
        assert_eq!(plan.chunk_count(), 262144);
        assert_eq!(plan.total_bytes, 128 << 20);

        let last = plan.chunks().last().unwrap();
        assert_eq!(last.start_sector, 262143);
        assert_eq!(last.output_name, "all_flash.262143");
    }
}
