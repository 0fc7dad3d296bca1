//! Tick recorder: buffers snapshots in memory and writes them once.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::atomic::atomic_write;
use super::format::{CompressionType, TickLogError, TickLogHeader, encode_tick_log};
use super::latch::DumpLatch;

/// Records one snapshot per tick and persists them with a single write.
///
/// `log` never touches the filesystem. `dump` trips the latch before writing,
/// so only the first call writes, even if that write fails.
///
/// Usage:
/// ```ignore
/// let mut recorder = TickRecorder::new("results/kickoff.ticklog");
/// for packet in packets {
///     recorder.log(packet);
/// }
/// recorder.dump()?;
/// ```
#[derive(Debug)]
pub struct TickRecorder<S> {
    path: PathBuf,
    buffer: Vec<S>,
    latch: DumpLatch,
    compression: CompressionType,
}

impl<S: Serialize> TickRecorder<S> {
    /// Create a recorder that will write to `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            buffer: Vec::new(),
            latch: DumpLatch::Pending,
            compression: CompressionType::preferred(),
        }
    }

    pub fn with_compression(mut self, compression: CompressionType) -> Self {
        self.compression = compression;
        self
    }

    /// Append a snapshot. Ignored once the log has been dumped.
    pub fn log(&mut self, snapshot: S) {
        if self.latch.is_dumped() {
            log::debug!("Snapshot after dump ignored ({})", self.path.display());
            return;
        }
        self.buffer.push(snapshot);
    }

    /// Write every buffered snapshot to the log path.
    ///
    /// Only the first call writes; later calls return [`DumpOutcome::AlreadyDumped`].
    pub fn dump(&mut self) -> Result<DumpOutcome, TickLogError> {
        if !self.latch.trip() {
            return Ok(DumpOutcome::AlreadyDumped);
        }

        let bytes = encode_tick_log(&self.buffer, self.compression)?;
        atomic_write(&self.path, &bytes)?;

        let payload_bytes = (bytes.len() - TickLogHeader::SIZE) as u64;
        let stats = TickLogStats {
            snapshot_count: self.buffer.len() as u64,
            file_bytes: bytes.len() as u64,
            payload_bytes,
            compression: self.compression.effective(),
        };
        log::info!("Tick log written to {}: {}", self.path.display(), stats);
        Ok(DumpOutcome::Written(stats))
    }

    /// Number of snapshots buffered.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn snapshots(&self) -> &[S] {
        &self.buffer
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn was_dumped(&self) -> bool {
        self.latch.is_dumped()
    }
}

/// Result of a dump request.
#[derive(Debug, Clone, PartialEq)]
pub enum DumpOutcome {
    /// This call wrote the log.
    Written(TickLogStats),
    /// An earlier call already wrote (or tried to write) the log.
    AlreadyDumped,
}

/// Statistics from a written tick log.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLogStats {
    /// Snapshots written.
    pub snapshot_count: u64,
    /// Total file size in bytes.
    pub file_bytes: u64,
    /// Stored payload size in bytes (after compression).
    pub payload_bytes: u64,
    /// Compression used.
    pub compression: CompressionType,
}

impl fmt::Display for TickLogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} snapshots, {} bytes total ({:?} compression)",
            self.snapshot_count, self.file_bytes, self.compression
        )
    }
}
