//! Tick recording for playback runs.
//!
//! A [`TickRecorder`] collects one snapshot per tick in memory and writes the
//! whole run once, atomically, when playback ends. [`TickLogReader`] loads a
//! log back for analysis or comparison against another run.
//!
//! # File Format
//!
//! The `.ticklog` format stores the snapshot sequence as one payload:
//!
//! ```text
//! Header (32 bytes):
//!   Magic: "RBTL" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression)
//!   Snapshot count: u64
//!   Payload size (uncompressed): u64
//!   Reserved: 8 bytes
//!
//! Payload (variable):
//!   JSON array of snapshots in tick order
//!   Optionally LZ4 compressed (size prepended)
//! ```

mod atomic;
mod format;
mod latch;
mod reader;
mod recorder;

pub use atomic::{atomic_write, temp_path};
pub use format::{
    CompressionType, LogFlags, TICK_LOG_MAGIC, TICK_LOG_VERSION, TickLogError, TickLogHeader,
    decode_tick_log, encode_tick_log,
};
pub use latch::DumpLatch;
pub use reader::TickLogReader;
pub use recorder::{DumpOutcome, TickLogStats, TickRecorder};
