//! Reading recorded tick logs back.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::format::{TickLogError, TickLogHeader, decode_tick_log};

/// A fully loaded tick log.
///
/// Usage:
/// ```ignore
/// let log = TickLogReader::<GameTickPacket>::open("results/kickoff.ticklog")?;
/// println!("{} snapshots", log.len());
/// if let Some(tick) = log.first_divergence(other.snapshots()) {
///     println!("runs diverge at tick {tick}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TickLogReader<S> {
    header: TickLogHeader,
    snapshots: Vec<S>,
}

impl<S: DeserializeOwned> TickLogReader<S> {
    /// Open and decode a tick log file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TickLogError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a tick log image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TickLogError> {
        let (header, snapshots) = decode_tick_log(bytes)?;
        Ok(Self { header, snapshots })
    }
}

impl<S> TickLogReader<S> {
    pub fn header(&self) -> &TickLogHeader {
        &self.header
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Snapshots in tick order.
    pub fn snapshots(&self) -> &[S] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.snapshots.iter()
    }

    pub fn into_snapshots(self) -> Vec<S> {
        self.snapshots
    }
}

impl<S: PartialEq> TickLogReader<S> {
    /// Index of the first tick where `other` differs from this log, including
    /// a length difference. `None` if both hold the same snapshots.
    pub fn first_divergence(&self, other: &[S]) -> Option<usize> {
        let common = self.snapshots.len().min(other.len());
        self.snapshots
            .iter()
            .zip(other)
            .position(|(a, b)| a != b)
            .or((self.snapshots.len() != other.len()).then_some(common))
    }
}

impl<'a, S> IntoIterator for &'a TickLogReader<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
