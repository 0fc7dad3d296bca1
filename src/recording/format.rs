//! Binary format definitions for tick log files.

use std::io::{self, Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Magic bytes identifying a tick log file.
pub const TICK_LOG_MAGIC: &[u8; 4] = b"RBTL";

/// Current format version.
pub const TICK_LOG_VERSION: u16 = 1;

/// Compression type for the snapshot payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    /// No compression (raw JSON).
    #[default]
    None = 0,
    /// LZ4 block compression with prepended size.
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }

    /// Best compression this build can write.
    pub fn preferred() -> Self {
        if cfg!(feature = "lz4") {
            CompressionType::Lz4
        } else {
            CompressionType::None
        }
    }

    /// Compression actually used when `self` is requested.
    pub fn effective(self) -> Self {
        match self {
            CompressionType::Lz4 if !cfg!(feature = "lz4") => CompressionType::None,
            other => other,
        }
    }
}

/// Tick log header flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFlags {
    /// Compression type (lower 4 bits).
    pub compression: CompressionType,
}

impl LogFlags {
    pub fn to_u16(self) -> u16 {
        self.compression as u16
    }

    pub fn from_u16(v: u16) -> Result<Self, TickLogError> {
        let raw = (v & 0x0F) as u8;
        let compression =
            CompressionType::from_u8(raw).ok_or(TickLogError::UnsupportedCompression(raw))?;
        Ok(Self { compression })
    }
}

/// File header for the tick log format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickLogHeader {
    /// Number of snapshots in the payload.
    pub snapshot_count: u64,
    /// Payload size in bytes before compression.
    pub payload_size: u64,
    pub flags: LogFlags,
}

impl TickLogHeader {
    /// Size of header in bytes.
    /// Magic(4) + Version(2) + Flags(2) + Count(8) + PayloadSize(8) + Reserved(8) = 32
    pub const SIZE: usize = 32;

    /// Write header to output.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(TICK_LOG_MAGIC)?;
        w.write_all(&TICK_LOG_VERSION.to_le_bytes())?;
        w.write_all(&self.flags.to_u16().to_le_bytes())?;
        w.write_all(&self.snapshot_count.to_le_bytes())?;
        w.write_all(&self.payload_size.to_le_bytes())?;
        // Reserved bytes
        w.write_all(&[0u8; 8])?;
        Ok(())
    }

    /// Read header from input.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, TickLogError> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != TICK_LOG_MAGIC {
            return Err(TickLogError::InvalidMagic);
        }

        let mut buf2 = [0u8; 2];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != TICK_LOG_VERSION {
            return Err(TickLogError::UnsupportedVersion(version));
        }

        r.read_exact(&mut buf2)?;
        let flags = LogFlags::from_u16(u16::from_le_bytes(buf2))?;

        r.read_exact(&mut buf8)?;
        let snapshot_count = u64::from_le_bytes(buf8);

        r.read_exact(&mut buf8)?;
        let payload_size = u64::from_le_bytes(buf8);

        // Skip reserved bytes
        let mut reserved = [0u8; 8];
        r.read_exact(&mut reserved)?;

        Ok(Self {
            snapshot_count,
            payload_size,
            flags,
        })
    }
}

/// Encode snapshots into a complete tick log image (header + payload).
///
/// JSON cannot hold NaN or infinity and serde_json writes them as `null`.
/// Snapshot types that may carry non-finite floats must serialize them
/// explicitly, as the host packet types do.
pub fn encode_tick_log<S: Serialize>(
    snapshots: &[S],
    compression: CompressionType,
) -> Result<Vec<u8>, TickLogError> {
    let compression = compression.effective();
    let payload = serde_json::to_vec(snapshots)?;
    let header = TickLogHeader {
        snapshot_count: snapshots.len() as u64,
        payload_size: payload.len() as u64,
        flags: LogFlags { compression },
    };

    let body = match compression {
        CompressionType::None => payload,
        CompressionType::Lz4 => compress_lz4(&payload),
    };

    let mut bytes = Vec::with_capacity(TickLogHeader::SIZE + body.len());
    header.write_to(&mut bytes)?;
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode a tick log image, checking the payload against its header.
pub fn decode_tick_log<S: DeserializeOwned>(
    bytes: &[u8],
) -> Result<(TickLogHeader, Vec<S>), TickLogError> {
    let mut cursor = bytes;
    let header = TickLogHeader::read_from(&mut cursor)?;

    let payload = match header.flags.compression {
        CompressionType::None => cursor.to_vec(),
        CompressionType::Lz4 => decompress_lz4(cursor)?,
    };
    if payload.len() as u64 != header.payload_size {
        return Err(TickLogError::SizeMismatch {
            expected: header.payload_size,
            found: payload.len() as u64,
        });
    }

    let snapshots: Vec<S> = serde_json::from_slice(&payload)?;
    if snapshots.len() as u64 != header.snapshot_count {
        return Err(TickLogError::CountMismatch {
            expected: header.snapshot_count,
            found: snapshots.len() as u64,
        });
    }
    Ok((header, snapshots))
}

/// Compress data using LZ4.
#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress LZ4 data.
#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>, TickLogError> {
    lz4_flex::decompress_size_prepended(data).map_err(|e| TickLogError::Decompress(e.to_string()))
}

/// Fallback when LZ4 is not available.
#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(_data: &[u8]) -> Result<Vec<u8>, TickLogError> {
    Err(TickLogError::UnsupportedCompression(CompressionType::Lz4 as u8))
}

/// Tick log encoding, decoding and I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum TickLogError {
    #[error("Tick log I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Snapshot serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid tick log magic bytes")]
    InvalidMagic,
    #[error("Unsupported tick log version: {0}")]
    UnsupportedVersion(u16),
    #[error("Unsupported tick log compression: {0}")]
    UnsupportedCompression(u8),
    #[error("Tick log decompression failed: {0}")]
    Decompress(String),
    #[error("Tick log payload is {found} bytes, header says {expected}")]
    SizeMismatch { expected: u64, found: u64 },
    #[error("Tick log holds {found} snapshots, header says {expected}")]
    CountMismatch { expected: u64, found: u64 },
}
