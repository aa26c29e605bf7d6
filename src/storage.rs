//! Binary I/O for the terminal value table.
//!
//! Format (little-endian): 32-byte header + float64[N] in `state_id(C, m)` order.
//!
//! | offset | field |
//! |--------|-------|
//! | 0..10  | magic `"YACHT_EVAL"` |
//! | 10     | version: u32 |
//! | 14     | flags: u8 |
//! | 16     | entry count N: u32 |
//! | 20     | CRC32 of the payload: u32 |
//! | 24..32 | reserved |
//! | 32..   | N x f64 |
//!
//! The checksum covers only the payload `[32, 32 + 8N)`. A table is exposed
//! only after magic, length, checksum and entry count have all been verified.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use memmap2::Mmap;

use crate::constants::*;
use crate::error::YachtError;
use crate::types::{ScoreSheet, StateId, YachtState};

/// E(S): expected remaining score under optimal play, for every state id.
#[derive(Debug)]
pub struct TerminalValueTable {
    values: Vec<f64>,
    version: u32,
    flags: u8,
}

impl TerminalValueTable {
    /// Parse and validate a complete artifact held in memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, YachtError> {
        if bytes.len() < TABLE_HEADER_SIZE {
            return Err(YachtError::Truncated {
                expected: TABLE_HEADER_SIZE,
                actual: bytes.len(),
            });
        }

        let magic = &bytes[..TABLE_MAGIC.len()];
        if magic != TABLE_MAGIC {
            return Err(YachtError::BadMagic {
                found: String::from_utf8_lossy(magic).into_owned(),
            });
        }

        let version = read_u32(bytes, TABLE_VERSION_OFFSET);
        let flags = bytes[TABLE_FLAGS_OFFSET];
        let entries = read_u32(bytes, TABLE_COUNT_OFFSET) as usize;
        let expected_checksum = read_u32(bytes, TABLE_CHECKSUM_OFFSET);

        let payload_end = TABLE_HEADER_SIZE + entries * std::mem::size_of::<f64>();
        if bytes.len() < payload_end {
            return Err(YachtError::Truncated {
                expected: payload_end,
                actual: bytes.len(),
            });
        }

        let payload = &bytes[TABLE_HEADER_SIZE..payload_end];
        let checksum = crc32fast::hash(payload);
        if checksum != expected_checksum {
            return Err(YachtError::ChecksumMismatch {
                expected: expected_checksum,
                actual: checksum,
            });
        }

        if entries < NUM_STATES {
            return Err(YachtError::StateIdOutOfRange {
                entries,
                required: NUM_STATES,
            });
        }

        let values = payload
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            })
            .collect();

        Ok(Self {
            values,
            version,
            flags,
        })
    }

    /// Memory-map `path`, validate it and decode the values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, YachtError> {
        let path = path.as_ref();
        let start_time = Instant::now();
        log::info!("loading terminal values from {}", path.display());

        let file = File::open(path)?;
        // The artifact is immutable once published; nothing writes it while we read.
        let mmap = unsafe { Mmap::map(&file)? };
        let table = Self::from_bytes(&mmap)?;

        log::info!(
            "loaded {} terminal values (version {}, flags {:#04x}) in {:.2} ms",
            table.len(),
            table.version,
            table.flags,
            start_time.elapsed().as_secs_f64() * 1000.0
        );
        Ok(table)
    }

    /// Number of stored values (at least [`NUM_STATES`]).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// E_table[id]. Panics on an id past the end of the table.
    #[inline(always)]
    pub fn value(&self, id: StateId) -> f64 {
        self.values[id.index()]
    }

    #[inline(always)]
    pub fn get_state(&self, state: &YachtState) -> f64 {
        self.value(state.id())
    }

    /// Expected remaining score for the state `sheet` is in.
    pub fn get(&self, sheet: &ScoreSheet) -> f64 {
        self.value(sheet.state_id())
    }
}

/// Async entry point: reads and validates on tokio's blocking pool.
pub async fn load_terminal_values(
    path: impl Into<PathBuf>,
) -> Result<TerminalValueTable, YachtError> {
    let path = path.into();
    tokio::task::spawn_blocking(move || TerminalValueTable::load(path))
        .await
        .map_err(|e| YachtError::Io(std::io::Error::other(e)))?
}

/// Encode values into the artifact layout.
pub fn encode_terminal_values(values: &[f64], version: u32, flags: u8) -> Vec<u8> {
    let mut payload = Vec::with_capacity(values.len() * std::mem::size_of::<f64>());
    for v in values {
        payload.extend_from_slice(&v.to_le_bytes());
    }

    let mut bytes = Vec::with_capacity(TABLE_HEADER_SIZE + payload.len());
    bytes.extend_from_slice(TABLE_MAGIC);
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes.push(flags);
    bytes.push(0); // padding to offset 16
    bytes.extend_from_slice(&(values.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    bytes.resize(TABLE_HEADER_SIZE, 0);
    bytes.extend_from_slice(&payload);
    bytes
}

/// Write `values` as a terminal value file, creating parent directories.
pub fn save_terminal_values(path: impl AsRef<Path>, values: &[f64]) -> Result<(), YachtError> {
    let path = path.as_ref();
    let start_time = Instant::now();
    log::info!("saving {} terminal values to {}", values.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut f = File::create(path)?;
    f.write_all(&encode_terminal_values(values, TABLE_VERSION, 0))?;
    f.sync_all()?;

    log::info!(
        "saved terminal values in {:.2} ms",
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(buf)
}
