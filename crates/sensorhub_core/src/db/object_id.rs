//! Document-store identifiers.
//!
//! # Responsibility
//! - Generate 12-byte ObjectIds for newly inserted documents.
//! - Parse caller-provided id strings into ObjectIds.
//!
//! # Invariants
//! - Layout: 4-byte big-endian unix seconds, 5 process-unique bytes,
//!   3-byte big-endian counter.
//! - Text form is always 24 lowercase hex characters.
//! - Within one process, ids sort in generation order for the same second.

use crate::model::device::InvalidRecordId;
use log::warn;
use once_cell::sync::Lazy;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

const OBJECT_ID_LEN: usize = 12;
const COUNTER_MASK: u32 = 0x00FF_FFFF;

static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| {
    let random = Uuid::new_v4().into_bytes();
    [random[0], random[1], random[2], random[3], random[4]]
});

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Store-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Generates a fresh id for an insert.
    pub fn generate() -> Self {
        let seconds = unix_seconds(SystemTime::now());
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;

        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(PROCESS_UNIQUE.as_slice());
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        Self(bytes)
    }

    /// Parses the 24-char hex form. Uppercase digits are accepted.
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(value, &mut bytes)
            .map_err(|_| InvalidRecordId::new(value, "expected 24 hexadecimal characters"))?;
        Ok(Self(bytes))
    }

    /// Creation time embedded in the id, in unix seconds.
    pub fn timestamp_secs(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Seconds field of a new id. Saturates past 2106; a clock before the epoch
/// is reported and stamped as zero.
fn unix_seconds(now: SystemTime) -> u32 {
    match now.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => u32::try_from(elapsed.as_secs()).unwrap_or(u32::MAX),
        Err(err) => {
            warn!(
                "event=object_id_clock module=db status=before_epoch skew_ms={}",
                err.duration().as_millis()
            );
            0
        }
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = InvalidRecordId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
