// Snowflake-style id generation with embedded shard information
// 64-bit format: [timestamp:42][shard_id:10][sequence:12]

use crate::core::ObjectId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Generates unique object ids. The layout allows 1024 shards and 4096 ids
/// per millisecond per shard; ids are roughly time-ordered, which keeps the
/// created-at/id descending sort stable for rows created in the same
/// millisecond.
#[derive(Debug)]
pub struct IdGenerator {
    shard_id: u16,
    sequence: AtomicU64,
    last_timestamp: AtomicU64,
}

impl IdGenerator {
    pub fn new(shard_id: u16) -> Self {
        assert!(shard_id < 1024, "Shard ID must be less than 1024");

        Self {
            shard_id,
            sequence: AtomicU64::new(0),
            last_timestamp: AtomicU64::new(0),
        }
    }

    /// Generate the next unique id.
    pub fn next_id(&self) -> ObjectId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_millis() as u64;

        let last_ts = self.last_timestamp.load(Ordering::Relaxed);

        let sequence = if now == last_ts {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            if seq >= 4096 {
                // Sequence overflow - wait for the next millisecond
                std::thread::sleep(std::time::Duration::from_millis(1));
                self.sequence.store(0, Ordering::Relaxed);
                return self.next_id();
            }
            seq
        } else {
            self.last_timestamp.store(now, Ordering::Relaxed);
            self.sequence.store(1, Ordering::Relaxed);
            0
        };

        let raw = ((now & 0x3FF_FFFF_FFFF) << 22)
            | ((self.shard_id as u64) << 12)
            | (sequence & 0xFFF);

        ObjectId::new(raw as i64)
    }

    /// Extract the shard id embedded in an object id.
    pub fn extract_shard_id(id: ObjectId) -> u16 {
        ((id.as_i64() as u64) >> 12 & 0x3FF) as u16
    }

    /// Extract the millisecond timestamp embedded in an object id.
    pub fn extract_timestamp(id: ObjectId) -> u64 {
        (id.as_i64() as u64) >> 22
    }

    pub fn shard_id(&self) -> u16 {
        self.shard_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let gen = IdGenerator::new(3);
        let mut seen = HashSet::new();
        for _ in 0..5000 {
            assert!(seen.insert(gen.next_id()));
        }
    }

    #[test]
    fn shard_id_round_trips() {
        let gen = IdGenerator::new(42);
        let id = gen.next_id();
        assert_eq!(IdGenerator::extract_shard_id(id), 42);
    }

    #[test]
    fn ids_are_monotonic_within_a_thread() {
        let gen = IdGenerator::new(0);
        let mut prev = gen.next_id();
        for _ in 0..1000 {
            let next = gen.next_id();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    #[should_panic]
    fn rejects_out_of_range_shard() {
        IdGenerator::new(1024);
    }
}
