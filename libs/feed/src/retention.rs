//! Bounded retention log for replay
//!
//! Owns the outbound sequence counter and a bounded window of recently
//! published payloads. Sequence numbers are strictly increasing with no
//! gaps in what is appended; eviction only ever drops the oldest entries.

use std::collections::VecDeque;

/// Why a requested range cannot be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// Part of the range has been evicted; the requester must fall back
    /// to full-state resynchronization.
    Evicted { oldest_retained: u64 },
    /// The range starts at or past the next sequence to be assigned.
    /// Distinct from eviction: there is simply no data yet.
    NotYetPublished { next_sequence: u64 },
}

/// Sequencing retention buffer.
#[derive(Debug)]
pub struct RetentionLog {
    /// Sequence number the next append will receive.
    next_sequence: u64,
    /// Retained payloads; front is the oldest retained sequence.
    entries: VecDeque<Vec<u8>>,
    /// Maximum retained entries before eviction.
    capacity: usize,
}

impl RetentionLog {
    /// Create a log whose first message will get `base_sequence`.
    pub fn new(base_sequence: u64, capacity: usize) -> Self {
        assert!(capacity > 0, "retention capacity must be positive");
        Self {
            next_sequence: base_sequence,
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a payload, assigning and returning its sequence number.
    pub fn append(&mut self, payload: Vec<u8>) -> u64 {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(payload);
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Sequence number the next append will receive.
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Oldest sequence still retained, if any.
    pub fn oldest_retained(&self) -> Option<u64> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.next_sequence - self.entries.len() as u64)
        }
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch up to `count` retained payloads starting at `from`.
    ///
    /// The tail of the range is clamped to what has been published; the
    /// head is not, so a partially evicted range is decisively refused.
    pub fn range(&self, from: u64, count: u16) -> Result<Vec<Vec<u8>>, RangeError> {
        if from >= self.next_sequence {
            return Err(RangeError::NotYetPublished {
                next_sequence: self.next_sequence,
            });
        }
        let oldest = match self.oldest_retained() {
            Some(oldest) if from >= oldest => oldest,
            _ => {
                return Err(RangeError::Evicted {
                    oldest_retained: self.oldest_retained().unwrap_or(self.next_sequence),
                })
            }
        };

        let start = (from - oldest) as usize;
        let end = (start + count as usize).min(self.entries.len());
        Ok(self.entries.range(start..end).cloned().collect())
    }
}
