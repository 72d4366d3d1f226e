//! Rolling history of recent frame records.

use crate::bus::frame::FrameRecord;

/// Fixed-capacity ring of the most recent frame records. Pushing past
/// capacity overwrites the oldest entry; a push never fails.
pub struct HistoryRing {
    buf: Vec<FrameRecord>,
    cap: usize,
    idx: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> HistoryRing {
        let cap = capacity.max(1);
        HistoryRing {
            buf: Vec::with_capacity(cap),
            cap,
            idx: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn push(&mut self, record: FrameRecord) {
        if self.buf.len() < self.cap {
            self.buf.push(record);
        } else {
            self.buf[self.idx] = record;
        }
        self.idx = (self.idx + 1) % self.cap;
    }

    /// Returns the retained records in insertion order, oldest first.
    pub fn snapshot(&self) -> Vec<FrameRecord> {
        if self.buf.len() < self.cap {
            self.buf.clone()
        } else {
            self.buf[self.idx..]
                .iter()
                .chain(self.buf[..self.idx].iter())
                .cloned()
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(n: u32) -> FrameRecord {
        FrameRecord {
            text: format!("can0  20{}   [8]  00", n),
            id: Some(0x200 + n),
        }
    }

    #[test]
    fn partial_fill_keeps_insertion_order() {
        let mut ring = HistoryRing::new(5);
        for n in 1..=3 {
            ring.push(rec(n));
        }
        let snap = ring.snapshot();
        assert_eq!(snap.len(), 3);
        assert_eq!(snap[0], rec(1));
        assert_eq!(snap[2], rec(3));
    }

    #[test]
    fn overfill_retains_most_recent_capacity() {
        let mut ring = HistoryRing::new(5);
        for n in 1..=7 {
            ring.push(rec(n));
        }
        let snap = ring.snapshot();
        assert_eq!(
            snap,
            vec![rec(3), rec(4), rec(5), rec(6), rec(7)],
        );
    }

    #[test]
    fn snapshot_count_is_min_of_pushes_and_capacity() {
        for pushes in 0u32..8 {
            let mut ring = HistoryRing::new(5);
            for n in 0..pushes {
                ring.push(rec(n));
            }
            assert_eq!(ring.snapshot().len(), (pushes as usize).min(5));
        }
    }
}
