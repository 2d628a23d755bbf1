use std::{cmp::Reverse, collections::BinaryHeap};

/// A pending system run. Ordering is by fire time, then by system slot, so
/// runs due at the same instant happen in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Scheduled {
    pub fire_at_ms: u64,
    pub slot: usize,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, fire_at_ms: u64, slot: usize) {
        self.heap.push(Reverse(Scheduled { fire_at_ms, slot }));
    }

    pub fn peek_time(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.fire_at_ms)
    }

    /// Pops the earliest entry if it is due at or before `now_ms`.
    pub fn pop_if_ready(&mut self, now_ms: u64) -> Option<Scheduled> {
        if self.peek_time()? > now_ms {
            return None;
        }
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
