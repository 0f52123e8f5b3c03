//! Bounded FIFO of recent gesture ids

use std::collections::VecDeque;

/// The last `capacity` gesture ids, oldest first.
#[derive(Debug, Clone)]
pub struct CommandWindow {
    ids: VecDeque<u8>,
    capacity: usize,
}

impl CommandWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ids: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, id: u8) {
        if self.ids.len() == self.capacity {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
        debug_assert!(self.ids.len() <= self.capacity);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.ids.iter().copied()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Most frequent id once the window is full.
    ///
    /// Ties go to the id whose first occurrence is oldest.
    pub fn majority(&self) -> Option<u8> {
        if !self.is_full() {
            return None;
        }

        // (id, count) in first-seen order
        let mut tally: Vec<(u8, usize)> = Vec::with_capacity(self.capacity);
        for id in self.iter() {
            match tally.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, count)) => *count += 1,
                None => tally.push((id, 1)),
            }
        }

        let mut best: Option<(u8, usize)> = None;
        for (id, count) in tally {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((id, count));
            }
        }
        best.map(|(id, _)| id)
    }
}
