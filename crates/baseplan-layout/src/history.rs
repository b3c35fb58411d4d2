use std::collections::{BTreeMap, VecDeque};

use crate::area::BuildableArea;
use crate::design::Floor;

/// Undo depth. Older snapshots are dropped.
pub const HISTORY_LIMIT: usize = 50;

/// Whole-state copy taken before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub floors: BTreeMap<u32, Floor>,
    pub areas: Vec<BuildableArea>,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    stack: VecDeque<Snapshot>,
}

impl History {
    pub(crate) fn push(&mut self, snapshot: Snapshot) {
        if self.stack.len() == HISTORY_LIMIT {
            self.stack.pop_front();
        }
        self.stack.push_back(snapshot);
    }

    pub(crate) fn pop(&mut self) -> Option<Snapshot> {
        self.stack.pop_back()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(n: usize) -> Snapshot {
        let rect = baseplan_core::Rect::new(0.0, 0.0, 1.0, 1.0);
        Snapshot {
            floors: BTreeMap::new(),
            areas: (0..n)
                .map(|i| BuildableArea::new(format!("a{i}"), rect, None))
                .collect(),
        }
    }

    #[test]
    fn oldest_snapshot_is_dropped_at_the_limit() {
        let mut h = History::default();
        for i in 0..HISTORY_LIMIT + 5 {
            h.push(snapshot(i));
        }
        assert_eq!(h.len(), HISTORY_LIMIT);
        assert_eq!(h.pop().map(|s| s.areas.len()), Some(HISTORY_LIMIT + 4));
        let mut last = None;
        while let Some(s) = h.pop() {
            last = Some(s);
        }
        assert_eq!(last.map(|s| s.areas.len()), Some(5));
    }
}
