// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo history for one group's region list.

use crate::models::RoiRegion;

/// State of a group before a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    /// The group had no entry at all.
    Absent,
    Regions(Vec<RoiRegion>),
}

impl From<Option<&Vec<RoiRegion>>> for Snapshot {
    fn from(regions: Option<&Vec<RoiRegion>>) -> Self {
        match regions {
            Some(regions) => Snapshot::Regions(regions.clone()),
            None => Snapshot::Absent,
        }
    }
}

/// Stack of full-list snapshots. Unbounded; lives for the session only.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Snapshot>,
}

impl History {
    /// Save the current state before making a change
    pub fn push(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
    }

    /// Most recent snapshot, removed from the stack
    pub fn undo(&mut self) -> Option<Snapshot> {
        self.undo_stack.pop()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoiShape;

    #[test]
    fn test_lifo_order() {
        let mut history = History::default();
        let region = RoiRegion::new(RoiShape::rectangle(0.0, 0.0, 1.0, 1.0));
        history.push(Snapshot::Absent);
        history.push(Snapshot::Regions(vec![region.clone()]));

        assert!(history.can_undo());
        assert_eq!(history.undo(), Some(Snapshot::Regions(vec![region])));
        assert_eq!(history.undo(), Some(Snapshot::Absent));
        assert_eq!(history.undo(), None);
        assert!(!history.can_undo());
    }
}
