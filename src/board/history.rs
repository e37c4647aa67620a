//! Bounded undo/redo history of board snapshots
//!
//! Discrete edits push a snapshot straight away with [`History::checkpoint`].
//! Continuous gestures (drags, handle edits) [`stage`](History::stage) the
//! pre-gesture snapshot on pointer-down and [`commit`](History::commit) it on
//! pointer-up only if something actually changed, so a drag records a single
//! entry instead of one per pointer-move.

use super::model::BoardSnapshot;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    undo_stack: Vec<BoardSnapshot>,
    redo_stack: Vec<BoardSnapshot>,
    staged: Option<BoardSnapshot>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            staged: None,
            limit: limit.max(1),
        }
    }

    /// Record the state before a discrete mutation
    pub fn checkpoint(&mut self, before: BoardSnapshot) {
        self.undo_stack.push(before);
        self.redo_stack.clear();

        // Limit undo stack size
        if self.undo_stack.len() > self.limit {
            let overflow = self.undo_stack.len() - self.limit;
            self.undo_stack.drain(..overflow);
        }
    }

    /// Hold the state before a gesture until we know whether it changed anything
    pub fn stage(&mut self, before: BoardSnapshot) {
        self.staged = Some(before);
    }

    /// Move the staged snapshot onto the undo stack. Returns false if nothing was staged.
    pub fn commit(&mut self) -> bool {
        match self.staged.take() {
            Some(before) => {
                self.checkpoint(before);
                true
            }
            None => false,
        }
    }

    /// Drop the staged snapshot, returning it (used to revert a cancelled gesture)
    pub fn take_staged(&mut self) -> Option<BoardSnapshot> {
        self.staged.take()
    }

    /// Pop the last snapshot. `current` is kept for redo.
    pub fn undo(&mut self, current: BoardSnapshot) -> Option<BoardSnapshot> {
        let prev = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(prev)
    }

    pub fn redo(&mut self, current: BoardSnapshot) -> Option<BoardSnapshot> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
