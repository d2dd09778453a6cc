//! Linear undo/redo over full-surface snapshots.

use crate::raster::{RasterSurface, Snapshot};
use std::collections::VecDeque;

/// Snapshot history for a single surface.
///
/// `past` holds every committed state, oldest first; its last entry is
/// what the surface currently shows. `future` holds undone states, next
/// redo first. `past` is never empty.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Snapshot>,
    future: VecDeque<Snapshot>,
    /// Maximum length of `past` (`None` = unbounded).
    limit: Option<usize>,
}

impl History {
    /// Clear `surface` to its background and record that blank state.
    pub fn new(surface: &mut RasterSurface, limit: Option<usize>) -> Self {
        let mut history = Self {
            past: Vec::new(),
            future: VecDeque::new(),
            limit: limit.map(|n| n.max(1)),
        };
        history.init(surface);
        history
    }

    fn init(&mut self, surface: &mut RasterSurface) {
        surface.clear(surface.background());
        self.past.push(surface.snapshot());
    }

    /// Record a new state. Invalidates every redo candidate.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();

        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
        log::debug!("History push: {} past", self.past.len());
    }

    /// Step back one state. Returns false when only the base state remains.
    pub fn undo(&mut self, surface: &mut RasterSurface) -> bool {
        if self.past.len() <= 1 {
            return false;
        }
        if let Some(top) = self.past.pop() {
            self.future.push_front(top);
        }
        surface.restore(self.current());
        log::debug!("Undo: {} past, {} future", self.past.len(), self.future.len());
        true
    }

    /// Step forward one state. Returns false when nothing was undone.
    pub fn redo(&mut self, surface: &mut RasterSurface) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        surface.restore(&next);
        self.past.push(next);
        log::debug!("Redo: {} past, {} future", self.past.len(), self.future.len());
        true
    }

    /// Drop all states and start over from a blank surface.
    pub fn clear(&mut self, surface: &mut RasterSurface) {
        self.past.clear();
        self.future.clear();
        self.init(surface);
    }

    /// The most recently committed state (what the surface shows between
    /// gestures).
    pub fn current(&self) -> &Snapshot {
        // `past` always holds at least the base state.
        &self.past[self.past.len() - 1]
    }

    pub fn can_undo(&self) -> bool {
        self.past.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len() - 1
    }

    /// Number of redo steps available.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
