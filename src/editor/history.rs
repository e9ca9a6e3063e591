use std::collections::VecDeque;
use std::mem;

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Snapshot-based undo/redo history.
///
/// `present` is always the state currently shown. Recording a new state
/// pushes the old present onto `past` (evicting the oldest entry past the
/// limit) and clears `future`.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    limit: usize,
    replaying: bool,
}

impl<T: Clone> History<T> {
    pub fn new(baseline: T, limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: baseline,
            future: VecDeque::new(),
            limit,
            replaying: false,
        }
    }

    /// Captures `state` as the new present.
    ///
    /// Returns `false` without recording while a restored state is being
    /// applied, since that change is a replay and not a new edit.
    pub fn record(&mut self, state: T) -> bool {
        if self.replaying {
            return false;
        }
        self.past.push_back(mem::replace(&mut self.present, state));
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
        true
    }

    /// Steps back one entry and returns the state to restore.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop_back()?;
        self.future
            .push_front(mem::replace(&mut self.present, previous));
        Some(&self.present)
    }

    /// Steps forward one entry and returns the state to restore.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop_front()?;
        self.past.push_back(mem::replace(&mut self.present, next));
        Some(&self.present)
    }

    /// Drops both stacks and starts over from `baseline`.
    pub fn reset(&mut self, baseline: T) {
        self.past.clear();
        self.future.clear();
        self.present = baseline;
        self.replaying = false;
    }

    /// Marks the start of applying a state returned by `undo`/`redo`.
    pub fn begin_replay(&mut self) {
        self.replaying = true;
    }

    pub fn end_replay(&mut self) {
        self.replaying = false;
    }

    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
