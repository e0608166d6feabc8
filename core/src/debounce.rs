//! Per-cell settle timers.
//!
//! An edit arms a timer for its cell; a newer edit to the same cell
//! resets that timer; only on expiry does the value reach the
//! scenario's inputs. Rapid typing therefore triggers exactly one
//! recomputation, with the last submitted value.

use crate::{scenario::InputCell, types::TimeMs};
use std::collections::HashMap;

pub const DEFAULT_DEBOUNCE_MS: TimeMs = 400;

#[derive(Debug, Clone, Copy)]
struct PendingEdit {
    value:    f64,
    deadline: TimeMs,
}

#[derive(Debug)]
pub struct Debouncer {
    window:  TimeMs,
    pending: HashMap<InputCell, PendingEdit>,
}

impl Debouncer {
    pub fn new(window: TimeMs) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Arm (or re-arm) the timer for `cell` with the newest value.
    /// Returns the deadline at which the edit settles.
    pub fn arm(&mut self, cell: InputCell, value: f64, now: TimeMs) -> TimeMs {
        let deadline = now + self.window;
        self.pending.insert(cell, PendingEdit { value, deadline });
        deadline
    }

    /// Drain every edit whose timer has expired, in stable cell order.
    pub fn take_due(&mut self, now: TimeMs) -> Vec<(InputCell, f64)> {
        self.drain(|edit| edit.deadline <= now)
    }

    /// Drain everything regardless of deadline. Used when a caller
    /// wants the settled state immediately (one-shot runs, shutdown).
    pub fn take_all(&mut self) -> Vec<(InputCell, f64)> {
        self.drain(|_| true)
    }

    fn drain(&mut self, keep: impl Fn(&PendingEdit) -> bool) -> Vec<(InputCell, f64)> {
        let expired: Vec<InputCell> = self
            .pending
            .iter()
            .filter(|(_, edit)| keep(edit))
            .map(|(cell, _)| *cell)
            .collect();

        let mut out = Vec::with_capacity(expired.len());
        for cell in expired {
            if let Some(edit) = self.pending.remove(&cell) {
                out.push((cell, edit.value));
            }
        }
        out.sort_by_key(|(cell, _)| cell.ordinal());
        out
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Earliest deadline among pending edits, if any. Lets a driver
    /// sleep until the next timer instead of busy-polling.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.pending.values().map(|edit| edit.deadline).min()
    }
}
