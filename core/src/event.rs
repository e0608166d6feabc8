//! Engine notifications.
//!
//! RULE: Events report what the engine did — they are never persisted
//! and never read back as state. The hosting front end consumes them
//! to know when to re-render which panel.

use crate::{
    scenario::{DisplayMode, InputCell, ScenarioId},
    types::TimeMs,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    /// An accepted edit is waiting out its debounce window.
    InputPending {
        scenario: ScenarioId,
        cell:     InputCell,
        value:    f64,
        deadline: TimeMs,
    },

    /// A debounced edit reached the scenario's inputs.
    InputSettled {
        scenario: ScenarioId,
        cell:     InputCell,
        value:    f64,
    },

    /// A scenario atomically swapped in a fresh output snapshot.
    ScenarioPublished {
        scenario: ScenarioId,
        at:       TimeMs,
    },

    /// A recomputation failed; the scenario keeps its previous
    /// published snapshot and the other scenarios are unaffected.
    ScenarioFaulted {
        scenario: ScenarioId,
        reason:   String,
    },

    DisplayModeChanged {
        scenario: ScenarioId,
        mode:     DisplayMode,
    },
}
