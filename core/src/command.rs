//! Commands accepted from the hosting front end.
//!
//! Variants are added as panels grow — never removed or reordered.

use crate::scenario::{DisplayMode, InputCell, ScenarioId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PanelCommand {
    /// Edit one input cell of one scenario.
    SetInput {
        scenario: ScenarioId,
        cell:     InputCell,
        value:    f64,
    },

    /// Switch the comparison chart between percentage and value bars.
    SetDisplayMode { mode: DisplayMode },
}
