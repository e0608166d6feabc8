//! The recomputation engine — ties input cells to published outputs.
//!
//! RULES:
//!   - Edits are validated at submit; a rejected edit never arms a
//!     timer and never touches published state.
//!   - Only settled (debounced) values reach a scenario's inputs.
//!   - A scenario's outputs are recomputed as a whole from one input
//!     snapshot and swapped in atomically.
//!   - Scenarios are processed in a fixed order, one recomputation at
//!     a time; a fault in one scenario never blocks or corrupts the
//!     other two.

use crate::{
    command::PanelCommand,
    context::DeskContext,
    debounce::DEFAULT_DEBOUNCE_MS,
    error::{DeskError, DeskResult},
    event::DeskEvent,
    outputs::OutputSnapshot,
    scenario::{
        compute_figures, DisplayMode, InputCell, Scenario, ScenarioDefaults, ScenarioId,
        ScenarioInputs, ScenarioState,
    },
    sector::SECTOR_COUNT,
    types::TimeMs,
};

pub struct DeskEngine {
    context:   DeskContext,
    scenarios: [Scenario; 3],
}

impl DeskEngine {
    /// Build a fully wired engine: seed every scenario from the
    /// dataset defaults and publish initial outputs for all three
    /// panels.
    pub fn build(context: DeskContext) -> DeskResult<Self> {
        Self::build_with_debounce(context, DEFAULT_DEBOUNCE_MS)
    }

    pub fn build_with_debounce(context: DeskContext, debounce_ms: TimeMs) -> DeskResult<Self> {
        let defaults = ScenarioDefaults::from_records(context.records())?;
        let scenarios = ScenarioId::ALL.map(|id| Scenario::new(id, &defaults, debounce_ms));
        let mut engine = Self { context, scenarios };
        for id in ScenarioId::ALL {
            engine.recompute(id)?;
        }
        Ok(engine)
    }

    pub fn context(&self) -> &DeskContext {
        &self.context
    }

    pub fn scenario(&self, id: ScenarioId) -> &Scenario {
        &self.scenarios[id.index()]
    }

    /// Last published snapshot of a scenario. Always present after a
    /// successful build.
    pub fn published(&self, id: ScenarioId) -> Option<&OutputSnapshot> {
        self.scenarios[id.index()].published()
    }

    // ── Input boundary ─────────────────────────────────────────

    /// Submit one edit. Validation happens here, before the debounce
    /// timer is armed; a rejected edit leaves the scenario exactly as
    /// it was.
    pub fn submit(
        &mut self,
        id: ScenarioId,
        cell: InputCell,
        value: f64,
        now: TimeMs,
    ) -> DeskResult<DeskEvent> {
        validate(cell, value)?;
        let deadline = self.scenarios[id.index()].debounce.arm(cell, value, now);
        log::debug!(
            "{}: {} = {value} pending until {deadline}",
            id.name(),
            cell.describe()
        );
        Ok(DeskEvent::InputPending {
            scenario: id,
            cell,
            value,
            deadline,
        })
    }

    /// Switch the comparison chart's display mode and republish that
    /// panel immediately — the selector is not a debounced numeric
    /// cell.
    pub fn set_display_mode(
        &mut self,
        mode: DisplayMode,
        now: TimeMs,
    ) -> DeskResult<Vec<DeskEvent>> {
        let id = ScenarioId::SectorComparison;
        self.scenarios[id.index()].display_mode = mode;
        self.scenarios[id.index()].state = ScenarioState::Stale;
        self.recompute(id)?;
        Ok(vec![
            DeskEvent::DisplayModeChanged { scenario: id, mode },
            DeskEvent::ScenarioPublished { scenario: id, at: now },
        ])
    }

    /// Dispatch a front-end command.
    pub fn apply(&mut self, command: PanelCommand, now: TimeMs) -> DeskResult<Vec<DeskEvent>> {
        match command {
            PanelCommand::SetInput {
                scenario,
                cell,
                value,
            } => Ok(vec![self.submit(scenario, cell, value, now)?]),
            PanelCommand::SetDisplayMode { mode } => self.set_display_mode(mode, now),
        }
    }

    // ── Recomputation ──────────────────────────────────────────

    /// Apply every settled edit and recompute each affected scenario
    /// exactly once. Events come out in scenario order, then cell
    /// order — deterministic for a given set of pending edits.
    pub fn poll(&mut self, now: TimeMs) -> Vec<DeskEvent> {
        self.settle(now, false)
    }

    /// Force all pending edits to settle immediately, ignoring their
    /// deadlines. Used by one-shot drivers.
    pub fn flush(&mut self, now: TimeMs) -> Vec<DeskEvent> {
        self.settle(now, true)
    }

    fn settle(&mut self, now: TimeMs, force: bool) -> Vec<DeskEvent> {
        let mut events = Vec::new();
        for id in ScenarioId::ALL {
            let scenario = &mut self.scenarios[id.index()];
            let due = if force {
                scenario.debounce.take_all()
            } else {
                scenario.debounce.take_due(now)
            };
            if due.is_empty() {
                continue;
            }

            for (cell, value) in due {
                scenario.inputs.set(cell, value);
                events.push(DeskEvent::InputSettled {
                    scenario: id,
                    cell,
                    value,
                });
            }
            scenario.state = ScenarioState::Stale;

            match self.recompute(id) {
                Ok(()) => events.push(DeskEvent::ScenarioPublished { scenario: id, at: now }),
                Err(e) => {
                    // Recoverable: prior published snapshot stands,
                    // remaining scenarios still get their turn.
                    log::warn!("{}: recomputation failed: {e}", id.name());
                    events.push(DeskEvent::ScenarioFaulted {
                        scenario: id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        events
    }

    fn recompute(&mut self, id: ScenarioId) -> DeskResult<()> {
        let snapshot = {
            let scenario = &self.scenarios[id.index()];
            recompute_snapshot(&self.context, id, &scenario.inputs, scenario.display_mode)?
        };
        let scenario = &mut self.scenarios[id.index()];
        scenario.published = Some(snapshot);
        scenario.state = ScenarioState::Published;
        log::debug!("{}: published", id.name());
        Ok(())
    }

    /// Earliest pending deadline across all scenarios. Lets a driver
    /// sleep until the next timer instead of busy-polling.
    pub fn next_deadline(&self) -> Option<TimeMs> {
        self.scenarios
            .iter()
            .filter_map(|s| s.debounce.next_deadline())
            .min()
    }
}

/// Recompute one scenario's snapshot from an explicit input snapshot.
/// This is the exact path `poll` takes after edits settle; it is a
/// pure function of its arguments, which is what makes republication
/// idempotent.
pub fn recompute_snapshot(
    context: &DeskContext,
    id: ScenarioId,
    inputs: &ScenarioInputs,
    mode: DisplayMode,
) -> DeskResult<OutputSnapshot> {
    let baselines = if id.is_comparison() {
        Some(context.baselines())
    } else {
        None
    };

    if inputs.total_credit() == 0.0 {
        log::debug!("{}: zero total credit, publishing undefined aggregates", id.name());
        return Ok(OutputSnapshot::undefined(id, baselines, mode));
    }

    let figures = compute_figures(context.predictor(), inputs)?;
    Ok(OutputSnapshot::from_figures(id, &figures, baselines, mode))
}

fn validate(cell: InputCell, value: f64) -> DeskResult<()> {
    if !value.is_finite() {
        return Err(DeskError::InvalidInput {
            cell: cell.describe(),
            reason: format!("value must be a finite number, got {value}"),
        });
    }
    if let InputCell::SectorCredit { sector } = cell {
        if sector >= SECTOR_COUNT {
            return Err(DeskError::InvalidInput {
                cell: cell.describe(),
                reason: format!("sector index out of range 0..{SECTOR_COUNT}"),
            });
        }
        if value <= 0.0 {
            return Err(DeskError::InvalidInput {
                cell: cell.describe(),
                reason: format!("channeled credit must be strictly positive, got {value}"),
            });
        }
    }
    Ok(())
}
