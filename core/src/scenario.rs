//! Scenario state — one dashboard panel's input cells and lifecycle.
//!
//! RULE: The three scenarios share no mutable state. Each owns its
//! input cells, its debounce timers, and its last published snapshot;
//! the only shared thing is the immutable context.

use crate::{
    dataset::{HistoricalRecord, BILLION},
    debounce::Debouncer,
    error::{DeskError, DeskResult},
    model::{MacroInputs, Predictor},
    outputs::OutputSnapshot,
    sector::SECTOR_COUNT,
    types::{SectorIdx, TimeMs},
};
use serde::{Deserialize, Serialize};

/// The three dashboard panels. Created at engine construction, alive
/// for the whole process, never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioId {
    /// Budget-planning panel: full fee and loss-limit figures.
    Planning,
    /// Guarantee-fee evaluation panel.
    FeeEvaluation,
    /// Cross-sector comparison panel with historical baselines.
    SectorComparison,
}

impl ScenarioId {
    pub const ALL: [ScenarioId; 3] = [
        ScenarioId::Planning,
        ScenarioId::FeeEvaluation,
        ScenarioId::SectorComparison,
    ];

    pub fn index(self) -> usize {
        match self {
            ScenarioId::Planning => 0,
            ScenarioId::FeeEvaluation => 1,
            ScenarioId::SectorComparison => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScenarioId::Planning => "planning",
            ScenarioId::FeeEvaluation => "fee_evaluation",
            ScenarioId::SectorComparison => "sector_comparison",
        }
    }

    /// Panels that publish the fee-budget and loss-limit figures.
    pub fn publishes_budgets(self) -> bool {
        !matches!(self, ScenarioId::SectorComparison)
    }

    /// The comparison panel also publishes baselines and a chart.
    pub fn is_comparison(self) -> bool {
        matches!(self, ScenarioId::SectorComparison)
    }
}

/// Display mode of the comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Percentage,
    Value,
}

/// A single numeric input cell within one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputCell {
    EconGrowth,
    Inflation,
    Unemployment,
    SectorCredit { sector: SectorIdx },
}

impl InputCell {
    /// Stable ordering key, used to keep settle order deterministic.
    pub(crate) fn ordinal(self) -> usize {
        match self {
            InputCell::EconGrowth => 0,
            InputCell::Inflation => 1,
            InputCell::Unemployment => 2,
            InputCell::SectorCredit { sector } => 3 + sector,
        }
    }

    pub fn describe(self) -> String {
        match self {
            InputCell::EconGrowth => "econ_growth".into(),
            InputCell::Inflation => "inflation".into(),
            InputCell::Unemployment => "unemployment".into(),
            InputCell::SectorCredit { sector } => format!("sector_credit[{sector}]"),
        }
    }
}

/// Full input snapshot of one scenario: 3 macro cells and 18 credit
/// cells. Last write wins; no history is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    pub macros: MacroInputs,
    /// Channeled credit per sector, Rupiah.
    pub credit: [f64; SECTOR_COUNT],
}

impl ScenarioInputs {
    pub fn set(&mut self, cell: InputCell, value: f64) {
        match cell {
            InputCell::EconGrowth => self.macros.econ_growth = value,
            InputCell::Inflation => self.macros.inflation = value,
            InputCell::Unemployment => self.macros.unemployment = value,
            InputCell::SectorCredit { sector } => self.credit[sector] = value,
        }
    }

    pub fn get(&self, cell: InputCell) -> f64 {
        match cell {
            InputCell::EconGrowth => self.macros.econ_growth,
            InputCell::Inflation => self.macros.inflation,
            InputCell::Unemployment => self.macros.unemployment,
            InputCell::SectorCredit { sector } => self.credit[sector],
        }
    }

    pub fn total_credit(&self) -> f64 {
        self.credit.iter().sum()
    }
}

/// Initial input values, derived from the latest month of the current
/// year so the desk shows live figures before the first edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDefaults {
    pub macros: MacroInputs,
    pub credit: [f64; SECTOR_COUNT],
}

impl ScenarioDefaults {
    pub fn from_records(records: &[HistoricalRecord]) -> DeskResult<Self> {
        let year = records
            .iter()
            .map(|r| r.year)
            .max()
            .ok_or_else(|| DeskError::DataLoad {
                reason: "cannot derive defaults from an empty dataset".into(),
            })?;
        let month = records
            .iter()
            .filter(|r| r.year == year)
            .map(|r| r.month)
            .max()
            .ok_or_else(|| DeskError::DataLoad {
                reason: format!("no records in current year {year}"),
            })?;

        let mut credit = [0.0; SECTOR_COUNT];
        let mut macros: Option<MacroInputs> = None;
        for r in records.iter().filter(|r| r.year == year && r.month == month) {
            credit[r.sector] = r.value_channel * BILLION;
            macros = Some(MacroInputs {
                econ_growth: r.econ_growth,
                inflation: r.inflation,
                unemployment: r.unemployment,
            });
        }

        let macros = macros.ok_or_else(|| DeskError::DataLoad {
            reason: format!("no records for ({year}, {})", month.code()),
        })?;
        for (sector, c) in credit.iter().enumerate() {
            if !(*c > 0.0) {
                return Err(DeskError::DataLoad {
                    reason: format!(
                        "default channeled credit for sector {sector} in ({year}, {}) \
                         is missing or non-positive",
                        month.code()
                    ),
                });
            }
        }

        Ok(Self { macros, credit })
    }
}

/// Publication state. `Stale` between a settled edit and the next
/// recomputation; `Published` when outputs match current inputs. The
/// transition is atomic — no partially published state is observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioState {
    Stale,
    Published,
}

pub struct Scenario {
    pub id: ScenarioId,
    pub(crate) inputs:       ScenarioInputs,
    pub(crate) display_mode: DisplayMode,
    pub(crate) state:        ScenarioState,
    pub(crate) published:    Option<OutputSnapshot>,
    pub(crate) debounce:     Debouncer,
}

impl Scenario {
    pub(crate) fn new(id: ScenarioId, defaults: &ScenarioDefaults, debounce_ms: TimeMs) -> Self {
        Self {
            id,
            inputs: ScenarioInputs {
                macros: defaults.macros,
                credit: defaults.credit,
            },
            display_mode: DisplayMode::Percentage,
            state: ScenarioState::Stale,
            published: None,
            debounce: Debouncer::new(debounce_ms),
        }
    }

    pub fn inputs(&self) -> &ScenarioInputs {
        &self.inputs
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn state(&self) -> ScenarioState {
        self.state
    }

    pub fn published(&self) -> Option<&OutputSnapshot> {
        self.published.as_ref()
    }
}

/// Numeric results of one recomputation, before formatting. Every
/// field is a pure function of the input snapshot and the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioFigures {
    /// Projected NPL fraction per sector.
    pub npl_fraction: [f64; SECTOR_COUNT],
    /// Projected NPL value per sector, Rupiah.
    pub npl_value: [f64; SECTOR_COUNT],
    pub total_credit: f64,
    pub total_npl_value: f64,
    pub total_npl_percent: f64,
    pub fee_rate: f64,
    pub fee_budget: f64,
    pub loss_limit: f64,
}

/// Recompute all figures for one input snapshot. Requires every credit
/// cell to be strictly positive — callers handle the all-zero sentinel
/// case before getting here.
pub fn compute_figures(
    predictor: &dyn Predictor,
    inputs: &ScenarioInputs,
) -> DeskResult<ScenarioFigures> {
    let mut npl_fraction = [0.0; SECTOR_COUNT];
    let mut npl_value = [0.0; SECTOR_COUNT];
    for sector in 0..SECTOR_COUNT {
        let credit = inputs.credit[sector];
        let fraction = predictor.npl_fraction(credit, sector, &inputs.macros)?;
        npl_fraction[sector] = fraction;
        npl_value[sector] = fraction * credit;
    }

    let total_credit = inputs.total_credit();
    let total_npl_value: f64 = npl_value.iter().sum();
    let total_npl_percent = total_npl_value / total_credit * 100.0;
    let fee_rate = crate::fee::fee_rate(total_npl_percent);
    let fee_budget = crate::fee::fee_budget(fee_rate, total_credit);
    let loss_limit = crate::fee::loss_limit(total_credit);

    Ok(ScenarioFigures {
        npl_fraction,
        npl_value,
        total_credit,
        total_npl_value,
        total_npl_percent,
        fee_rate,
        fee_budget,
        loss_limit,
    })
}
