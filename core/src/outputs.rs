//! Published output snapshots — the engine's externally visible product.
//!
//! A snapshot is built as a whole from one consistent set of figures
//! and swapped in atomically; the front end never observes a mix of
//! old and new values. All strings follow the fixed textual contract
//! in `format`.

use crate::{
    baseline::BaselineTable,
    format,
    scenario::{DisplayMode, ScenarioFigures, ScenarioId},
    sector::{SECTORS, SECTOR_COUNT},
    types::SectorIdx,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Descriptive prefix of every per-sector NPL value line.
const SECTOR_VALUE_PREFIX: &str = "Proyeksi NPL Kredit UMKM untuk sektor ekonomi";

/// Descriptive prefix of the aggregate NPL value line.
const TOTAL_VALUE_PREFIX: &str =
    "Proyeksi total nilai NPL atas Penyaluran Kredit kepada UMKM adalah";

/// One sector's published projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorProjection {
    pub sector: SectorIdx,
    pub label:  String,
    /// e.g. "3.00 %"
    pub npl_percent: String,
    /// e.g. "Proyeksi NPL Kredit UMKM untuk sektor ekonomi Perikanan 60,000,000.00"
    pub npl_value: String,
    /// Historical mean, comparison panel only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_percent: Option<String>,
}

/// One bar of the comparison chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    pub sector: SectorIdx,
    pub value:  f64,
}

/// Cross-sector comparison dataset: bars ranked descending by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonChart {
    pub mode: DisplayMode,
    pub bars: Vec<ChartBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSnapshot {
    pub scenario: ScenarioId,
    /// Always all 18 sectors, in display order.
    pub sectors: Vec<SectorProjection>,
    pub total_npl_percent: String,
    pub total_npl_value:   String,
    pub total_credit:      String,
    pub fee_rate:          String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loss_limit_budget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonChart>,
}

impl OutputSnapshot {
    pub(crate) fn from_figures(
        id: ScenarioId,
        figures: &ScenarioFigures,
        baselines: Option<&BaselineTable>,
        mode: DisplayMode,
    ) -> Self {
        let sectors = SECTORS
            .iter()
            .map(|s| SectorProjection {
                sector: s.idx,
                label: s.label.to_string(),
                npl_percent: format::percent(figures.npl_fraction[s.idx] * 100.0),
                npl_value: format!(
                    "{SECTOR_VALUE_PREFIX} {} {}",
                    s.label,
                    format::grouped(figures.npl_value[s.idx])
                ),
                baseline_percent: baselines
                    .map(|b| format::percent(b.baseline_npl(s.idx))),
            })
            .collect();

        let comparison = id.is_comparison().then(|| {
            let mut bars: Vec<ChartBar> = (0..SECTOR_COUNT)
                .map(|sector| ChartBar {
                    sector,
                    value: match mode {
                        DisplayMode::Percentage => figures.npl_fraction[sector] * 100.0,
                        DisplayMode::Value => figures.npl_value[sector],
                    },
                })
                .collect();
            bars.sort_by(|a, b| {
                b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal)
            });
            ComparisonChart { mode, bars }
        });

        Self {
            scenario: id,
            sectors,
            total_npl_percent: format::percent(figures.total_npl_percent),
            total_npl_value: format!(
                "{TOTAL_VALUE_PREFIX} Rp {}",
                format::grouped(figures.total_npl_value)
            ),
            total_credit: format::rupiah(figures.total_credit),
            fee_rate: format::percent(figures.fee_rate),
            fee_budget: id
                .publishes_budgets()
                .then(|| format::rupiah(figures.fee_budget)),
            loss_limit_budget: id
                .publishes_budgets()
                .then(|| format::rupiah(figures.loss_limit)),
            comparison,
        }
    }

    /// Sentinel snapshot for zero total credit: aggregates that divide
    /// by the total are "undefined"; the total itself and the flat
    /// loss limit remain well-defined zeros. Baselines come from the
    /// context, not the inputs, so they are still published.
    pub(crate) fn undefined(
        id: ScenarioId,
        baselines: Option<&BaselineTable>,
        mode: DisplayMode,
    ) -> Self {
        let sectors = SECTORS
            .iter()
            .map(|s| SectorProjection {
                sector: s.idx,
                label: s.label.to_string(),
                npl_percent: format::UNDEFINED.to_string(),
                npl_value: format!("{SECTOR_VALUE_PREFIX} {} {}", s.label, format::UNDEFINED),
                baseline_percent: baselines
                    .map(|b| format::percent(b.baseline_npl(s.idx))),
            })
            .collect();

        Self {
            scenario: id,
            sectors,
            total_npl_percent: format::UNDEFINED.to_string(),
            total_npl_value: format!("{TOTAL_VALUE_PREFIX} {}", format::UNDEFINED),
            total_credit: format::rupiah(0.0),
            fee_rate: format::UNDEFINED.to_string(),
            fee_budget: id.publishes_budgets().then(|| format::UNDEFINED.to_string()),
            loss_limit_budget: id.publishes_budgets().then(|| format::rupiah(0.0)),
            comparison: id.is_comparison().then(|| ComparisonChart {
                mode,
                bars: Vec::new(),
            }),
        }
    }
}
