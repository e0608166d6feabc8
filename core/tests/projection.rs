//! Projection and aggregate-formula tests, driven through the same
//! recomputation path the engine uses.

use npldesk_core::{
    demo,
    engine::recompute_snapshot,
    error::{DeskError, DeskResult},
    fee,
    model::{LinearNplModel, MacroInputs, Predictor},
    scenario::{compute_figures, DisplayMode, ScenarioId, ScenarioInputs},
    sector::SECTOR_COUNT,
    types::SectorIdx,
    DeskContext,
};

/// Predictor stub returning the same NPL fraction for every sector.
struct FlatPredictor(f64);

impl Predictor for FlatPredictor {
    fn npl_fraction(&self, credit: f64, sector: SectorIdx, _m: &MacroInputs) -> DeskResult<f64> {
        if !(credit > 0.0) {
            return Err(DeskError::InvalidInput {
                cell: format!("sector_credit[{sector}]"),
                reason: "credit must be positive".into(),
            });
        }
        Ok(self.0)
    }
}

/// Predictor stub with a distinct fraction per sector.
struct PerSectorPredictor;

impl Predictor for PerSectorPredictor {
    fn npl_fraction(&self, _credit: f64, sector: SectorIdx, _m: &MacroInputs) -> DeskResult<f64> {
        Ok(0.01 + 0.002 * sector as f64)
    }
}

fn macros() -> MacroInputs {
    MacroInputs {
        econ_growth: 5.0,
        inflation: 3.1,
        unemployment: 5.5,
    }
}

fn uniform_inputs(credit: f64) -> ScenarioInputs {
    ScenarioInputs {
        macros: macros(),
        credit: [credit; SECTOR_COUNT],
    }
}

fn context(predictor: Box<dyn Predictor>) -> DeskContext {
    DeskContext::new(demo::demo_records(), predictor).unwrap()
}

/// The worked example: 18 sectors at 3e9 each under a uniform 3% stub.
#[test]
fn end_to_end_uniform_projection() {
    let inputs = uniform_inputs(3e9);
    let figures = compute_figures(&FlatPredictor(0.03), &inputs).unwrap();

    assert_eq!(figures.total_credit, 5.4e10);
    assert!((figures.total_npl_value - 1.62e9).abs() < 1.0);
    assert!((figures.total_npl_percent - 3.0).abs() < 1e-9);

    let expected_rate = (((0.03 * 0.8) - 0.01) / 0.9) * 100.0;
    assert!((figures.fee_rate - expected_rate).abs() < 1e-9);
    assert_eq!(figures.loss_limit, 5.4e8);

    let snapshot = recompute_snapshot(
        &context(Box::new(FlatPredictor(0.03))),
        ScenarioId::Planning,
        &inputs,
        DisplayMode::Percentage,
    )
    .unwrap();
    assert_eq!(snapshot.total_npl_percent, "3.00 %");
    assert_eq!(snapshot.total_credit, "Rp 54,000,000,000.00");
    assert_eq!(snapshot.fee_rate, "1.56 %");
    assert_eq!(snapshot.loss_limit_budget.as_deref(), Some("Rp 540,000,000.00"));
    for sector in &snapshot.sectors {
        assert_eq!(sector.npl_percent, "3.00 %");
    }
}

/// The aggregate NPL value must be exactly the sum of the per-sector
/// values — same figures, same summation order.
#[test]
fn total_npl_value_equals_sector_sum_exactly() {
    let mut inputs = uniform_inputs(1e9);
    for (sector, credit) in inputs.credit.iter_mut().enumerate() {
        *credit = 1e9 * (sector + 1) as f64;
    }
    let figures = compute_figures(&PerSectorPredictor, &inputs).unwrap();

    let summed: f64 = figures.npl_value.iter().sum();
    assert_eq!(figures.total_npl_value, summed);
    assert_eq!(
        figures.total_npl_percent,
        figures.total_npl_value / figures.total_credit * 100.0
    );
}

/// The fee rate is a pure function of the aggregate NPL percentage.
#[test]
fn fee_rate_depends_only_on_total_npl_percent() {
    let inputs = uniform_inputs(2.5e9);
    let figures = compute_figures(&PerSectorPredictor, &inputs).unwrap();

    assert_eq!(figures.fee_rate, fee::fee_rate(figures.total_npl_percent));
    assert_eq!(
        figures.fee_budget,
        fee::fee_budget(figures.fee_rate, figures.total_credit)
    );
    assert_eq!(figures.loss_limit, figures.total_credit / 100.0);
}

/// Zero total credit publishes the sentinel, not NaN or infinity.
#[test]
fn zero_total_credit_publishes_undefined() {
    let context = context(Box::new(FlatPredictor(0.03)));
    let inputs = uniform_inputs(0.0);

    for id in ScenarioId::ALL {
        let snapshot =
            recompute_snapshot(&context, id, &inputs, DisplayMode::Percentage).unwrap();
        assert_eq!(snapshot.total_npl_percent, "undefined");
        assert_eq!(snapshot.fee_rate, "undefined");
        assert_eq!(snapshot.total_credit, "Rp 0.00");

        let rendered = serde_json::to_string(&snapshot).unwrap();
        assert!(!rendered.contains("NaN"));
        assert!(!rendered.contains("inf"));
    }
}

/// The comparison panel carries baselines and a ranked chart; the
/// other panels carry the budget figures instead.
#[test]
fn panel_specific_outputs() {
    let context = context(Box::new(PerSectorPredictor));
    let inputs = uniform_inputs(1e9);

    let planning = recompute_snapshot(
        &context,
        ScenarioId::Planning,
        &inputs,
        DisplayMode::Percentage,
    )
    .unwrap();
    assert!(planning.fee_budget.is_some());
    assert!(planning.loss_limit_budget.is_some());
    assert!(planning.comparison.is_none());
    assert!(planning.sectors.iter().all(|s| s.baseline_percent.is_none()));

    let comparison = recompute_snapshot(
        &context,
        ScenarioId::SectorComparison,
        &inputs,
        DisplayMode::Percentage,
    )
    .unwrap();
    assert!(comparison.fee_budget.is_none());
    assert!(comparison.sectors.iter().all(|s| s.baseline_percent.is_some()));

    let chart = comparison.comparison.expect("comparison chart");
    assert_eq!(chart.bars.len(), SECTOR_COUNT);
    for pair in chart.bars.windows(2) {
        assert!(pair[0].value >= pair[1].value, "bars must be ranked descending");
    }
    // PerSectorPredictor grows with the sector index, so the top bar
    // is the last sector.
    assert_eq!(chart.bars[0].sector, SECTOR_COUNT - 1);
}

/// Chart values follow the selected display mode.
#[test]
fn comparison_chart_respects_display_mode() {
    let context = context(Box::new(FlatPredictor(0.03)));
    let mut inputs = uniform_inputs(1e9);
    inputs.credit[4] = 9e9;

    let by_value = recompute_snapshot(
        &context,
        ScenarioId::SectorComparison,
        &inputs,
        DisplayMode::Value,
    )
    .unwrap();
    let chart = by_value.comparison.expect("comparison chart");
    // Uniform fraction: the largest credit wins on value.
    assert_eq!(chart.bars[0].sector, 4);
    assert!((chart.bars[0].value - 0.03 * 9e9).abs() < 1.0);
}

/// The deserialized artifact drives the whole pipeline end to end.
#[test]
fn desk_builds_with_the_demo_artifact() {
    let model = LinearNplModel::from_artifact(demo::demo_artifact()).unwrap();
    let context = DeskContext::new(demo::demo_records(), Box::new(model)).unwrap();
    let engine = npldesk_core::DeskEngine::build(context).unwrap();

    for id in ScenarioId::ALL {
        let snapshot = engine.published(id).expect("published at build");
        assert_eq!(snapshot.sectors.len(), SECTOR_COUNT);
        assert!(snapshot.total_npl_percent.ends_with(" %"));
        assert!(snapshot.total_credit.starts_with("Rp "));
    }
}
