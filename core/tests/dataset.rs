//! Dataset store, baseline, and defaults tests over the demo fixtures.

use npldesk_core::{
    baseline::BaselineTable,
    dataset::{DatasetStore, Month, BILLION},
    demo,
    error::DeskError,
    history,
    scenario::ScenarioDefaults,
    sector::{SECTORS, SECTOR_COUNT},
};

#[test]
fn store_round_trips_the_demo_table() {
    let store = DatasetStore::in_memory().unwrap();
    let mut inserted = demo::demo_records();
    for record in &inserted {
        store.insert_record(record).unwrap();
    }

    let mut loaded = store.load_all().unwrap();
    inserted.sort_by_key(|r| (r.year, r.month, r.sector));
    loaded.sort_by_key(|r| (r.year, r.month, r.sector));
    assert_eq!(inserted, loaded);
}

#[test]
fn baselines_average_only_non_current_years() {
    let records = demo::demo_records();
    let baselines = BaselineTable::compute(&records).unwrap();
    assert_eq!(baselines.current_year(), 2020);

    for s in SECTORS.iter() {
        let mut sum = 0.0;
        let mut count = 0usize;
        for r in records.iter() {
            if r.year != 2020 && r.sector == s.idx {
                sum += r.percent_npl;
                count += 1;
            }
        }
        let expected = sum / count as f64 * 100.0;
        assert_eq!(baselines.baseline_npl(s.idx), expected);
    }
}

#[test]
fn sector_without_history_is_a_startup_fault() {
    // Keep only current-year rows for sector 3: its baseline window is
    // empty.
    let records: Vec<_> = demo::demo_records()
        .into_iter()
        .filter(|r| r.sector != 3 || r.year == 2020)
        .collect();

    match BaselineTable::compute(&records) {
        Err(DeskError::MissingSectorData { sector }) => {
            assert_eq!(sector, SECTORS[3].label);
        }
        other => panic!("expected MissingSectorData, got {other:?}"),
    }
}

#[test]
fn defaults_come_from_the_latest_month_of_the_current_year() {
    let records = demo::demo_records();
    let defaults = ScenarioDefaults::from_records(&records).unwrap();

    // The demo's current year runs through June.
    let reference: Vec<_> = records
        .iter()
        .filter(|r| r.year == 2020 && r.month == Month::Jun)
        .collect();
    assert_eq!(reference.len(), SECTOR_COUNT);

    for r in reference {
        assert_eq!(defaults.credit[r.sector], r.value_channel * BILLION);
        assert_eq!(defaults.macros.inflation, r.inflation);
        assert_eq!(defaults.macros.econ_growth, r.econ_growth);
        assert_eq!(defaults.macros.unemployment, r.unemployment);
    }
}

#[test]
fn defaults_require_positive_channeling_for_every_sector() {
    let mut records = demo::demo_records();
    for r in records
        .iter_mut()
        .filter(|r| r.year == 2020 && r.month == Month::Jun && r.sector == 7)
    {
        r.value_channel = 0.0;
    }

    assert!(matches!(
        ScenarioDefaults::from_records(&records),
        Err(DeskError::DataLoad { .. })
    ));
}

// ── Historical chart queries ───────────────────────────────────

#[test]
fn sector_series_cover_the_year_in_month_order() {
    let records = demo::demo_records();
    let (channeling, npl) = history::channeling_and_npl(&records, 2018, 0);

    assert_eq!(channeling.points.len(), 12);
    assert_eq!(npl.points.len(), 12);
    assert_eq!(channeling.points[0].month, Month::Jan);
    assert_eq!(channeling.points[11].month, Month::Dec);
    for pair in channeling.points.windows(2) {
        assert!(pair[0].month < pair[1].month);
    }
}

#[test]
fn yearly_totals_sum_across_sectors() {
    let records = demo::demo_records();
    let (totals, _) = history::yearly_totals(&records, 2019);

    let mut expected = 0.0;
    for r in records.iter() {
        if r.year == 2019 && r.month == Month::Jan {
            expected += r.value_channel;
        }
    }
    assert_eq!(totals.points[0].month, Month::Jan);
    assert_eq!(totals.points[0].value, expected);
}

#[test]
fn cross_sector_snapshots_use_the_reference_month() {
    let records = demo::demo_records();
    assert_eq!(history::reference_month(&records, 2020), Some(Month::Jun));
    assert_eq!(history::reference_month(&records, 2019), Some(Month::Dec));

    let shares = history::credit_shares(&records, 2020);
    assert_eq!(shares.len(), SECTOR_COUNT);
    for (i, slice) in shares.iter().enumerate() {
        assert_eq!(slice.sector, i);
        assert!(slice.value > 0.0);
    }

    let percents = history::npl_percent_by_sector(&records, 2020);
    assert_eq!(percents.len(), SECTOR_COUNT);
    // Percentages, not fractions.
    assert!(percents.iter().all(|s| s.value > 1.0 && s.value < 10.0));
}

#[test]
fn sparse_years_yield_empty_series_not_errors() {
    let records = demo::demo_records();
    let (channeling, npl) = history::channeling_and_npl(&records, 2031, 0);
    assert!(channeling.points.is_empty());
    assert!(npl.points.is_empty());
    assert!(history::credit_shares(&records, 2031).is_empty());
    assert_eq!(history::reference_month(&records, 2031), None);
}

#[test]
fn npl_percent_series_is_scaled_to_percent() {
    let records = demo::demo_records();
    let series = history::npl_percent_series(&records, 2018, 5);
    let raw = records
        .iter()
        .find(|r| r.year == 2018 && r.month == Month::Jan && r.sector == 5)
        .unwrap();
    assert_eq!(series.points[0].value, raw.percent_npl * 100.0);
}
