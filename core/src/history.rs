//! Historical chart queries over the loaded dataset.
//!
//! These back the desk's historical tabs: monthly channeling/NPL
//! series per sector, year-wide totals, and cross-sector snapshots.
//! All of them are pure reads of the immutable record vector; a year
//! with no data yields empty series, never an error (the year slider
//! may point at sparse years).

use crate::{
    dataset::{HistoricalRecord, Month},
    sector::SECTOR_COUNT,
    types::{SectorIdx, Year},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub month: Month,
    pub value: f64,
}

/// One month-ordered series for one year. Values carry the source
/// table's unit (billions Rp for credit columns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub year:   Year,
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorSlice {
    pub sector: SectorIdx,
    pub value:  f64,
}

fn series(
    records: &[HistoricalRecord],
    year: Year,
    value: impl Fn(&HistoricalRecord) -> f64,
    filter: impl Fn(&HistoricalRecord) -> bool,
) -> MonthlySeries {
    let mut points = Vec::new();
    for month in Month::ALL {
        let mut sum = 0.0;
        let mut any = false;
        for r in records
            .iter()
            .filter(|r| r.year == year && r.month == month && filter(r))
        {
            sum += value(r);
            any = true;
        }
        if any {
            points.push(SeriesPoint { month, value: sum });
        }
    }
    MonthlySeries { year, points }
}

/// Monthly channeled credit and NPL value for one (year, sector).
pub fn channeling_and_npl(
    records: &[HistoricalRecord],
    year: Year,
    sector: SectorIdx,
) -> (MonthlySeries, MonthlySeries) {
    (
        series(records, year, |r| r.value_channel, |r| r.sector == sector),
        series(records, year, |r| r.value_npl, |r| r.sector == sector),
    )
}

/// Monthly NPL percentage for one (year, sector), as a percentage.
pub fn npl_percent_series(
    records: &[HistoricalRecord],
    year: Year,
    sector: SectorIdx,
) -> MonthlySeries {
    series(
        records,
        year,
        |r| r.percent_npl * 100.0,
        |r| r.sector == sector,
    )
}

/// Month-summed total channeling and total NPL value across all
/// sectors for one year.
pub fn yearly_totals(records: &[HistoricalRecord], year: Year) -> (MonthlySeries, MonthlySeries) {
    (
        series(records, year, |r| r.value_channel, |_| true),
        series(records, year, |r| r.value_npl, |_| true),
    )
}

/// Latest month of a year with any data — the reference month for the
/// cross-sector snapshots below.
pub fn reference_month(records: &[HistoricalRecord], year: Year) -> Option<Month> {
    records
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.month)
        .max()
}

/// Per-sector channeled-credit shares at the year's reference month
/// (pie chart data). Empty if the year has no records.
pub fn credit_shares(records: &[HistoricalRecord], year: Year) -> Vec<SectorSlice> {
    snapshot_by_sector(records, year, |r| r.value_channel)
}

/// Cross-sector NPL percentages at the year's reference month
/// (horizontal bar data). Empty if the year has no records.
pub fn npl_percent_by_sector(records: &[HistoricalRecord], year: Year) -> Vec<SectorSlice> {
    snapshot_by_sector(records, year, |r| r.percent_npl * 100.0)
}

fn snapshot_by_sector(
    records: &[HistoricalRecord],
    year: Year,
    value: impl Fn(&HistoricalRecord) -> f64,
) -> Vec<SectorSlice> {
    let Some(month) = reference_month(records, year) else {
        return Vec::new();
    };
    let mut slices = Vec::with_capacity(SECTOR_COUNT);
    for r in records
        .iter()
        .filter(|r| r.year == year && r.month == month)
    {
        slices.push(SectorSlice {
            sector: r.sector,
            value: value(r),
        });
    }
    slices.sort_by_key(|s| s.sector);
    slices
}
