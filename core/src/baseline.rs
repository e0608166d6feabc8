//! Per-sector historical NPL baselines.
//!
//! Computed once, eagerly, at startup: the mean historical NPL share
//! of each sector over every record outside the current year. The
//! comparison panel shows these next to the live projections.

use crate::{
    dataset::HistoricalRecord,
    error::{DeskError, DeskResult},
    sector::{SECTORS, SECTOR_COUNT},
    types::{SectorIdx, Year},
};

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineTable {
    /// Mean historical NPL per sector, as a percentage.
    percent:      [f64; SECTOR_COUNT],
    current_year: Year,
}

impl BaselineTable {
    /// A sector with zero qualifying records has no defined baseline;
    /// that is a startup fault, never a silent zero.
    pub fn compute(records: &[HistoricalRecord]) -> DeskResult<Self> {
        let current_year = records
            .iter()
            .map(|r| r.year)
            .max()
            .ok_or_else(|| DeskError::DataLoad {
                reason: "cannot compute baselines over an empty dataset".into(),
            })?;

        let mut percent = [0.0; SECTOR_COUNT];
        for s in SECTORS.iter() {
            let mut sum = 0.0;
            let mut count = 0usize;
            for r in records.iter() {
                if r.year != current_year && r.sector == s.idx {
                    sum += r.percent_npl;
                    count += 1;
                }
            }
            if count == 0 {
                return Err(DeskError::MissingSectorData {
                    sector: s.label.to_string(),
                });
            }
            percent[s.idx] = sum / count as f64 * 100.0;
        }

        log::debug!("baselines computed over records before {current_year}");
        Ok(Self {
            percent,
            current_year,
        })
    }

    /// Historical mean NPL for `sector`, as a percentage.
    pub fn baseline_npl(&self, sector: SectorIdx) -> f64 {
        self.percent[sector]
    }

    /// The year excluded from the baseline window.
    pub fn current_year(&self) -> Year {
        self.current_year
    }
}
