//! Read-only access to the historical credit-channeling table.
//!
//! RULE: Only this module talks to SQLite.
//! Everything downstream works on the loaded `HistoricalRecord` vector,
//! which is immutable for the life of the process.

use crate::{
    error::{DeskError, DeskResult},
    sector::{self, SECTOR_COUNT},
    types::{SectorIdx, Year},
};
use rusqlite::{params, Connection, OpenFlags};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Credit columns in the source table are stored in billions of Rupiah.
pub const BILLION: f64 = 1e9;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Month {
    Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan, Month::Feb, Month::Mar, Month::Apr, Month::May, Month::Jun,
        Month::Jul, Month::Aug, Month::Sep, Month::Oct, Month::Nov, Month::Dec,
    ];

    /// Three-letter code used by the source table.
    pub fn code(self) -> &'static str {
        match self {
            Month::Jan => "Jan", Month::Feb => "Feb", Month::Mar => "Mar",
            Month::Apr => "Apr", Month::May => "May", Month::Jun => "Jun",
            Month::Jul => "Jul", Month::Aug => "Aug", Month::Sep => "Sep",
            Month::Oct => "Oct", Month::Nov => "Nov", Month::Dec => "Dec",
        }
    }

    pub fn from_code(code: &str) -> Option<Month> {
        Month::ALL.into_iter().find(|m| m.code() == code)
    }
}

/// One row of the historical table. Immutable once loaded.
/// Invariant: one record per (year, month, sector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub year:          Year,
    pub month:         Month,
    pub sector:        SectorIdx,
    /// Channeled credit, billions Rp.
    pub value_channel: f64,
    /// Non-performing loan value, billions Rp.
    pub value_npl:     f64,
    /// NPL share of channeled credit, as a fraction.
    pub percent_npl:   f64,
    pub econ_growth:   f64,
    pub inflation:     f64,
    pub unemployment:  f64,
}

pub struct DatasetStore {
    conn: Connection,
}

impl DatasetStore {
    /// Open an existing dataset file read-only. Production path: the
    /// desk never writes to the historical table.
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )?;
        Ok(Self { conn })
    }

    /// Create (or overwrite the schema of) a dataset file. Used only by
    /// seeding tooling; the engine itself opens read-only.
    pub fn create(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory dataset (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> DeskResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS historical_record (
                year          INTEGER NOT NULL,
                month         TEXT    NOT NULL,
                sector        TEXT    NOT NULL,
                value_channel REAL    NOT NULL,
                value_npl     REAL    NOT NULL,
                percent_npl   REAL    NOT NULL,
                econ_growth   REAL    NOT NULL,
                inflation     REAL    NOT NULL,
                unemployment  REAL    NOT NULL,
                PRIMARY KEY (year, month, sector)
            );",
        )?;
        Ok(())
    }

    // ── Seeding (tooling and tests only) ───────────────────────

    pub fn insert_record(&self, r: &HistoricalRecord) -> DeskResult<()> {
        let sector = sector::sector(r.sector).ok_or_else(|| DeskError::DataLoad {
            reason: format!("sector index {} out of range 0..{SECTOR_COUNT}", r.sector),
        })?;
        self.conn.execute(
            "INSERT INTO historical_record (
                year, month, sector, value_channel, value_npl, percent_npl,
                econ_growth, inflation, unemployment
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                r.year,
                r.month.code(),
                sector.label,
                r.value_channel,
                r.value_npl,
                r.percent_npl,
                r.econ_growth,
                r.inflation,
                r.unemployment,
            ],
        )?;
        Ok(())
    }

    // ── Loading ────────────────────────────────────────────────

    /// Load and validate the full table. Any malformed row is fatal:
    /// the desk does not start with a partial dataset.
    pub fn load_all(&self) -> DeskResult<Vec<HistoricalRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT year, month, sector, value_channel, value_npl, percent_npl,
                    econ_growth, inflation, unemployment
             FROM historical_record
             ORDER BY year ASC, month ASC, sector ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, Year>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, f64>(6)?,
                row.get::<_, f64>(7)?,
                row.get::<_, f64>(8)?,
            ))
        })?;

        let mut records = Vec::new();
        let mut seen: HashSet<(Year, Month, SectorIdx)> = HashSet::new();
        for row in rows {
            let (year, month_code, label, value_channel, value_npl, percent_npl,
                 econ_growth, inflation, unemployment) = row?;

            let month = Month::from_code(&month_code).ok_or_else(|| DeskError::DataLoad {
                reason: format!("unknown month code '{month_code}' in row for year {year}"),
            })?;
            let sector_idx =
                sector::sector_by_label(&label).ok_or_else(|| DeskError::DataLoad {
                    reason: format!("unknown sector label '{label}' in row for year {year}"),
                })?;

            let numeric = [
                value_channel, value_npl, percent_npl,
                econ_growth, inflation, unemployment,
            ];
            if numeric.iter().any(|v| !v.is_finite()) {
                return Err(DeskError::DataLoad {
                    reason: format!(
                        "non-finite value in row ({year}, {month_code}, {label})"
                    ),
                });
            }

            if !seen.insert((year, month, sector_idx)) {
                return Err(DeskError::DataLoad {
                    reason: format!(
                        "duplicate record for ({year}, {month_code}, {label})"
                    ),
                });
            }

            records.push(HistoricalRecord {
                year,
                month,
                sector: sector_idx,
                value_channel,
                value_npl,
                percent_npl,
                econ_growth,
                inflation,
                unemployment,
            });
        }

        if records.is_empty() {
            return Err(DeskError::DataLoad {
                reason: "historical table is empty".into(),
            });
        }

        log::info!("loaded {} historical records", records.len());
        Ok(records)
    }
}
