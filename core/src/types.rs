//! Shared primitive types used across the entire desk.

/// Milliseconds of engine-visible time. The engine never reads a wall
/// clock; callers pass `now` explicitly on every timed operation.
pub type TimeMs = u64;

/// Index into the fixed 18-sector enumeration, `0..SECTOR_COUNT`.
pub type SectorIdx = usize;

/// Calendar year as stored in the historical table.
pub type Year = i32;
