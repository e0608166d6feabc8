//! Guarantee-fee (IJP) and loss-limit policy formulas.
//!
//! The constants below are policy parameters of the guarantee program,
//! not derived quantities. Published figures must reproduce these
//! formulas exactly.

/// Share of the projected NPL covered by the guarantee.
pub const COVERAGE_FACTOR: f64 = 0.8;

/// First-loss deductible retained by the channeling banks (fraction).
pub const DEDUCTIBLE: f64 = 0.01;

/// Loading divisor applied after the deductible.
pub const LOADING_DIVISOR: f64 = 0.9;

/// Loss-limit budget divisor: a flat 1% of total channeled credit.
pub const LOSS_LIMIT_DIVISOR: f64 = 100.0;

/// Guarantee-fee rate (percent) from the aggregate NPL percentage.
pub fn fee_rate(total_npl_percent: f64) -> f64 {
    (((total_npl_percent / 100.0) * COVERAGE_FACTOR) - DEDUCTIBLE) / LOADING_DIVISOR * 100.0
}

/// Guarantee-fee budget (Rupiah) from the fee rate and total credit.
pub fn fee_budget(fee_rate_percent: f64, total_credit: f64) -> f64 {
    fee_rate_percent * total_credit / 100.0
}

/// Loss-limit budget: flat share of total channeled credit,
/// independent of the fee rate.
pub fn loss_limit(total_credit: f64) -> f64 {
    total_credit / LOSS_LIMIT_DIVISOR
}
