//! Predictor adapter for the pre-trained NPL regression artifact.
//!
//! RULE: Only this module builds feature vectors.
//! Callers hand over a credit amount, a sector index, and the macro
//! indicators; the column layout of the artifact never leaks out.

use crate::{
    error::{DeskError, DeskResult},
    sector::SECTOR_COUNT,
    types::SectorIdx,
};
use serde::{Deserialize, Serialize};

/// Macro indicator cells shared by every prediction in a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroInputs {
    pub econ_growth:  f64,
    pub inflation:    f64,
    pub unemployment: f64,
}

/// Feature vector length: ln(credit), bias, 3 macro indicators, and the
/// 18-slot sector one-hot block.
pub const FEATURE_COUNT: usize = 5 + SECTOR_COUNT;

/// One-hot column assigned to each sector by the artifact's training
/// pipeline. Fixed per artifact version. The display order in
/// `sector::SECTORS` and this encoding order are unrelated — never
/// derive one from the other.
const ONE_HOT_COLUMN: [usize; SECTOR_COUNT] =
    [15, 13, 14, 2, 9, 8, 12, 10, 17, 11, 16, 0, 5, 4, 3, 6, 1, 7];

/// The one opaque model call the engine depends on. Implemented by the
/// deserialized artifact in production and by stubs in tests.
pub trait Predictor: Send + Sync {
    /// Projected NPL fraction for channeling `credit` Rupiah to
    /// `sector` under the given macro indicators. `credit` must be
    /// strictly positive — the model consumes its natural logarithm.
    fn npl_fraction(
        &self,
        credit: f64,
        sector: SectorIdx,
        macros: &MacroInputs,
    ) -> DeskResult<f64>;
}

/// On-disk shape of the serialized model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_version: String,
    pub coefficients:  Vec<f64>,
}

pub struct LinearNplModel {
    version:      String,
    coefficients: [f64; FEATURE_COUNT],
}

impl LinearNplModel {
    pub fn load(path: &str) -> DeskResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeskError::DataLoad {
            reason: format!("cannot read model artifact {path}: {e}"),
        })?;
        let artifact: ModelArtifact = serde_json::from_str(&content)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> DeskResult<Self> {
        let count = artifact.coefficients.len();
        let coefficients: [f64; FEATURE_COUNT] =
            artifact.coefficients.try_into().map_err(|_| DeskError::DataLoad {
                reason: format!(
                    "model artifact '{}' has {count} coefficients, expected {FEATURE_COUNT}",
                    artifact.model_version
                ),
            })?;
        Ok(Self {
            version: artifact.model_version,
            coefficients,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    fn features(credit: f64, sector: SectorIdx, macros: &MacroInputs) -> [f64; FEATURE_COUNT] {
        let mut f = [0.0; FEATURE_COUNT];
        f[0] = credit.ln();
        f[1] = 1.0;
        f[2] = macros.inflation;
        f[3] = macros.econ_growth;
        f[4] = macros.unemployment;
        f[5 + ONE_HOT_COLUMN[sector]] = 1.0;
        f
    }
}

impl Predictor for LinearNplModel {
    fn npl_fraction(
        &self,
        credit: f64,
        sector: SectorIdx,
        macros: &MacroInputs,
    ) -> DeskResult<f64> {
        if sector >= SECTOR_COUNT {
            return Err(DeskError::InvalidInput {
                cell: format!("sector_credit[{sector}]"),
                reason: format!("sector index out of range 0..{SECTOR_COUNT}"),
            });
        }
        if !(credit > 0.0) {
            return Err(DeskError::InvalidInput {
                cell: format!("sector_credit[{sector}]"),
                reason: format!("channeled credit must be strictly positive, got {credit}"),
            });
        }
        let features = Self::features(credit, sector, macros);
        let fraction = features
            .iter()
            .zip(self.coefficients.iter())
            .map(|(f, c)| f * c)
            .sum();
        Ok(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macros() -> MacroInputs {
        MacroInputs {
            econ_growth: 5.0,
            inflation: 3.0,
            unemployment: 5.5,
        }
    }

    fn flat_artifact() -> ModelArtifact {
        // Bias-only model: every prediction is exactly 0.04.
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[1] = 0.04;
        ModelArtifact {
            model_version: "test-1".into(),
            coefficients,
        }
    }

    #[test]
    fn one_hot_columns_form_a_permutation() {
        let mut seen = [false; SECTOR_COUNT];
        for col in ONE_HOT_COLUMN {
            assert!(col < SECTOR_COUNT);
            assert!(!seen[col], "column {col} assigned twice");
            seen[col] = true;
        }
    }

    #[test]
    fn bias_only_model_predicts_its_intercept() {
        let model = LinearNplModel::from_artifact(flat_artifact()).unwrap();
        let fraction = model.npl_fraction(1e9, 3, &macros()).unwrap();
        assert!((fraction - 0.04).abs() < 1e-12);
    }

    #[test]
    fn sector_offset_lands_on_the_assigned_column() {
        let mut artifact = flat_artifact();
        // Give sector 0's training column an extra offset.
        artifact.coefficients[5 + ONE_HOT_COLUMN[0]] = 0.01;
        let model = LinearNplModel::from_artifact(artifact).unwrap();

        let with_offset = model.npl_fraction(1e9, 0, &macros()).unwrap();
        let without = model.npl_fraction(1e9, 1, &macros()).unwrap();
        assert!((with_offset - 0.05).abs() < 1e-12);
        assert!((without - 0.04).abs() < 1e-12);
    }

    #[test]
    fn log_credit_enters_the_first_column() {
        let mut artifact = flat_artifact();
        artifact.coefficients[0] = 0.001;
        let model = LinearNplModel::from_artifact(artifact).unwrap();

        let fraction = model.npl_fraction(1e9, 0, &macros()).unwrap();
        let expected = 0.04 + 0.001 * (1e9f64).ln();
        assert!((fraction - expected).abs() < 1e-12);
    }

    #[test]
    fn non_positive_credit_is_rejected() {
        let model = LinearNplModel::from_artifact(flat_artifact()).unwrap();
        for bad in [0.0, -1.0] {
            let err = model.npl_fraction(bad, 0, &macros());
            assert!(matches!(err, Err(DeskError::InvalidInput { .. })));
        }
    }

    #[test]
    fn wrong_coefficient_count_is_a_load_fault() {
        let artifact = ModelArtifact {
            model_version: "test-bad".into(),
            coefficients: vec![0.0; FEATURE_COUNT - 1],
        };
        assert!(matches!(
            LinearNplModel::from_artifact(artifact),
            Err(DeskError::DataLoad { .. })
        ));
    }
}
