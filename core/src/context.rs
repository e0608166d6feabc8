//! The immutable startup context.
//!
//! Everything global-by-nature — the loaded dataset, the deserialized
//! model, the precomputed baselines — is constructed exactly once here
//! and passed to the engine. There is no reinitialization during the
//! process lifetime, and nothing in the context can be mutated after
//! construction.

use crate::{
    baseline::BaselineTable,
    dataset::{DatasetStore, HistoricalRecord},
    error::DeskResult,
    model::{LinearNplModel, Predictor},
};

pub struct DeskContext {
    records:   Vec<HistoricalRecord>,
    baselines: BaselineTable,
    model:     Box<dyn Predictor>,
}

impl DeskContext {
    /// Load the production context. Any fault is fatal: without the
    /// dataset and the model there is no meaningful partial operation.
    pub fn load(dataset_path: &str, model_path: &str) -> DeskResult<Self> {
        let store = DatasetStore::open(dataset_path)?;
        let records = store.load_all()?;
        let model = LinearNplModel::load(model_path)?;
        log::info!(
            "context loaded: {} records, model '{}'",
            records.len(),
            model.version()
        );
        Self::new(records, Box::new(model))
    }

    /// Build a context from already-loaded parts. Used by tests with a
    /// stub predictor and by the demo seeding path.
    pub fn new(records: Vec<HistoricalRecord>, model: Box<dyn Predictor>) -> DeskResult<Self> {
        let baselines = BaselineTable::compute(&records)?;
        Ok(Self {
            records,
            baselines,
            model,
        })
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn baselines(&self) -> &BaselineTable {
        &self.baselines
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.model.as_ref()
    }
}
