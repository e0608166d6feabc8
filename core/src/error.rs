use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Malformed startup data. Fatal: the desk refuses to start.
    #[error("Malformed startup data: {reason}")]
    DataLoad { reason: String },

    /// A sector has no historical records outside the current year, so
    /// its baseline is undefined. Fatal, startup-only.
    #[error("No historical records outside the current year for sector '{sector}'")]
    MissingSectorData { sector: String },

    /// A single rejected input. Recoverable: the scenario keeps its
    /// last published outputs.
    #[error("Invalid input for {cell}: {reason}")]
    InvalidInput { cell: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
