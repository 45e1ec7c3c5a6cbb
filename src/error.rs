use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid date: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Unknown granularity: {0} (expected daily, weekly, monthly or annual)")]
    UnknownGranularity(String),

    #[error("Unknown dimension: {0}")]
    UnknownDimension(String),

    #[error("Unknown measure: {0}")]
    UnknownMeasure(String),

    #[error("No data file given. Pass --file or run `shopscope config use <file>`.")]
    NoDataFile,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
