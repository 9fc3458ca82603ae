use thiserror::Error;

/// Errors raised while aggregating, summarising or rendering a chart.
///
/// Every variant is fatal for the render that produced it; a chart is never
/// drawn from partially computed statistics.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Statistics were requested for an empty sample, or no series were supplied.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// A scenario series lacks an age that the reference series has.
    #[error("series '{series}' has no value for age {age}")]
    MissingAgeKey { age: u32, series: String },

    /// A configuration value cannot produce a valid chart.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Decimal arithmetic left the representable range.
    #[error("decimal overflow while computing {0}")]
    Overflow(&'static str),

    /// A cell in an input file could not be read as a number.
    #[error("row {row}, column '{column}': cannot parse '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ChartError>;
