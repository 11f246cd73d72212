// Reporter errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReporterError>;

#[derive(Debug, Error)]
pub enum ReporterError {
    /// The engine handed over something the reporter has no mapping for
    #[error("{0} isn't supported")]
    NotImplemented(String),

    #[error("failed to write service message: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid event: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
