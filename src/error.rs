use thiserror::Error;

/// The only failure the fetch pipeline knows about. Any transport, status
/// or decoding problem collapses into it and aborts the whole run.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metrics unavailable: {reason}")]
    Unavailable { reason: String },
}

impl MetricsError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Unavailable { reason } => reason,
        }
    }
}

impl From<reqwest::Error> for MetricsError {
    fn from(err: reqwest::Error) -> Self {
        Self::unavailable(format!("request failed: {err}"))
    }
}

impl From<serde_json::Error> for MetricsError {
    fn from(err: serde_json::Error) -> Self {
        Self::unavailable(format!("unexpected response shape: {err}"))
    }
}

impl From<std::io::Error> for MetricsError {
    fn from(err: std::io::Error) -> Self {
        Self::unavailable(format!("read failed: {err}"))
    }
}

pub type MetricsResult<T> = Result<T, MetricsError>;
