use std::{io, path::PathBuf};
use thiserror::Error;

/// Every way a query run can fail. None of them are retried.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("RPC endpoint {url} is unreachable: {reason}")]
    Connection { url: String, reason: String },

    #[error("interface definition {} could not be read", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interface definition {} is malformed: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("contract call `{method}` failed: {reason}")]
    Call { method: &'static str, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write report")]
    Output(#[from] io::Error),
}

impl QueryError {
    pub(crate) fn call(method: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Call {
            method,
            reason: err.to_string(),
        }
    }
}

pub type Result<T, E = QueryError> = std::result::Result<T, E>;
