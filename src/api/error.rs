//! API Errors
//!
//! Failure taxonomy for requests against the grocery resource.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// A failed request. `Clone` so it can live inside reactive state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request could not be sent or no response arrived
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: &'static str,
        url: String,
        message: String,
    },

    /// Server answered with a non-2xx status
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// Response body did not match the expected shape
    #[error("{method} {url} sent an unexpected body: {message}")]
    Decode {
        method: &'static str,
        url: String,
        message: String,
    },

    /// First failure of a bulk operation; the other requests were still awaited
    #[error("{failed} of {total} requests failed, first error: {first}")]
    Batch {
        failed: usize,
        total: usize,
        first: Box<ApiError>,
    },
}

impl ApiError {
    pub(crate) fn from_reqwest(method: &'static str, url: &str, err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            ApiError::Status { method, url: url.to_string(), status: status.as_u16() }
        } else if err.is_decode() {
            ApiError::Decode { method, url: url.to_string(), message: err.to_string() }
        } else {
            ApiError::Transport { method, url: url.to_string(), message: err.to_string() }
        }
    }

    /// Whether any part of the operation may have reached the server
    pub fn may_have_partially_applied(&self) -> bool {
        matches!(self, ApiError::Batch { failed, total, .. } if failed < total)
    }
}
