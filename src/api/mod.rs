mod console;
#[cfg(test)]
pub(crate) mod fake;

pub use console::ConsoleClient;

use crate::model::{CreatedSegment, RawOption, SubmissionPayload};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Network collaborators of the segment dialog.
#[async_trait]
pub trait SegmentApi: Send + Sync {
    /// List the extended data APIs a QA segment may reference. Read-only.
    async fn fetch_options(&self) -> Result<Vec<RawOption>, ApiError>;

    /// Persist a new segment under the given document. Never retried.
    async fn add_segment(
        &self,
        dataset_id: &str,
        document_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<CreatedSegment, ApiError>;
}
