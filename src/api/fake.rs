//! In-memory `SegmentApi` used by tests.

use super::{ApiError, SegmentApi};
use crate::model::{CreatedSegment, RawOption, SegmentRecord, SubmissionPayload};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub(crate) struct FakeApi {
    pub options: Mutex<Vec<RawOption>>,
    pub fail_options: AtomicBool,
    pub fail_add: AtomicBool,
    pub option_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub received: Mutex<Vec<(String, String, SubmissionPayload)>>,
    /// When set, `add_segment` parks until the gate is notified.
    pub gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn with_options(options: &[(&str, &str)]) -> Self {
        let api = Self::default();
        *api.options.lock().unwrap() = options
            .iter()
            .map(|(value, name)| RawOption {
                value: value.to_string(),
                name: name.to_string(),
            })
            .collect();
        api
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn status_error() -> ApiError {
        ApiError::Status {
            status: 500,
            body: "boom".into(),
        }
    }
}

#[async_trait]
impl SegmentApi for FakeApi {
    async fn fetch_options(&self) -> Result<Vec<RawOption>, ApiError> {
        self.option_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_options.load(Ordering::SeqCst) {
            return Err(Self::status_error());
        }
        Ok(self.options.lock().unwrap().clone())
    }

    async fn add_segment(
        &self,
        dataset_id: &str,
        document_id: &str,
        payload: &SubmissionPayload,
    ) -> Result<CreatedSegment, ApiError> {
        let n = self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push((
            dataset_id.to_string(),
            document_id.to_string(),
            payload.clone(),
        ));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::status_error());
        }
        Ok(CreatedSegment {
            data: SegmentRecord {
                id: format!("seg-{}", n + 1),
                content: payload.content.clone(),
                answer: payload.answer.clone(),
                keywords: payload.keywords.clone().unwrap_or_default(),
                ..Default::default()
            },
            doc_form: None,
        })
    }
}
