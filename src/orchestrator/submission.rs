//! Submission lifecycle: validate, persist, and guard against concurrent saves.

use crate::api::{ApiError, SegmentApi};
use crate::model::{CreatedSegment, Mode, SegmentDraft, SegmentTarget, SubmissionPayload, SubmissionState};
use crate::validation::{validate, ValidationError};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Why a submit did not reach the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// A submission is already in flight.
    Busy,
    Invalid(ValidationError),
}

/// Clears the busy flag when dropped, whatever happened to the request.
#[derive(Debug)]
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A validated submission holding the busy flag.
#[derive(Debug)]
pub struct PendingSubmission {
    pub payload: SubmissionPayload,
    pub target: SegmentTarget,
    guard: BusyGuard,
}

impl PendingSubmission {
    /// Persist the payload. The busy flag is released when this returns,
    /// or when the future is dropped.
    pub async fn send<A: SegmentApi + ?Sized>(self, api: &A) -> Result<CreatedSegment, ApiError> {
        let PendingSubmission {
            payload,
            target,
            guard,
        } = self;
        let res = api
            .add_segment(&target.dataset_id, &target.document_id, &payload)
            .await;
        drop(guard);
        match &res {
            Ok(created) => tracing::info!(
                dataset_id = %target.dataset_id,
                document_id = %target.document_id,
                segment_id = %created.data.id,
                "segment added"
            ),
            Err(e) => tracing::error!(
                dataset_id = %target.dataset_id,
                document_id = %target.document_id,
                error = %e,
                "add segment failed"
            ),
        }
        res
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionController {
    target: SegmentTarget,
    busy: Arc<AtomicBool>,
}

impl SubmissionController {
    pub fn new(target: SegmentTarget) -> Self {
        Self {
            target,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn state(&self) -> SubmissionState {
        if self.busy.load(Ordering::Acquire) {
            SubmissionState::Submitting
        } else {
            SubmissionState::Idle
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.state() == SubmissionState::Submitting
    }

    /// Validate `draft` and take the busy flag.
    ///
    /// Nothing is claimed when validation fails, so the controller stays idle.
    pub fn begin(
        &self,
        draft: &SegmentDraft,
        mode: Mode,
    ) -> Result<PendingSubmission, SubmitRejection> {
        if self.is_submitting() {
            return Err(SubmitRejection::Busy);
        }
        let payload = validate(draft, mode).map_err(SubmitRejection::Invalid)?;
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitRejection::Busy);
        }
        tracing::debug!(?mode, "submission started");
        Ok(PendingSubmission {
            payload,
            target: self.target.clone(),
            guard: BusyGuard(self.busy.clone()),
        })
    }
}
