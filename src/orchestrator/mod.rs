//! Application-level orchestration.
//!
//! `submission` owns the validate → persist lifecycle and its busy flag;
//! `controller` runs network requests for UI layers that keep dialog state on
//! their own thread.

mod controller;
mod submission;

pub(crate) use controller::{run_controller, DialogEvent, UiCommand};
pub use submission::{PendingSubmission, SubmissionController, SubmitRejection};
