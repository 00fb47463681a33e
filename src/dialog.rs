//! The "add segment" dialog: draft, options, and submission behind the
//! activation contract a host uses to open and dismiss it.

use crate::api::{ApiError, SegmentApi};
use crate::draft::DraftStore;
use crate::i18n::MessageKey;
use crate::model::{CreatedSegment, Mode, Notice, OptionEntry, SegmentTarget};
use crate::options::{OptionsLoader, OptionsTicket};
use crate::orchestrator::{PendingSubmission, SubmissionController, SubmitRejection};

/// Inputs the dialog receives from whoever opens it.
#[derive(Debug, Clone)]
pub struct DialogProps {
    pub doc_form: String,
    pub target: SegmentTarget,
}

/// Callbacks and notification sink supplied by the host.
pub trait DialogHost {
    fn notify(&mut self, notice: Notice);
    fn on_save(&mut self, created: &CreatedSegment);
    fn on_cancel(&mut self);
}

/// Identifies one opening of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationId(u64);

/// A submission handed to the host to run, tagged with the activation it
/// belongs to.
#[derive(Debug)]
pub struct SubmitRequest {
    pub activation: ActivationId,
    pub pending: PendingSubmission,
}

pub struct SegmentDialog {
    is_show: bool,
    activation: u64,
    store: DraftStore,
    options: OptionsLoader,
    controller: SubmissionController,
}

impl SegmentDialog {
    pub fn new(props: DialogProps) -> Self {
        Self {
            is_show: false,
            activation: 0,
            store: DraftStore::new(Mode::from_doc_form(&props.doc_form)),
            options: OptionsLoader::new(),
            controller: SubmissionController::new(props.target),
        }
    }

    pub fn is_show(&self) -> bool {
        self.is_show
    }

    pub fn mode(&self) -> Mode {
        self.store.mode()
    }

    pub fn title_key(&self) -> MessageKey {
        match self.mode() {
            Mode::QuestionAnswer => MessageKey::NewQaSegment,
            Mode::PlainText => MessageKey::NewTextSegment,
        }
    }

    pub fn store(&self) -> &DraftStore {
        &self.store
    }

    /// Direct field access for the input widgets.
    pub fn store_mut(&mut self) -> &mut DraftStore {
        &mut self.store
    }

    pub fn options(&self) -> &[OptionEntry] {
        self.options.entries()
    }

    pub fn selected_option(&self) -> Option<&OptionEntry> {
        self.options.selected_entry()
    }

    pub fn is_submitting(&self) -> bool {
        self.controller.is_submitting()
    }

    pub fn activation(&self) -> ActivationId {
        ActivationId(self.activation)
    }

    /// Show the dialog and start its options fetch. The fetch happens in every
    /// mode; the host runs it and reports back through [`Self::options_loaded`].
    pub fn activate(&mut self) -> OptionsTicket {
        self.show();
        self.options.begin_load()
    }

    /// Show the dialog and fetch its options inline. The dialog stays usable
    /// when the fetch fails; the error is returned for the caller to report.
    pub async fn open<A: SegmentApi + ?Sized>(&mut self, api: &A) -> Result<(), ApiError> {
        self.show();
        let res = self.options.load(api).await;
        self.sync_extended_data();
        res
    }

    fn show(&mut self) {
        self.activation += 1;
        self.is_show = true;
        tracing::debug!(activation = self.activation, mode = ?self.mode(), "dialog activated");
    }

    pub fn options_loaded(
        &mut self,
        ticket: OptionsTicket,
        result: Result<Vec<crate::model::RawOption>, ApiError>,
    ) -> bool {
        let replaced = self.options.finish_load(ticket, result);
        if replaced {
            self.sync_extended_data();
        }
        replaced
    }

    /// Drop a draft reference the option list no longer backs.
    fn sync_extended_data(&mut self) {
        if self.options.selected().is_none() && !self.store.draft().extended_data_ref.is_empty() {
            self.store.set_extended_data_ref(String::new());
        }
    }

    /// Select an extended data reference and mirror it into the draft.
    pub fn select_option(&mut self, value: &str) -> bool {
        match self.options.select(value) {
            Some(selected) => {
                let selected = selected.to_string();
                self.store.set_extended_data_ref(selected);
                true
            }
            None => false,
        }
    }

    /// Validate and claim the busy flag. Validation failures are reported to
    /// the host; a busy dialog ignores the request.
    pub fn begin_submit(&mut self, host: &mut dyn DialogHost) -> Option<SubmitRequest> {
        match self.controller.begin(self.store.draft(), self.mode()) {
            Ok(pending) => Some(SubmitRequest {
                activation: self.activation(),
                pending,
            }),
            Err(SubmitRejection::Busy) => {
                tracing::debug!("submit ignored while a save is in flight");
                None
            }
            Err(SubmitRejection::Invalid(e)) => {
                host.notify(Notice::error(e.message_key()));
                None
            }
        }
    }

    /// Apply the outcome of a submission started by [`Self::begin_submit`].
    ///
    /// On success: notify, reset, `on_save`, then close like a cancel. A late
    /// result for an earlier activation only notifies and calls `on_save`.
    pub fn finish_submit(
        &mut self,
        activation: ActivationId,
        result: Result<CreatedSegment, ApiError>,
        host: &mut dyn DialogHost,
    ) {
        match result {
            Ok(created) => {
                host.notify(Notice::success(MessageKey::SegmentAdded));
                let current = activation == self.activation() && self.is_show;
                if current {
                    self.reset();
                }
                host.on_save(&created);
                if current {
                    self.cancel(host);
                }
            }
            Err(e) => {
                host.notify(Notice::error(MessageKey::SubmitFailed).with_detail(e.to_string()));
            }
        }
    }

    /// Run a whole submission inline.
    pub async fn submit<A: SegmentApi + ?Sized>(&mut self, api: &A, host: &mut dyn DialogHost) {
        let Some(request) = self.begin_submit(host) else {
            return;
        };
        let result = request.pending.send(api).await;
        self.finish_submit(request.activation, result, host);
    }

    /// Dismiss the dialog, discarding the draft.
    pub fn cancel(&mut self, host: &mut dyn DialogHost) {
        self.reset();
        self.is_show = false;
        host.on_cancel();
    }

    fn reset(&mut self) {
        self.store.reset();
        self.options.clear_selection();
    }
}
