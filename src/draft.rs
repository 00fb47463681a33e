use crate::model::{Mode, SegmentDraft};

/// In-progress segment fields plus the authoring mode they are validated under.
///
/// Setters replace unconditionally; validation happens at submit time.
#[derive(Debug, Clone)]
pub struct DraftStore {
    mode: Mode,
    draft: SegmentDraft,
}

impl DraftStore {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            draft: SegmentDraft::default(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &SegmentDraft {
        &self.draft
    }

    pub fn set_content(&mut self, text: impl Into<String>) {
        self.draft.content = text.into();
    }

    pub fn set_answer(&mut self, text: impl Into<String>) {
        self.draft.answer = text.into();
    }

    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.draft.keywords = keywords;
    }

    pub fn set_extended_data_ref(&mut self, id: impl Into<String>) {
        self.draft.extended_data_ref = id.into();
    }

    pub fn reset(&mut self) {
        self.draft = SegmentDraft::default();
    }
}
