//! Message catalog for user-facing text.
//!
//! Workflow code only ever deals in [`MessageKey`]s; hosts resolve them here.
//! The built-in English strings can be overridden from a JSON object keyed by
//! the same identifiers.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    QuestionEmpty,
    AnswerEmpty,
    ContentEmpty,
    NewQaSegment,
    NewTextSegment,
    SegmentAdded,
    SubmitFailed,
    QuestionLabel,
    AnswerLabel,
    ContentLabel,
    KeywordsLabel,
    ExtendedDataLabel,
    NoneSelected,
    Save,
    Cancel,
}

impl MessageKey {
    pub const ALL: [MessageKey; 15] = [
        MessageKey::QuestionEmpty,
        MessageKey::AnswerEmpty,
        MessageKey::ContentEmpty,
        MessageKey::NewQaSegment,
        MessageKey::NewTextSegment,
        MessageKey::SegmentAdded,
        MessageKey::SubmitFailed,
        MessageKey::QuestionLabel,
        MessageKey::AnswerLabel,
        MessageKey::ContentLabel,
        MessageKey::KeywordsLabel,
        MessageKey::ExtendedDataLabel,
        MessageKey::NoneSelected,
        MessageKey::Save,
        MessageKey::Cancel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::QuestionEmpty => "questionEmpty",
            MessageKey::AnswerEmpty => "answerEmpty",
            MessageKey::ContentEmpty => "contentEmpty",
            MessageKey::NewQaSegment => "newQaSegment",
            MessageKey::NewTextSegment => "newTextSegment",
            MessageKey::SegmentAdded => "segmentAdded",
            MessageKey::SubmitFailed => "submitFailed",
            MessageKey::QuestionLabel => "questionLabel",
            MessageKey::AnswerLabel => "answerLabel",
            MessageKey::ContentLabel => "contentLabel",
            MessageKey::KeywordsLabel => "keywordsLabel",
            MessageKey::ExtendedDataLabel => "extendedDataLabel",
            MessageKey::NoneSelected => "noneSelected",
            MessageKey::Save => "save",
            MessageKey::Cancel => "cancel",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == id)
    }

    fn default_text(self) -> &'static str {
        match self {
            MessageKey::QuestionEmpty => "Question can not be empty",
            MessageKey::AnswerEmpty => "Answer can not be empty",
            MessageKey::ContentEmpty => "Content can not be empty",
            MessageKey::NewQaSegment => "Add Q&A Segment",
            MessageKey::NewTextSegment => "Add Text Segment",
            MessageKey::SegmentAdded => "Segment added",
            MessageKey::SubmitFailed => "Failed to add segment",
            MessageKey::QuestionLabel => "QUESTION",
            MessageKey::AnswerLabel => "ANSWER",
            MessageKey::ContentLabel => "CONTENT",
            MessageKey::KeywordsLabel => "KEYWORDS",
            MessageKey::ExtendedDataLabel => "API DATA",
            MessageKey::NoneSelected => "(none)",
            MessageKey::Save => "Save",
            MessageKey::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    overrides: HashMap<MessageKey, String>,
}

impl Catalog {
    /// Load overrides from a JSON object such as `{"questionEmpty": "..."}`.
    /// Unknown identifiers are logged and skipped.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read message catalog {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("parse message catalog {}", path.display()))?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let mut overrides = HashMap::new();
        for (id, text) in entries {
            match MessageKey::parse(&id) {
                Some(key) => {
                    overrides.insert(key, text);
                }
                None => tracing::warn!(id = %id, "ignoring unknown message id"),
            }
        }
        Self { overrides }
    }

    pub fn text(&self, key: MessageKey) -> &str {
        self.overrides
            .get(&key)
            .map(String::as_str)
            .unwrap_or_else(|| key.default_text())
    }

    /// Render a notice, appending its detail when present.
    pub fn render(&self, notice: &crate::model::Notice) -> String {
        match notice.detail.as_deref() {
            Some(detail) if !detail.is_empty() => format!("{}: {}", self.text(notice.key), detail),
            _ => self.text(notice.key).to_string(),
        }
    }
}
