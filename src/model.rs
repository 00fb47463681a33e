use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// `doc_form` value that switches the dialog into question/answer authoring.
pub const QA_DOC_FORM: &str = "qa_model";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub user_agent: String,
}

/// Where a new segment is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTarget {
    pub dataset_id: String,
    pub document_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    PlainText,
    QuestionAnswer,
}

impl Mode {
    pub fn from_doc_form(doc_form: &str) -> Self {
        if doc_form == QA_DOC_FORM {
            Mode::QuestionAnswer
        } else {
            Mode::PlainText
        }
    }

    pub fn is_qa(self) -> bool {
        self == Mode::QuestionAnswer
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDraft {
    /// Body text, or the question in QA mode.
    pub content: String,
    pub answer: String,
    /// Empty string means no reference selected.
    pub extended_data_ref: String,
    pub keywords: Vec<String>,
}

/// Entry as returned by the extended data API listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOption {
    pub value: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

impl From<RawOption> for OptionEntry {
    fn from(raw: RawOption) -> Self {
        Self {
            label: format!("{}:{}", raw.name, raw.value),
            value: raw.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// Segment record echoed back by the console after a successful create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub position: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub word_count: Option<u64>,
    #[serde(default)]
    pub tokens: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatedSegment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: SegmentRecord,
    #[serde(default)]
    pub doc_form: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient user-facing message; the host resolves `key` through its catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub key: crate::i18n::MessageKey,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(key: crate::i18n::MessageKey) -> Self {
        Self {
            kind: NoticeKind::Success,
            key,
            detail: None,
        }
    }

    pub fn error(key: crate::i18n::MessageKey) -> Self {
        Self {
            kind: NoticeKind::Error,
            key,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_form_selects_mode() {
        assert_eq!(Mode::from_doc_form("qa_model"), Mode::QuestionAnswer);
        assert_eq!(Mode::from_doc_form("text_model"), Mode::PlainText);
        assert_eq!(Mode::from_doc_form(""), Mode::PlainText);
    }

    #[test]
    fn option_label_joins_name_and_value() {
        let entry = OptionEntry::from(RawOption {
            value: "x".into(),
            name: "N".into(),
        });
        assert_eq!(entry.value, "x");
        assert_eq!(entry.label, "N:x");
    }

    #[test]
    fn payload_omits_absent_fields() {
        let payload = SubmissionPayload {
            content: "body".into(),
            answer: None,
            extended_data: Some("api-1".into()),
            keywords: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "content": "body", "extendedData": "api-1" })
        );
    }

    #[test]
    fn created_segment_decodes_partial_response() {
        let created: CreatedSegment = serde_json::from_str(
            r#"{"data":{"id":"seg-1","content":"hello","keywords":["a"]},"doc_form":"text_model"}"#,
        )
        .unwrap();
        assert_eq!(created.data.id, "seg-1");
        assert_eq!(created.data.keywords, vec!["a".to_string()]);
        assert!(created.data.answer.is_none());
        assert_eq!(created.doc_form.as_deref(), Some("text_model"));
    }

    #[test]
    fn created_segment_tolerates_null_fields() {
        let created: CreatedSegment = serde_json::from_str(
            r#"{"data":{"id":"seg-1","content":null,"keywords":null,"position":null},"doc_form":null}"#,
        )
        .unwrap();
        assert_eq!(created.data.id, "seg-1");
        assert_eq!(created.data.content, "");
        assert!(created.data.keywords.is_empty());
        assert!(created.data.position.is_none());

        let empty: CreatedSegment = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert_eq!(empty.data.id, "");
    }
}
