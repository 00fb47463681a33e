//! Draft validation and payload construction.

use crate::i18n::MessageKey;
use crate::model::{Mode, SegmentDraft, SubmissionPayload};
use thiserror::Error;

/// Answer sent when the user leaves it blank but picked an extended data API;
/// the answer is then resolved from that API at query time.
pub const EXTERNAL_ANSWER_PLACEHOLDER: &str = "Please refer to the API interface data to answer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("content is empty")]
    ContentEmpty,
    #[error("question is empty")]
    QuestionEmpty,
    #[error("answer is empty and no extended data is selected")]
    AnswerEmpty,
}

impl ValidationError {
    pub fn message_key(self) -> MessageKey {
        match self {
            ValidationError::ContentEmpty => MessageKey::ContentEmpty,
            ValidationError::QuestionEmpty => MessageKey::QuestionEmpty,
            ValidationError::AnswerEmpty => MessageKey::AnswerEmpty,
        }
    }
}

/// Check `draft` under `mode` and build the wire payload.
///
/// Emptiness checks look at trimmed text, but the payload carries the raw text.
pub fn validate(draft: &SegmentDraft, mode: Mode) -> Result<SubmissionPayload, ValidationError> {
    let mut payload = match mode {
        Mode::PlainText => {
            if draft.content.trim().is_empty() {
                return Err(ValidationError::ContentEmpty);
            }
            SubmissionPayload {
                content: draft.content.clone(),
                answer: None,
                extended_data: None,
                keywords: None,
            }
        }
        Mode::QuestionAnswer => {
            if draft.content.trim().is_empty() {
                return Err(ValidationError::QuestionEmpty);
            }
            let has_ref = !draft.extended_data_ref.is_empty();
            let answer = if !draft.answer.trim().is_empty() {
                draft.answer.clone()
            } else if has_ref {
                EXTERNAL_ANSWER_PLACEHOLDER.to_string()
            } else {
                return Err(ValidationError::AnswerEmpty);
            };
            SubmissionPayload {
                content: draft.content.clone(),
                answer: Some(answer),
                extended_data: has_ref.then(|| draft.extended_data_ref.clone()),
                keywords: None,
            }
        }
    };

    if !draft.keywords.is_empty() {
        payload.keywords = Some(draft.keywords.clone());
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qa(content: &str, answer: &str, ext: &str) -> SegmentDraft {
        SegmentDraft {
            content: content.into(),
            answer: answer.into(),
            extended_data_ref: ext.into(),
            keywords: Vec::new(),
        }
    }

    #[test]
    fn plain_text_requires_content() {
        let draft = qa(" \n\t", "", "");
        assert_eq!(
            validate(&draft, Mode::PlainText),
            Err(ValidationError::ContentEmpty)
        );
    }

    #[test]
    fn plain_text_keeps_raw_content() {
        let payload = validate(&qa("  body \n", "ignored", "api-1"), Mode::PlainText).unwrap();
        assert_eq!(payload.content, "  body \n");
        assert_eq!(payload.answer, None);
        assert_eq!(payload.extended_data, None);
        assert_eq!(payload.keywords, None);
    }

    #[test]
    fn question_checked_before_anything_else() {
        for (answer, ext) in [("", ""), ("A1", ""), ("", "api-1"), ("A1", "api-1")] {
            assert_eq!(
                validate(&qa("   ", answer, ext), Mode::QuestionAnswer),
                Err(ValidationError::QuestionEmpty)
            );
        }
    }

    #[test]
    fn blank_answer_with_reference_uses_placeholder() {
        let payload = validate(&qa("Q1", "", "api-1"), Mode::QuestionAnswer).unwrap();
        assert_eq!(
            payload,
            SubmissionPayload {
                content: "Q1".into(),
                answer: Some(EXTERNAL_ANSWER_PLACEHOLDER.into()),
                extended_data: Some("api-1".into()),
                keywords: None,
            }
        );
    }

    #[test]
    fn blank_answer_without_reference_fails() {
        assert_eq!(
            validate(&qa("Q1", "", ""), Mode::QuestionAnswer),
            Err(ValidationError::AnswerEmpty)
        );
        assert_eq!(
            validate(&qa("Q1", "   ", ""), Mode::QuestionAnswer),
            Err(ValidationError::AnswerEmpty)
        );
    }

    #[test]
    fn explicit_answer_wins_over_placeholder() {
        let payload = validate(&qa("Q1", "A1", "api-1"), Mode::QuestionAnswer).unwrap();
        assert_eq!(payload.answer.as_deref(), Some("A1"));
        assert_eq!(payload.extended_data.as_deref(), Some("api-1"));

        let payload = validate(&qa("Q1", "A1", ""), Mode::QuestionAnswer).unwrap();
        assert_eq!(payload.extended_data, None);
    }

    #[test]
    fn keywords_attached_in_order_or_omitted() {
        let mut draft = qa("Q1", "A1", "");
        draft.keywords = vec!["b".into(), "a".into()];
        let payload = validate(&draft, Mode::QuestionAnswer).unwrap();
        assert_eq!(payload.keywords, Some(vec!["b".to_string(), "a".to_string()]));

        draft.keywords.clear();
        let payload = validate(&draft, Mode::QuestionAnswer).unwrap();
        assert_eq!(payload.keywords, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("keywords").is_none());
    }

    #[test]
    fn errors_map_to_message_keys() {
        assert_eq!(
            ValidationError::QuestionEmpty.message_key(),
            MessageKey::QuestionEmpty
        );
        assert_eq!(
            ValidationError::AnswerEmpty.message_key(),
            MessageKey::AnswerEmpty
        );
        assert_eq!(
            ValidationError::ContentEmpty.message_key(),
            MessageKey::ContentEmpty
        );
    }
}
