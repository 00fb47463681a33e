use crate::dialog::{DialogHost, SegmentDialog};
use crate::i18n::Catalog;
use crate::model::{CreatedSegment, Mode, Notice, NoticeKind, SegmentTarget};
use ratatui::style::Color;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_secs(3);

/// Focusable parts of the dialog, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Content,
    Answer,
    ExtendedData,
    Keywords,
    Save,
    Cancel,
}

impl Field {
    fn order(mode: Mode) -> &'static [Field] {
        match mode {
            Mode::QuestionAnswer => &[
                Field::Content,
                Field::Answer,
                Field::ExtendedData,
                Field::Keywords,
                Field::Save,
                Field::Cancel,
            ],
            Mode::PlainText => &[Field::Content, Field::Keywords, Field::Save, Field::Cancel],
        }
    }

    pub fn next(self, mode: Mode) -> Field {
        let order = Field::order(mode);
        let idx = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(idx + 1) % order.len()]
    }

    pub fn prev(self, mode: Mode) -> Field {
        let order = Field::order(mode);
        let idx = order.iter().position(|f| *f == self).unwrap_or(0);
        order[(idx + order.len() - 1) % order.len()]
    }
}

pub struct Toast {
    pub text: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn color(&self) -> Color {
        match self.kind {
            NoticeKind::Success => Color::Green,
            NoticeKind::Error => Color::Red,
        }
    }
}

/// One row of the "added this session" list.
pub struct SavedRow {
    pub at: String,
    pub id: String,
    pub preview: String,
}

/// The document view that opens the dialog and receives its callbacks.
pub struct HostView {
    pub catalog: Catalog,
    pub target: SegmentTarget,
    pub saved: Vec<SavedRow>,
    pub toast: Option<Toast>,
    pub info: String,
}

impl HostView {
    pub fn new(catalog: Catalog, target: SegmentTarget) -> Self {
        Self {
            catalog,
            target,
            saved: Vec::new(),
            toast: None,
            info: String::new(),
        }
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if let Some(t) = &self.toast {
            if now.duration_since(t.shown_at) >= TOAST_TTL {
                self.toast = None;
            }
        }
    }
}

impl DialogHost for HostView {
    fn notify(&mut self, notice: Notice) {
        self.toast = Some(Toast {
            text: self.catalog.render(&notice),
            kind: notice.kind,
            shown_at: Instant::now(),
        });
    }

    fn on_save(&mut self, created: &CreatedSegment) {
        let at = time::OffsetDateTime::now_local()
            .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
            .format(time::macros::format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_else(|_| "--:--:--".into());
        let preview: String = created
            .data
            .content
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(60)
            .collect();
        self.saved.push(SavedRow {
            at,
            id: created.data.id.clone(),
            preview,
        });
        self.info = format!("{} segment(s) added", self.saved.len());
    }

    fn on_cancel(&mut self) {
        self.info = "Press n to add another segment, q to quit".into();
    }
}

/// UI-thread state. The dialog is only ever touched from this thread.
pub struct UiState {
    pub dialog: SegmentDialog,
    pub host: HostView,
    pub focus: Field,
    /// Tag being typed in the keywords field.
    pub keyword_input: String,
    /// 0 = nothing selected, n = options()[n - 1].
    pub option_cursor: usize,
    pub show_help: bool,
}

impl UiState {
    pub fn new(dialog: SegmentDialog, host: HostView) -> Self {
        Self {
            dialog,
            host,
            focus: Field::Content,
            keyword_input: String::new(),
            option_cursor: 0,
            show_help: false,
        }
    }

    /// Reset widget-local state once the dialog has closed.
    pub fn reset_widgets(&mut self) {
        self.focus = Field::Content;
        self.keyword_input.clear();
        self.option_cursor = 0;
    }

    pub fn edit_text(&mut self, edit: TextEdit) {
        let store = self.dialog.store_mut();
        match self.focus {
            Field::Content => {
                let mut text = store.draft().content.clone();
                edit.apply(&mut text);
                store.set_content(text);
            }
            Field::Answer => {
                let mut text = store.draft().answer.clone();
                edit.apply(&mut text);
                store.set_answer(text);
            }
            _ => {}
        }
    }

    pub fn edit_keywords(&mut self, edit: TextEdit) {
        let mut keywords = self.dialog.store().draft().keywords.clone();
        match edit {
            TextEdit::Insert(c) => self.keyword_input.push(c),
            TextEdit::Newline => {
                let tag = self.keyword_input.trim();
                if !tag.is_empty() {
                    keywords.push(tag.to_string());
                    self.dialog.store_mut().set_keywords(keywords);
                }
                self.keyword_input.clear();
            }
            TextEdit::Backspace => {
                if self.keyword_input.pop().is_none() && keywords.pop().is_some() {
                    self.dialog.store_mut().set_keywords(keywords);
                }
            }
        }
    }

    /// Move the select cursor by `delta`, wrapping through "none".
    pub fn move_option(&mut self, delta: isize) {
        let slots = self.dialog.options().len() + 1;
        let next = (self.option_cursor as isize + delta).rem_euclid(slots as isize) as usize;
        let value = match next {
            0 => String::new(),
            n => self.dialog.options()[n - 1].value.clone(),
        };
        if self.dialog.select_option(&value) {
            self.option_cursor = next;
        }
    }

    /// Keep the cursor on the selected entry after the option list changes.
    pub fn sync_option_cursor(&mut self) {
        self.option_cursor = self
            .dialog
            .selected_option()
            .and_then(|sel| {
                self.dialog
                    .options()
                    .iter()
                    .position(|e| e.value == sel.value)
            })
            .map(|i| i + 1)
            .unwrap_or(0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    Newline,
    Backspace,
}

impl TextEdit {
    fn apply(self, text: &mut String) {
        match self {
            TextEdit::Insert(c) => text.push(c),
            TextEdit::Newline => text.push('\n'),
            TextEdit::Backspace => {
                text.pop();
            }
        }
    }
}
