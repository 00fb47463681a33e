use super::state::{Field, UiState};
use crate::i18n::MessageKey;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// A rect `pct_x` by `pct_y` percent of `area`, centered.
pub fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(vertical[1])[1]
}

fn field_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

pub fn draw_dialog(area: Rect, f: &mut Frame, state: &UiState) {
    let dialog = &state.dialog;
    let catalog = &state.host.catalog;
    let qa = dialog.mode().is_qa();

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            catalog.text(dialog.title_key()).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    let inner = outer.inner(area);
    f.render_widget(Clear, area);
    f.render_widget(outer, area);

    let constraints: Vec<Constraint> = if qa {
        vec![
            Constraint::Min(4),
            Constraint::Min(4),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ]
    } else {
        vec![
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ]
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let draft = dialog.store().draft();
    let label = if qa {
        MessageKey::QuestionLabel
    } else {
        MessageKey::ContentLabel
    };
    let mut idx = 0;
    draw_text_field(
        f,
        rows[idx],
        catalog.text(label),
        &draft.content,
        state.focus == Field::Content,
    );
    idx += 1;

    if qa {
        draw_text_field(
            f,
            rows[idx],
            catalog.text(MessageKey::AnswerLabel),
            &draft.answer,
            state.focus == Field::Answer,
        );
        idx += 1;
        draw_select(f, rows[idx], state);
        idx += 1;
    }

    draw_keywords(f, rows[idx], state);
    idx += 1;
    draw_buttons(f, rows[idx], state);
}

fn draw_text_field(f: &mut Frame, area: Rect, label: &str, text: &str, focused: bool) {
    let mut body = text.to_string();
    if focused {
        body.push('▏');
    }
    let p = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(field_block(label.to_string(), focused));
    f.render_widget(p, area);
}

fn draw_select(f: &mut Frame, area: Rect, state: &UiState) {
    let dialog = &state.dialog;
    let catalog = &state.host.catalog;
    let focused = state.focus == Field::ExtendedData;

    let none = catalog.text(MessageKey::NoneSelected).to_string();
    let current = dialog
        .selected_option()
        .map(|e| e.label.clone())
        .unwrap_or_else(|| none.clone());
    let title = format!("{}: {}", catalog.text(MessageKey::ExtendedDataLabel), current);
    let block = field_block(title, focused);

    if !focused {
        let hint = if dialog.options().is_empty() {
            "no APIs available"
        } else {
            "tab here and use ↑/↓ to choose"
        };
        let p = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let mut items = vec![ListItem::new(none)];
    items.extend(
        dialog
            .options()
            .iter()
            .map(|e| ListItem::new(e.label.clone())),
    );
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Yellow))
        .highlight_symbol("› ");
    let mut list_state = ListState::default();
    list_state.select(Some(state.option_cursor));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_keywords(f: &mut Frame, area: Rect, state: &UiState) {
    let focused = state.focus == Field::Keywords;
    let mut spans: Vec<Span> = Vec::new();
    for kw in &state.dialog.store().draft().keywords {
        spans.push(Span::styled(
            format!(" {kw} "),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::raw(state.keyword_input.clone()));
    if focused {
        spans.push(Span::raw("▏"));
    }
    let p = Paragraph::new(Line::from(spans)).block(field_block(
        state.host.catalog.text(MessageKey::KeywordsLabel).to_string(),
        focused,
    ));
    f.render_widget(p, area);
}

fn draw_buttons(f: &mut Frame, area: Rect, state: &UiState) {
    let catalog = &state.host.catalog;
    let button = |key: MessageKey, field: Field| {
        let style = if state.focus == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(format!("[ {} ]", catalog.text(key)), style)
    };

    let mut spans = vec![
        button(MessageKey::Save, Field::Save),
        Span::raw("  "),
        button(MessageKey::Cancel, Field::Cancel),
    ];
    if state.dialog.is_submitting() {
        spans.push(Span::styled("  Saving…", Style::default().fg(Color::Gray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
