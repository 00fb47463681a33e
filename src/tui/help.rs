use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn key_line(key: &'static str, pad: usize, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(desc),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key_line("n", 11, "New segment"),
        key_line("q", 11, "Quit (document view)"),
        key_line("Ctrl-C", 6, "Quit"),
        key_line("?", 11, "Toggle this help"),
        Line::from(""),
        Line::from("Dialog:"),
        key_line("tab", 9, "Next field (shift-tab: previous)"),
        key_line("Ctrl-S", 6, "Save"),
        key_line("esc", 9, "Cancel and discard the draft"),
        key_line("enter", 7, "New line / add keyword / press button"),
        key_line("backspace", 3, "Delete (removes last keyword when empty)"),
        key_line("↑/↓", 9, "Choose API data (QA segments)"),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(Clear, area);
    f.render_widget(p, area);
}
