mod dialog_view;
mod help;
mod state;

use crate::api::{ConsoleClient, SegmentApi};
use crate::cli::{build_props, Cli};
use crate::dialog::SegmentDialog;
use crate::i18n::Catalog;
use crate::orchestrator::{self, DialogEvent, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Terminal,
};
use state::{Field, HostView, TextEdit, UiState};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli, client: ConsoleClient, catalog: Catalog) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<DialogEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
    let api: Arc<dyn SegmentApi> = Arc::new(client);

    let props = build_props(&args);
    let host = HostView::new(catalog, props.target.clone());
    let ui_state = UiState::new(SegmentDialog::new(props), host);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(ui_state, event_rx, cmd_tx));

    orchestrator::run_controller(api, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(res) => res?,
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }
    Ok(())
}

/// What a key press asks of the loop beyond state changes.
#[derive(Debug)]
enum KeyAction {
    None,
    Send(UiCommand),
    Quit,
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut state: UiState,
    mut event_rx: UnboundedReceiver<DialogEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // The dialog opens as soon as the document view is up.
    let ticket = state.dialog.activate();
    let _ = cmd_tx.send(UiCommand::FetchOptions(ticket));

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now() - tick_rate;

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            apply_event(&mut state, ev);
        }

        if last_tick.elapsed() >= tick_rate {
            state.host.expire_toast(Instant::now());
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k) {
                    KeyAction::None => {}
                    KeyAction::Send(cmd) => {
                        let _ = cmd_tx.send(cmd);
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
                // Redraw right away so typing does not lag a tick behind.
                last_tick = Instant::now() - tick_rate;
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn apply_event(state: &mut UiState, ev: DialogEvent) {
    match ev {
        DialogEvent::OptionsFetched { ticket, result } => {
            if state.dialog.options_loaded(ticket, result) {
                state.sync_option_cursor();
            }
        }
        DialogEvent::SubmissionFinished { activation, result } => {
            let was_open = state.dialog.is_show();
            state.dialog.finish_submit(activation, result, &mut state.host);
            if was_open && !state.dialog.is_show() {
                state.reset_widgets();
            }
        }
    }
}

fn handle_key(state: &mut UiState, k: KeyEvent) -> KeyAction {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if state.show_help {
        if matches!(k.code, KeyCode::Char('?') | KeyCode::Esc) {
            state.show_help = false;
        }
        return KeyAction::None;
    }
    if !state.dialog.is_show() {
        return match k.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('n') => {
                state.reset_widgets();
                KeyAction::Send(UiCommand::FetchOptions(state.dialog.activate()))
            }
            KeyCode::Char('?') => {
                state.show_help = true;
                KeyAction::None
            }
            _ => KeyAction::None,
        };
    }

    let mode = state.dialog.mode();
    match (k.modifiers, k.code) {
        (m, KeyCode::Char('s')) if m.contains(KeyModifiers::CONTROL) => submit(state),
        (_, KeyCode::Esc) => {
            cancel(state);
            KeyAction::None
        }
        (_, KeyCode::Tab) => {
            state.focus = state.focus.next(mode);
            KeyAction::None
        }
        (_, KeyCode::BackTab) => {
            state.focus = state.focus.prev(mode);
            KeyAction::None
        }
        (mods, code) => match state.focus {
            Field::Content | Field::Answer => {
                if let Some(edit) = text_edit(mods, code) {
                    state.edit_text(edit);
                }
                KeyAction::None
            }
            Field::Keywords => {
                if let Some(edit) = text_edit(mods, code) {
                    state.edit_keywords(edit);
                }
                KeyAction::None
            }
            Field::ExtendedData => {
                match code {
                    KeyCode::Up | KeyCode::Char('k') => state.move_option(-1),
                    KeyCode::Down | KeyCode::Char('j') => state.move_option(1),
                    _ => {}
                }
                KeyAction::None
            }
            Field::Save if code == KeyCode::Enter => submit(state),
            Field::Cancel if code == KeyCode::Enter => {
                cancel(state);
                KeyAction::None
            }
            _ => KeyAction::None,
        },
    }
}

fn text_edit(mods: KeyModifiers, code: KeyCode) -> Option<TextEdit> {
    match code {
        // Control and Alt chords are commands, not text.
        KeyCode::Char(_) if mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => None,
        KeyCode::Char(c) => Some(TextEdit::Insert(c)),
        KeyCode::Enter => Some(TextEdit::Newline),
        KeyCode::Backspace => Some(TextEdit::Backspace),
        _ => None,
    }
}

fn submit(state: &mut UiState) -> KeyAction {
    match state.dialog.begin_submit(&mut state.host) {
        Some(request) => KeyAction::Send(UiCommand::Submit(request)),
        None => KeyAction::None,
    }
}

fn cancel(state: &mut UiState) {
    state.dialog.cancel(&mut state.host);
    state.reset_widgets();
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    draw_document(area, f, state);
    if state.dialog.is_show() {
        dialog_view::draw_dialog(dialog_view::centered(area, 72, 80), f, state);
    }
    if state.show_help {
        help::draw_help(dialog_view::centered(area, 60, 60), f);
    }
}

fn draw_document(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let host = &state.host;
    let mode = if state.dialog.mode().is_qa() {
        "Q&A"
    } else {
        "Text"
    };
    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Dataset:  ", Style::default().fg(Color::Gray)),
            Span::raw(host.target.dataset_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Document: ", Style::default().fg(Color::Gray)),
            Span::raw(host.target.document_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("Mode:     ", Style::default().fg(Color::Gray)),
            Span::raw(mode),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("segment-studio"));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = host
        .saved
        .iter()
        .rev()
        .map(|row| {
            ListItem::new(Line::from(vec![
                Span::styled(row.at.clone(), Style::default().fg(Color::DarkGray)),
                Span::raw("  "),
                Span::styled(row.id.clone(), Style::default().fg(Color::Cyan)),
                Span::raw("  "),
                Span::raw(row.preview.clone()),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Added this session ({})", host.saved.len())),
    );
    f.render_widget(list, chunks[1]);

    let status = match &host.toast {
        Some(toast) => Line::from(Span::styled(
            toast.text.clone(),
            Style::default()
                .fg(toast.color())
                .add_modifier(Modifier::BOLD),
        )),
        None if !host.info.is_empty() => Line::from(host.info.clone()),
        None => Line::from(Span::styled(
            "n new segment · ? help · q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(
        Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("Status")),
        chunks[2],
    );
}
