mod app;

use crate::app::config::AppConfig;
use crate::app::handlers::{apply_transport_message, handle_enter};
use crate::app::logging::init_tracing;
use crate::app::runtime::{BackendClient, CommandSink, TransportHandle, TransportMessage};
use crate::app::state::InputState;
use crate::app::util::sanitize_paste;
use crate::app::view::draw_ui;
use crate::app::AppState;
use crossterm::cursor::Show;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;
use tracing::info;

const TICK: Duration = Duration::from_millis(50);
const MAX_TRANSPORT_MESSAGES_PER_TICK: usize = 300;
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn process_transport_messages(app: &mut AppState, rx: &Receiver<TransportMessage>) -> bool {
    let mut processed = 0usize;
    while processed < MAX_TRANSPORT_MESSAGES_PER_TICK {
        match rx.try_recv() {
            Ok(message) => {
                processed += 1;
                apply_transport_message(app, message);
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    processed > 0
}

fn handle_input_edit_key(input: &mut InputState, key: KeyCode, modifiers: KeyModifiers) -> bool {
    match (key, modifiers) {
        (KeyCode::Char('u'), mods) if mods.contains(KeyModifiers::CONTROL) => input.kill_line(),
        (KeyCode::Char('w'), mods) if mods.contains(KeyModifiers::CONTROL) => {
            input.delete_word_back()
        }
        (KeyCode::Char('a'), mods) if mods.contains(KeyModifiers::CONTROL) => input.move_home(),
        (KeyCode::Char('e'), mods) if mods.contains(KeyModifiers::CONTROL) => input.move_end(),
        (KeyCode::Char(_), mods)
            if mods.contains(KeyModifiers::CONTROL) || mods.contains(KeyModifiers::ALT) =>
        {
            return false;
        }
        (KeyCode::Char(ch), _) => input.insert_char(ch),
        (KeyCode::Up, _) => input.history_up(),
        (KeyCode::Down, _) => input.history_down(),
        (KeyCode::Left, _) => input.move_left(),
        (KeyCode::Right, _) => input.move_right(),
        (KeyCode::Home, _) => input.move_home(),
        (KeyCode::End, _) => input.move_end(),
        (KeyCode::Backspace, _) => input.backspace(),
        (KeyCode::Delete, _) => input.delete(),
        _ => return false,
    }
    true
}

fn handle_main_key(
    app: &mut AppState,
    key: KeyCode,
    modifiers: KeyModifiers,
    sink: &mut impl CommandSink,
) -> bool {
    match (key, modifiers) {
        (KeyCode::Enter, _) => {
            handle_enter(app, sink);
            true
        }
        (KeyCode::PageUp, _) => {
            app.scroll_page_up();
            true
        }
        (KeyCode::PageDown, _) => {
            app.scroll_page_down();
            true
        }
        _ => handle_input_edit_key(&mut app.input, key, modifiers),
    }
}

fn handle_paste(app: &mut AppState, text: &str) -> bool {
    let cleaned = sanitize_paste(text);
    if cleaned.is_empty() {
        return false;
    }
    app.input.insert_str(&cleaned);
    true
}

fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    transport: &mut TransportHandle,
    rx: &Receiver<TransportMessage>,
) -> io::Result<()> {
    let mut needs_redraw = true;
    loop {
        if process_transport_messages(app, rx) {
            needs_redraw = true;
        }

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.should_exit = true;
                    } else if handle_main_key(app, key.code, key.modifiers, transport) {
                        needs_redraw = true;
                    }
                }
                Event::Paste(text) => {
                    if handle_paste(app, &text) {
                        needs_redraw = true;
                    }
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }

        if app.should_exit {
            break;
        }
        if needs_redraw {
            terminal.draw(|f| draw_ui(f, app))?;
            needs_redraw = false;
        }
    }
    Ok(())
}

struct TerminalRestoreGuard;

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableBracketedPaste);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = stdout.execute(Show);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_filter, config.log_file.as_deref())?;
    info!(backend = %config.backend_url, policy = ?config.confirm_policy, "starting client");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("agentic-transport")
        .enable_all()
        .build()?;
    let client = BackendClient::new(
        config.backend_url.clone(),
        config.connect_timeout,
        config.request_timeout,
    )?;
    let (tx, rx) = mpsc::channel();
    let mut transport = TransportHandle::new(client, runtime.handle().clone(), tx);

    let mut stdout = io::stdout();
    let _restore_guard = TerminalRestoreGuard;
    stdout.execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    // Bracketed paste keeps a pasted line break from submitting the composer.
    let _ = stdout.execute(EnableBracketedPaste);
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let mut app = AppState::new(config.confirm_policy);
    if app.session.begin_connect() {
        transport.establish();
    }

    let result = run_loop(&mut terminal, &mut app, &mut transport, &rx);

    app.session.close();
    if let Some(task) = transport.shutdown() {
        let _ = runtime.block_on(async { tokio::time::timeout(SHUTDOWN_GRACE, task).await });
    }
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    info!(phase = ?app.session.phase(), "client exited");
    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::runtime::OutboundCommand;
    use crate::app::state::LogKind;

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<OutboundCommand>,
    }

    impl CommandSink for RecordingSink {
        fn send_input(&mut self, command: OutboundCommand) {
            self.sent.push(command);
        }

        fn ping(&mut self) {}
    }

    fn open_app() -> AppState {
        let mut app = AppState::default();
        app.session.begin_connect();
        app.session.identifier_received("abc123");
        app.session.channel_opened();
        app
    }

    fn type_text(app: &mut AppState, sink: &mut RecordingSink, text: &str) {
        for ch in text.chars() {
            handle_main_key(app, KeyCode::Char(ch), KeyModifiers::NONE, sink);
        }
    }

    #[test]
    fn typing_and_enter_forwards_command() {
        let mut app = open_app();
        let mut sink = RecordingSink::default();
        type_text(&mut app, &mut sink, "build the project");
        handle_main_key(&mut app, KeyCode::Enter, KeyModifiers::NONE, &mut sink);

        assert_eq!(sink.sent.len(), 1);
        assert_eq!(sink.sent[0].connection_id, "abc123");
        assert_eq!(sink.sent[0].text, "build the project");
        assert!(app.input.is_empty());
    }

    #[test]
    fn up_recalls_previous_submission() {
        let mut app = open_app();
        let mut sink = RecordingSink::default();
        type_text(&mut app, &mut sink, "status");
        handle_main_key(&mut app, KeyCode::Enter, KeyModifiers::NONE, &mut sink);
        handle_main_key(&mut app, KeyCode::Up, KeyModifiers::NONE, &mut sink);
        assert_eq!(app.input.current(), "status");
    }

    #[test]
    fn control_chords_do_not_insert_text() {
        let mut app = open_app();
        let mut sink = RecordingSink::default();
        type_text(&mut app, &mut sink, "hello world");
        assert!(handle_main_key(
            &mut app,
            KeyCode::Char('w'),
            KeyModifiers::CONTROL,
            &mut sink
        ));
        assert_eq!(app.input.current(), "hello ");
        assert!(!handle_main_key(
            &mut app,
            KeyCode::Char('x'),
            KeyModifiers::CONTROL,
            &mut sink
        ));
        assert_eq!(app.input.current(), "hello ");
    }

    #[test]
    fn paste_is_flattened_into_the_composer() {
        let mut app = open_app();
        assert!(handle_paste(&mut app, "line one\nline two"));
        assert_eq!(app.input.current(), "line one line two");
        assert!(!handle_paste(&mut app, "\n"));
    }

    #[test]
    fn transport_messages_drain_in_order_with_a_cap() {
        let mut app = open_app();
        let (tx, rx) = mpsc::channel();
        for index in 0..(MAX_TRANSPORT_MESSAGES_PER_TICK + 5) {
            let raw = format!(r#"{{"type":"text","data":"{index}"}}"#);
            tx.send(TransportMessage::Frame(raw)).expect("send");
        }
        let base = app.session.log.len();

        assert!(process_transport_messages(&mut app, &rx));
        assert_eq!(app.session.log.len(), base + MAX_TRANSPORT_MESSAGES_PER_TICK);
        assert!(process_transport_messages(&mut app, &rx));
        assert_eq!(
            app.session.log.len(),
            base + MAX_TRANSPORT_MESSAGES_PER_TICK + 5
        );
        let texts: Vec<&str> = app.session.log.snapshot()[base..]
            .iter()
            .map(|entry| entry.text())
            .collect();
        assert_eq!(texts[0], "0");
        assert_eq!(texts[MAX_TRANSPORT_MESSAGES_PER_TICK + 4], "304");
        assert!(app
            .session
            .log
            .snapshot()
            .iter()
            .skip(base)
            .all(|entry| *entry.kind() == LogKind::Other("text".to_string())));
        assert!(!process_transport_messages(&mut app, &rx));
    }
}
