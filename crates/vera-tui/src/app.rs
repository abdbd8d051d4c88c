// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyEventKind, MouseEventKind};
use futures::StreamExt;
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use vera_config::Config;

use crate::{
    backend::{backend_task, BackendEvent, BackendRequest},
    clipboard::copy_to_clipboard,
    keys::{map_key, Action},
    layout::AppLayout,
    sessions::SessionList,
    store::SubmitError,
    view::{render_transcript, StyledLines, ViewOptions},
    widgets::{draw_chat, draw_help, draw_input, draw_sessions, draw_status},
};

/// Options passed when constructing the TUI app.
#[derive(Debug, Default)]
pub struct AppOptions {
    pub initial_prompt: Option<String>,
}

/// Which pane currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Chat,
    Input,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// The top-level TUI application state.
pub struct App {
    config: Arc<Config>,
    backend_name: String,
    sessions: SessionList,
    focus: FocusPane,
    /// Rendered transcript of the active session, rebuilt on change.
    chat_lines: StyledLines,
    /// Clipboard payloads matching the `[复制 n]` labels in `chat_lines`.
    copy_payloads: Vec<String>,
    scroll_offset: u16,
    input_buffer: String,
    input_cursor: usize,
    show_help: bool,
    show_reasoning: bool,
    drawer_open: bool,
    pending_nav: bool,
    pending_copy: bool,
    chat_height: u16,
    initial_prompt: Option<String>,
    backend_tx: Option<mpsc::Sender<BackendRequest>>,
    event_rx: Option<mpsc::Receiver<BackendEvent>>,
}

impl App {
    pub fn new(config: Arc<Config>, opts: AppOptions) -> Self {
        let sessions = SessionList::new(
            &config.chat.default_session_name,
            &config.chat.welcome,
            &config.chat.error_notice,
        );
        let mut app = Self {
            config,
            backend_name: String::new(),
            sessions,
            focus: FocusPane::Input,
            chat_lines: Vec::new(),
            copy_payloads: Vec::new(),
            scroll_offset: 0,
            input_buffer: String::new(),
            input_cursor: 0,
            show_help: false,
            show_reasoning: false,
            drawer_open: false,
            pending_nav: false,
            pending_copy: false,
            chat_height: 24,
            initial_prompt: opts.initial_prompt,
            backend_tx: None,
            event_rx: None,
        };
        app.rerender_chat();
        app
    }

    /// Run the TUI event loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        let backend = vera_model::from_config(&self.config.backend)?;
        self.backend_name = backend.name().to_string();

        let (req_tx, req_rx) = mpsc::channel::<BackendRequest>(64);
        let (event_tx, event_rx) = mpsc::channel::<BackendEvent>(64);

        self.backend_tx = Some(req_tx);
        self.event_rx = Some(event_rx);

        tokio::spawn(backend_task(backend, req_rx, event_tx));

        if let Some(prompt) = self.initial_prompt.take() {
            self.submit_input(&prompt).await;
        }

        let mut crossterm_events = EventStream::new();

        loop {
            // Pre-compute layout so scroll helpers have correct heights.
            if let Ok(size) = terminal.size() {
                let layout = AppLayout::compute(
                    Rect::new(0, 0, size.width, size.height),
                    self.drawer_open,
                );
                self.chat_height = layout.chat_inner_height().max(1);
            }

            let ascii = self.ascii();

            terminal.draw(|frame| {
                let layout = AppLayout::new(frame, self.drawer_open);
                let active = self.sessions.active();

                draw_status(
                    frame,
                    layout.status_bar,
                    &self.backend_name,
                    &active.name,
                    active.store.state(),
                    self.pending_copy,
                    ascii,
                );
                if self.drawer_open {
                    draw_sessions(frame, layout.session_drawer, &self.sessions, ascii);
                }
                draw_chat(
                    frame,
                    layout.chat_pane,
                    &self.chat_lines,
                    self.scroll_offset,
                    self.focus == FocusPane::Chat,
                    ascii,
                );
                draw_input(
                    frame,
                    layout.input_pane,
                    &self.input_buffer,
                    self.input_cursor,
                    self.focus == FocusPane::Input,
                    active.store.is_pending(),
                    ascii,
                );
                if self.show_help {
                    draw_help(frame, ascii);
                }
            })?;

            tokio::select! {
                Some(event) = self.recv_backend_event() => {
                    self.handle_backend_event(event);
                }
                Some(Ok(term_event)) = crossterm_events.next() => {
                    if self.handle_term_event(term_event).await { break; }
                }
            }
        }

        Ok(())
    }

    async fn recv_backend_event(&mut self) -> Option<BackendEvent> {
        if let Some(rx) = &mut self.event_rx { rx.recv().await } else { None }
    }

    // ── Backend event handler ─────────────────────────────────────────────────

    fn handle_backend_event(&mut self, event: BackendEvent) {
        let (session, outcome) = match event {
            BackendEvent::Response { session, text } => (session, Ok(text)),
            BackendEvent::Failure { session, error } => (session, Err(error)),
        };
        let is_active = self.sessions.active().id == session;
        match self.sessions.by_id_mut(session) {
            Some(s) => match outcome {
                Ok(text) => s.store.resolve(text),
                Err(error) => {
                    warn!(error, "backend failure recorded in transcript");
                    s.store.fail();
                }
            },
            // Session deleted while the request was in flight.
            None => debug!("dropping reply for a removed session"),
        }
        if is_active {
            self.rerender_chat();
            self.scroll_to_bottom();
        }
    }

    // ── Terminal event handler ────────────────────────────────────────────────

    async fn handle_term_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Press => {
                // Help overlay: dismiss on any key
                if self.show_help {
                    self.show_help = false;
                    return false;
                }

                let in_input = self.focus == FocusPane::Input;
                if let Some(action) =
                    map_key(k, in_input, self.pending_nav, self.pending_copy)
                {
                    if action == Action::NavPrefix {
                        self.pending_nav = true;
                        return false;
                    }
                    if action == Action::CopyPrefix {
                        self.pending_copy = true;
                        return false;
                    }
                    self.pending_nav = false;
                    self.pending_copy = false;
                    return self.dispatch(action).await;
                }
                self.pending_nav = false;
                self.pending_copy = false;
                false
            }

            Event::Mouse(mouse) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_up(3),
                    MouseEventKind::ScrollDown => self.scroll_down(3),
                    _ => {}
                }
                false
            }

            Event::Resize(_, _) => {
                self.rerender_chat();
                false
            }

            _ => false,
        }
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    async fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,

            Action::FocusChat => self.focus = FocusPane::Chat,
            Action::FocusInput => self.focus = FocusPane::Input,

            Action::ScrollUp => self.scroll_up(1),
            Action::ScrollDown => self.scroll_down(1),
            Action::ScrollPageUp => self.scroll_up(self.chat_height / 2),
            Action::ScrollPageDown => self.scroll_down(self.chat_height / 2),
            Action::ScrollTop => self.scroll_offset = 0,
            Action::ScrollBottom => self.scroll_to_bottom(),

            Action::InputChar(c) => {
                self.input_buffer.insert(self.input_cursor, c);
                self.input_cursor += c.len_utf8();
            }
            Action::InputNewline => {
                self.input_buffer.insert(self.input_cursor, '\n');
                self.input_cursor += 1;
            }
            Action::InputBackspace => {
                if self.input_cursor > 0 {
                    let prev = prev_char_boundary(&self.input_buffer, self.input_cursor);
                    self.input_buffer.remove(prev);
                    self.input_cursor = prev;
                }
            }
            Action::InputDelete => {
                if self.input_cursor < self.input_buffer.len() {
                    self.input_buffer.remove(self.input_cursor);
                }
            }
            Action::InputMoveCursorLeft => {
                self.input_cursor = prev_char_boundary(&self.input_buffer, self.input_cursor);
            }
            Action::InputMoveCursorRight => {
                if self.input_cursor < self.input_buffer.len() {
                    let ch = self.input_buffer[self.input_cursor..]
                        .chars()
                        .next()
                        .map(|c| c.len_utf8())
                        .unwrap_or(1);
                    self.input_cursor += ch;
                }
            }
            Action::InputMoveLineStart => self.input_cursor = 0,
            Action::InputMoveLineEnd => self.input_cursor = self.input_buffer.len(),
            Action::InputDeleteToEnd => self.input_buffer.truncate(self.input_cursor),
            Action::InputDeleteToStart => {
                self.input_buffer = self.input_buffer[self.input_cursor..].to_string();
                self.input_cursor = 0;
            }

            Action::Submit => {
                let text = std::mem::take(&mut self.input_buffer);
                self.input_cursor = 0;
                if !self.submit_input(&text).await {
                    // Rejected (busy): give the text back instead of losing it.
                    self.input_cursor = text.len();
                    self.input_buffer = text;
                }
            }

            Action::SessionNew => {
                self.sessions.create();
                self.scroll_offset = 0;
                self.rerender_chat();
            }
            Action::SessionDelete => {
                self.sessions.remove_active();
                self.scroll_offset = 0;
                self.rerender_chat();
            }
            Action::SessionNext => {
                self.sessions.select_next();
                self.rerender_chat();
                self.scroll_to_bottom();
            }
            Action::SessionPrev => {
                self.sessions.select_prev();
                self.rerender_chat();
                self.scroll_to_bottom();
            }
            Action::ToggleDrawer => self.drawer_open = !self.drawer_open,

            Action::ToggleReasoning => {
                self.show_reasoning = !self.show_reasoning;
                self.rerender_chat();
            }
            Action::CopyBlock(n) => {
                match self.copy_payloads.get(n.saturating_sub(1)) {
                    Some(payload) => {
                        if let Err(e) = copy_to_clipboard(payload) {
                            warn!(error = %e, "clipboard copy failed");
                        } else {
                            debug!(block = n, "copied code block");
                        }
                    }
                    None => debug!(block = n, "no code block with that number"),
                }
            }

            Action::Help => self.show_help = !self.show_help,

            // Chord prefixes are intercepted before dispatch.
            Action::NavPrefix | Action::CopyPrefix => {}
        }
        false
    }

    /// Try to submit `text` to the active session.  Returns false when the
    /// store rejected it because a request is already in flight.
    async fn submit_input(&mut self, text: &str) -> bool {
        let session = self.sessions.active().id;
        match self.sessions.active_mut().store.submit(text) {
            Ok(query) => {
                self.rerender_chat();
                self.scroll_to_bottom();
                if let Some(tx) = &self.backend_tx {
                    let _ = tx.send(BackendRequest { session, query }).await;
                }
                true
            }
            Err(SubmitError::Empty) => true,
            Err(SubmitError::Busy) => false,
        }
    }

    fn rerender_chat(&mut self) {
        let opts = ViewOptions {
            show_reasoning: self.show_reasoning,
            ascii: self.ascii(),
            allow_unsafe_html: self.config.render.allow_unsafe_html,
        };
        let transcript = render_transcript(self.sessions.active().store.messages(), &opts);
        self.chat_lines = transcript.lines;
        self.copy_payloads = transcript.copy_payloads;
    }

    fn ascii(&self) -> bool {
        if std::env::var("VERA_ASCII_BORDERS").as_deref() == Ok("1") {
            return true;
        }
        self.config.tui.ascii_borders
    }

    fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }

    fn scroll_down(&mut self, n: u16) {
        let max = (self.chat_lines.len() as u16).saturating_sub(self.chat_height);
        self.scroll_offset = (self.scroll_offset + n).min(max);
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset =
            (self.chat_lines.len() as u16).saturating_sub(self.chat_height);
    }
}

// ── Character boundary helpers ─────────────────────────────────────────────────

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    if pos == 0 { return 0; }
    let mut p = pos - 1;
    while p > 0 && !s.is_char_boundary(p) { p -= 1; }
    p
}

// ─── Unit tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_char_boundary_steps_over_multibyte() {
        let s = "a物b";
        assert_eq!(prev_char_boundary(s, s.len()), 1 + "物".len());
        assert_eq!(prev_char_boundary(s, 1 + "物".len()), 1);
        assert_eq!(prev_char_boundary(s, 1), 0);
        assert_eq!(prev_char_boundary(s, 0), 0);
    }
}
