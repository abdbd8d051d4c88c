// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// All logical actions the TUI can perform, independent of key binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusChat,
    FocusInput,
    /// First key of the Ctrl+w nav chord (vim-style window navigation).
    /// The App watches for a follow-up key to decide the target pane.
    NavPrefix,

    // Scrolling (in chat pane)
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollTop,
    ScrollBottom,

    // Input
    InputChar(char),
    InputNewline,
    InputBackspace,
    InputDelete,
    InputMoveCursorLeft,
    InputMoveCursorRight,
    InputMoveLineStart,
    InputMoveLineEnd,
    InputDeleteToEnd,
    InputDeleteToStart,
    Submit,

    // Sessions
    SessionNew,
    SessionDelete,
    SessionNext,
    SessionPrev,
    ToggleDrawer,

    // View
    ToggleReasoning,
    /// First key of the Ctrl+y copy chord; a digit picks the code block.
    CopyPrefix,
    CopyBlock(usize),

    // App
    Quit,
    Help,
}

/// Map a raw key event to an [`Action`], depending on which pane has focus.
///
/// `pending_nav` — a Ctrl+w prefix has been received; only j/k resolve it.
/// `pending_copy` — a Ctrl+y prefix has been received; only digits resolve it.
pub fn map_key(
    event: KeyEvent,
    in_input: bool,
    pending_nav: bool,
    pending_copy: bool,
) -> Option<Action> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    // "plain" = no modifier that would make a char a control sequence
    let plain = !ctrl && !alt;

    // ── Pending chords ────────────────────────────────────────────────────────
    // Any key outside the chord cancels the prefix (returning None causes the
    // App to clear the flag without acting).
    if pending_nav {
        return match event.code {
            KeyCode::Char('k') | KeyCode::Up => Some(Action::FocusChat),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::FocusInput),
            _ => None,
        };
    }
    if pending_copy {
        return match event.code {
            KeyCode::Char(c @ '1'..='9') => {
                Some(Action::CopyBlock(c as usize - '0' as usize))
            }
            _ => None,
        };
    }

    match event.code {
        // ── Input-pane overrides come FIRST so they shadow global bindings ────
        KeyCode::Char('u') if ctrl && in_input => Some(Action::InputDeleteToStart),
        KeyCode::Char('k') if ctrl && in_input => Some(Action::InputDeleteToEnd),

        // ── Global bindings ───────────────────────────────────────────────────
        KeyCode::Char('q') if ctrl => Some(Action::Quit),
        KeyCode::Char('c') if ctrl => Some(Action::Quit),

        // Ctrl+w → nav-prefix chord, Ctrl+y → copy chord
        KeyCode::Char('w') if ctrl => Some(Action::NavPrefix),
        KeyCode::Char('y') if ctrl => Some(Action::CopyPrefix),

        // Sessions
        KeyCode::Char('n') if ctrl => Some(Action::SessionNew),
        KeyCode::Char('x') if ctrl => Some(Action::SessionDelete),
        KeyCode::Tab if !in_input => Some(Action::SessionNext),
        KeyCode::BackTab => Some(Action::SessionPrev),
        KeyCode::Char('s') if ctrl => Some(Action::ToggleDrawer),

        KeyCode::Char('t') if ctrl => Some(Action::ToggleReasoning),
        KeyCode::F(1) => Some(Action::Help),

        // ── Rest of input pane ────────────────────────────────────────────────
        KeyCode::Enter if in_input && !shift => Some(Action::Submit),
        KeyCode::Enter if in_input && shift => Some(Action::InputNewline),
        KeyCode::Backspace if in_input => Some(Action::InputBackspace),
        KeyCode::Delete if in_input => Some(Action::InputDelete),
        KeyCode::Left if in_input => Some(Action::InputMoveCursorLeft),
        KeyCode::Right if in_input => Some(Action::InputMoveCursorRight),
        KeyCode::Home if in_input => Some(Action::InputMoveLineStart),
        KeyCode::End if in_input => Some(Action::InputMoveLineEnd),
        KeyCode::Esc if in_input => Some(Action::FocusChat),
        // Printable characters — only when no ctrl/alt modifier
        KeyCode::Char(c) if in_input && plain => Some(Action::InputChar(c)),

        // ── Chat pane ─────────────────────────────────────────────────────────
        KeyCode::Up | KeyCode::Char('k') if !in_input && plain => Some(Action::ScrollUp),
        KeyCode::Down | KeyCode::Char('j') if !in_input && plain => Some(Action::ScrollDown),
        KeyCode::PageUp if !in_input => Some(Action::ScrollPageUp),
        KeyCode::PageDown if !in_input => Some(Action::ScrollPageDown),
        KeyCode::Char('u') if ctrl && !in_input => Some(Action::ScrollPageUp),
        KeyCode::Char('d') if ctrl && !in_input => Some(Action::ScrollPageDown),
        KeyCode::Char('g') if !in_input && plain => Some(Action::ScrollTop),
        KeyCode::Char('G') if !in_input => Some(Action::ScrollBottom),
        KeyCode::Char('i') if !in_input && plain => Some(Action::FocusInput),
        KeyCode::Char('r') if !in_input && plain => Some(Action::ToggleReasoning),

        _ => None,
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
