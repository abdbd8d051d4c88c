// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Per-session message store and its submit state machine.
//!
//! The store owns the raw transcript; segmentation and rendering happen in
//! the view.  Submission is a two-state machine: `Idle` accepts a query,
//! `Pending` rejects further submits until the in-flight request resolves or
//! fails.  Every transition appends to the transcript — messages are never
//! mutated or removed.

use vera_model::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Idle,
    /// A request is in flight; new submits are rejected.
    Pending,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("empty input")]
    Empty,
    #[error("a request is already in flight")]
    Busy,
}

#[derive(Debug)]
pub struct ChatStore {
    messages: Vec<Message>,
    state: StoreState,
    welcome: String,
    error_notice: String,
}

impl ChatStore {
    /// A fresh store opens with the welcome greeting as the system message.
    pub fn new(welcome: &str, error_notice: &str) -> Self {
        Self {
            messages: vec![Message::system(welcome)],
            state: StoreState::Idle,
            welcome: welcome.to_string(),
            error_notice: error_notice.to_string(),
        }
    }

    /// Discard the transcript and start over from the welcome greeting.
    pub fn reset(&mut self) {
        self.messages = vec![Message::system(self.welcome.clone())];
        self.state = StoreState::Idle;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> StoreState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == StoreState::Pending
    }

    /// Accept a user query: append it to the transcript, enter `Pending`, and
    /// hand back the trimmed query for the backend request.
    pub fn submit(&mut self, input: &str) -> Result<String, SubmitError> {
        if self.is_pending() {
            return Err(SubmitError::Busy);
        }
        let query = input.trim();
        if query.is_empty() {
            return Err(SubmitError::Empty);
        }
        self.messages.push(Message::user(query));
        self.state = StoreState::Pending;
        Ok(query.to_string())
    }

    /// Record the backend's answer and return to `Idle`.
    pub fn resolve(&mut self, response: String) {
        self.messages.push(Message::assistant(response));
        self.state = StoreState::Idle;
    }

    /// Record a failed request: the transcript gets the error notice in place
    /// of an answer, so the user message is never silently dropped.
    pub fn fail(&mut self) {
        let notice = self.error_notice.clone();
        self.messages.push(Message::assistant(notice));
        self.state = StoreState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vera_model::Role;

    fn store() -> ChatStore {
        ChatStore::new("welcome!", "❗️ request failed")
    }

    #[test]
    fn new_store_opens_with_the_welcome_message() {
        let s = store();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.messages()[0].role, Role::System);
        assert_eq!(s.messages()[0].content, "welcome!");
        assert_eq!(s.state(), StoreState::Idle);
    }

    #[test]
    fn reset_discards_the_transcript_and_any_pending_state() {
        let mut s = store();
        s.submit("q").unwrap();
        s.reset();
        assert_eq!(s.messages().len(), 1, "only the welcome survives");
        assert_eq!(s.messages()[0].role, Role::System);
        assert!(!s.is_pending());
    }

    #[test]
    fn submit_appends_and_enters_pending() {
        let mut s = store();
        let query = s.submit("  what is torque?  ").unwrap();
        assert_eq!(query, "what is torque?");
        assert_eq!(s.messages().last().unwrap().role, Role::User);
        assert!(s.is_pending());
    }

    #[test]
    fn empty_or_whitespace_input_is_rejected() {
        let mut s = store();
        assert_eq!(s.submit(""), Err(SubmitError::Empty));
        assert_eq!(s.submit("   \n\t "), Err(SubmitError::Empty));
        assert_eq!(s.messages().len(), 1, "rejected submits leave no trace");
        assert_eq!(s.state(), StoreState::Idle);
    }

    #[test]
    fn concurrent_submit_is_rejected_until_resolution() {
        let mut s = store();
        s.submit("first").unwrap();
        assert_eq!(s.submit("second"), Err(SubmitError::Busy));

        s.resolve("answer".into());
        assert_eq!(s.state(), StoreState::Idle);
        assert!(s.submit("second").is_ok());
    }

    #[test]
    fn resolve_appends_the_assistant_answer() {
        let mut s = store();
        s.submit("q").unwrap();
        s.resolve("<think>hm</think>a".into());
        let last = s.messages().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "<think>hm</think>a", "raw text is stored verbatim");
    }

    #[test]
    fn failure_appends_the_error_notice_and_unblocks() {
        let mut s = store();
        s.submit("q").unwrap();
        s.fail();
        let last = s.messages().last().unwrap();
        assert_eq!(last.content, "❗️ request failed");
        assert!(!s.is_pending(), "a failed request must unblock the store");
    }
}
