// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The session drawer: a list of independent chat stores, one active at a
//! time.  Sessions are created with running numbers and live for the process
//! lifetime only.

use crate::store::ChatStore;

/// Stable session handle; indices shift when sessions are removed, ids never
/// do.  Backend responses are routed by id so a reply cannot land in the
/// wrong transcript after a switch or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub store: ChatStore,
}

#[derive(Debug)]
pub struct SessionList {
    sessions: Vec<Session>,
    active: usize,
    next_id: u64,
    /// Running number for "聊天 N" names; never reused after deletes.
    next_number: u64,
    welcome: String,
    error_notice: String,
}

impl SessionList {
    /// Start with the seeded default session.
    pub fn new(default_name: &str, welcome: &str, error_notice: &str) -> Self {
        let mut list = Self {
            sessions: Vec::new(),
            active: 0,
            next_id: 0,
            next_number: 1,
            welcome: welcome.to_string(),
            error_notice: error_notice.to_string(),
        };
        list.push_session(default_name.to_string());
        list
    }

    fn push_session(&mut self, name: String) -> SessionId {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.sessions.push(Session {
            id,
            name,
            store: ChatStore::new(&self.welcome, &self.error_notice),
        });
        id
    }

    /// Create a numbered session and switch to it.
    pub fn create(&mut self) -> SessionId {
        let name = format!("聊天 {}", self.next_number);
        self.next_number += 1;
        let id = self.push_session(name);
        self.active = self.sessions.len() - 1;
        id
    }

    /// Remove the active session.  The last remaining session is never
    /// removed; deleting it resets its transcript instead.
    pub fn remove_active(&mut self) {
        if self.sessions.len() == 1 {
            self.sessions[0].store.reset();
            return;
        }
        self.sessions.remove(self.active);
        if self.active >= self.sessions.len() {
            self.active = self.sessions.len() - 1;
        }
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.sessions.len();
    }

    pub fn select_prev(&mut self) {
        self.active = (self.active + self.sessions.len() - 1) % self.sessions.len();
    }

    pub fn active(&self) -> &Session {
        &self.sessions[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Session {
        &mut self.sessions[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Find a session by id, e.g. to deliver a backend response after the
    /// user switched away.
    pub fn by_id_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }
}
