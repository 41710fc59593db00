// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! A connector whose state and session can be changed from a test.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use uaflow_opcua::{Connector, ConnectorState};

// =============================================================================
// MockSession
// =============================================================================

/// A session handle identified by a sequence number.
#[derive(Debug, PartialEq, Eq)]
pub struct MockSession {
    /// Session sequence number.
    pub id: u64,
}

// =============================================================================
// MockConnector
// =============================================================================

/// A thread-safe connector driven by the test.
#[derive(Debug)]
pub struct MockConnector {
    state: RwLock<ConnectorState>,
    session: RwLock<Option<Arc<MockSession>>>,
    next_session_id: AtomicU64,
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Creates a connector in the `INIT` state without a session.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ConnectorState::Init),
            session: RwLock::new(None),
            next_session_id: AtomicU64::new(1),
        }
    }

    /// Sets the state tag as a transport would report it.
    pub fn set_state(&self, tag: &str) {
        *self.state.write().expect("state lock poisoned") = ConnectorState::from_tag(tag);
    }

    /// Opens a new session and moves to `OPEN`.
    pub fn open_session(&self) -> Arc<MockSession> {
        let id = self.next_session_id.fetch_add(1, Ordering::SeqCst);
        let session = Arc::new(MockSession { id });
        *self.session.write().expect("session lock poisoned") = Some(Arc::clone(&session));
        self.set_state("OPEN");
        session
    }

    /// Drops the current session without changing the state.
    pub fn drop_session(&self) {
        *self.session.write().expect("session lock poisoned") = None;
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn state(&self) -> ConnectorState {
        *self.state.read().expect("state lock poisoned")
    }

    fn session(&self) -> Option<Arc<MockSession>> {
        self.session.read().expect("session lock poisoned").clone()
    }
}
