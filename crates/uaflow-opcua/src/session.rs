// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Connector state to node status mapping.
//!
//! A connector owns the live OPC UA session and reports a state tag. Every
//! time the tag changes, flow nodes call [`set_initial_state`] to derive
//! their visible status. The mapping is total and stateless:
//!
//! | Connector state | Node status  | Side effect                     |
//! |-----------------|--------------|---------------------------------|
//! | `INIT`          | `connecting` |                                 |
//! | `OPEN`          | `active`     | node observes connector session |
//! | `LOCKED`        | `locked`     |                                 |
//! | `UNLOCKED`      | `unlocked`   |                                 |
//! | anything else   | `waiting`    |                                 |
//!
//! The node only holds a shared reference to the session. It never closes
//! or replaces it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// =============================================================================
// ConnectorState
// =============================================================================

/// State reported by a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConnectorState {
    /// Connector is initializing.
    Init,
    /// Session is open.
    Open,
    /// Connector is locked.
    Locked,
    /// Connector is unlocked.
    Unlocked,
    /// Any other tag, including the empty one.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConnectorState {
    /// Maps a raw state tag. Matching is case-sensitive and never fails.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "INIT" => Self::Init,
            "OPEN" => Self::Open,
            "LOCKED" => Self::Locked,
            "UNLOCKED" => Self::Unlocked,
            _ => Self::Unknown,
        }
    }

    /// Returns the state tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Open => "OPEN",
            Self::Locked => "LOCKED",
            Self::Unlocked => "UNLOCKED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Returns the node status for this state.
    pub const fn node_status(&self) -> NodeStatus {
        match self {
            Self::Init => NodeStatus::Connecting,
            Self::Open => NodeStatus::Active,
            Self::Locked => NodeStatus::Locked,
            Self::Unlocked => NodeStatus::Unlocked,
            Self::Unknown => NodeStatus::Waiting,
        }
    }
}

impl FromStr for ConnectorState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl From<&str> for ConnectorState {
    fn from(tag: &str) -> Self {
        Self::from_tag(tag)
    }
}

impl fmt::Display for ConnectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// NodeStatus
// =============================================================================

/// Externally visible status of a flow node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Connector is initializing.
    Connecting,
    /// Session is usable.
    Active,
    /// Connector is locked.
    Locked,
    /// Connector is unlocked.
    Unlocked,
    /// Waiting for a known connector state.
    #[default]
    Waiting,
}

impl NodeStatus {
    /// Returns the status tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Active => "active",
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Waiting => "waiting",
        }
    }

    /// Returns `true` if requests may be issued.
    #[inline]
    pub const fn is_usable(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Traits
// =============================================================================

/// The connector capability consumed by flow nodes.
pub trait Connector {
    /// Session handle type.
    type Session;

    /// Returns the current state tag.
    fn state(&self) -> ConnectorState;

    /// Returns the current session, if one is open.
    fn session(&self) -> Option<Arc<Self::Session>>;
}

/// A flow node that tracks a connector.
pub trait SessionObserver<S> {
    /// Sets the observed session reference.
    fn observe_session(&mut self, session: Option<Arc<S>>);

    /// Sets the visible node status.
    fn set_node_status(&mut self, status: NodeStatus);
}

/// Derives the node status from the connector state and applies it.
///
/// On `OPEN` the node also takes a shared reference to the connector's
/// current session. Other states leave the node's session reference alone.
pub fn set_initial_state<C, N>(state: ConnectorState, connector: &C, node: &mut N) -> NodeStatus
where
    C: Connector + ?Sized,
    N: SessionObserver<C::Session> + ?Sized,
{
    let status = state.node_status();
    if state == ConnectorState::Open {
        node.observe_session(connector.session());
    }
    node.set_node_status(status);
    tracing::debug!(state = %state, status = %status, "Applied connector state");
    status
}

// =============================================================================
// FlowNodeState
// =============================================================================

/// Minimal [`SessionObserver`] holding a status and a session reference.
#[derive(Debug)]
pub struct FlowNodeState<S> {
    name: String,
    status: NodeStatus,
    session: Option<Arc<S>>,
}

impl<S> FlowNodeState<S> {
    /// Creates a waiting node state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: NodeStatus::Waiting,
            session: None,
        }
    }

    /// Returns the node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current status.
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    /// Returns the observed session.
    pub fn session(&self) -> Option<&Arc<S>> {
        self.session.as_ref()
    }

    /// Applies a connector state change.
    pub fn apply<C>(&mut self, connector: &C) -> NodeStatus
    where
        C: Connector<Session = S> + ?Sized,
    {
        set_initial_state(connector.state(), connector, self)
    }
}

impl<S> SessionObserver<S> for FlowNodeState<S> {
    fn observe_session(&mut self, session: Option<Arc<S>>) {
        self.session = session;
    }

    fn set_node_status(&mut self, status: NodeStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Session(u32);

    struct StaticConnector {
        state: ConnectorState,
        session: Option<Arc<Session>>,
    }

    impl Connector for StaticConnector {
        type Session = Session;

        fn state(&self) -> ConnectorState {
            self.state
        }

        fn session(&self) -> Option<Arc<Session>> {
            self.session.clone()
        }
    }

    fn connector(tag: &str) -> StaticConnector {
        StaticConnector {
            state: ConnectorState::from_tag(tag),
            session: Some(Arc::new(Session(7))),
        }
    }

    #[test]
    fn test_mapping_is_total() {
        let cases = [
            ("INIT", NodeStatus::Connecting),
            ("OPEN", NodeStatus::Active),
            ("LOCKED", NodeStatus::Locked),
            ("UNLOCKED", NodeStatus::Unlocked),
            ("", NodeStatus::Waiting),
            ("garbage", NodeStatus::Waiting),
            ("open", NodeStatus::Waiting),
        ];
        for (tag, expected) in cases {
            let connector = connector(tag);
            let mut node = FlowNodeState::new("read");
            assert_eq!(node.apply(&connector), expected, "{tag:?}");
            assert_eq!(node.status(), expected);
        }
    }

    #[test]
    fn test_open_shares_session() {
        let connector = connector("OPEN");
        let mut node = FlowNodeState::new("read");
        node.apply(&connector);

        let observed = node.session().unwrap();
        assert!(Arc::ptr_eq(observed, connector.session.as_ref().unwrap()));
        assert_eq!(Arc::strong_count(observed), 2);
    }

    #[test]
    fn test_other_states_leave_session_untouched() {
        let mut node = FlowNodeState::new("read");
        node.apply(&connector("OPEN"));
        node.apply(&connector("LOCKED"));
        assert_eq!(node.status(), NodeStatus::Locked);
        assert_eq!(node.session().map(|s| s.0), Some(7));

        let mut fresh = FlowNodeState::<Session>::new("fresh");
        fresh.apply(&connector("INIT"));
        assert!(fresh.session().is_none());
    }

    #[test]
    fn test_serde_tags() {
        assert_eq!(serde_json::to_value(NodeStatus::Active).unwrap(), "active");
        let state: ConnectorState = serde_json::from_value("OPEN".into()).unwrap();
        assert_eq!(state, ConnectorState::Open);
        let state: ConnectorState = serde_json::from_value("whatever".into()).unwrap();
        assert_eq!(state, ConnectorState::Unknown);
        assert_eq!("LOCKED".parse::<ConnectorState>(), Ok(ConnectorState::Locked));
    }

    #[test]
    fn test_usable() {
        assert!(NodeStatus::Active.is_usable());
        assert!(!NodeStatus::Waiting.is_usable());
    }
}
