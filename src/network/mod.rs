//! Network Module
//!
//! Builds a picture of the bus as seen from this session.
//!
//! ## Sources
//! - the local session (always present, labelled `Me!`)
//! - scouting answers from nearby peers and routers
//! - `@/*/router` admin replies, which add router metadata, the sessions
//!   each router holds, and one edge per session
//!
//! ## Output
//! - a Graphviz DOT document ([`NetworkGraph::to_dot`])
//! - an SVG image laid out from that document ([`NetworkGraph::to_svg`])

mod admin;
mod dot;

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::{json, Value};

use crate::error::Result;
use crate::session::{Reply, Session, DEFAULT_SCOUT_WHAT, ROUTER_ADMIN_SELECTOR};

pub use admin::{Link, RouterSession, RouterState};

/// Label used for the local session
pub const SELF_LABEL: &str = "Me!";

/// Characters of the zid used when no metadata label exists
pub const SHORT_ZID_LEN: usize = 5;

/// A node of the network graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub zid: String,
    pub whatami: String,
    pub metadata: Option<Value>,
}

/// An undirected link between two nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub a: String,
    pub b: String,

    /// Comma-joined link protocols
    pub protocol: String,
}

/// Snapshot of the network around one session
#[derive(Debug, Clone, Default)]
pub struct NetworkGraph {
    me: String,
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<(String, String), String>,
}

impl NetworkGraph {
    /// Start a graph holding only the local session
    pub fn new(me: impl Into<String>, whatami: impl Into<String>) -> Self {
        let me = me.into();
        let mut graph = Self {
            me: me.clone(),
            ..Default::default()
        };
        graph.add_node(&me, whatami, None);
        graph
    }

    /// Snapshot the network: scout, then ask every router for its sessions
    pub fn snapshot<S: Session>(session: &S, scout_timeout: Duration) -> Result<Self> {
        let mut graph = Self::new(session.zid(), session.mode());

        for hello in session.scout(DEFAULT_SCOUT_WHAT, scout_timeout)? {
            tracing::debug!("Scout answer zid: {} whatami: {}", hello.zid, hello.whatami);
            graph.add_node(&hello.zid, hello.whatami, None);
        }

        session.get(ROUTER_ADMIN_SELECTOR, None, None, &mut |reply| match reply {
            Reply::Ok(sample) => match RouterState::from_slice(&sample.payload) {
                Ok(router) => graph.add_router(router),
                Err(e) => tracing::error!("Unreadable router state on {}: {}", sample.key, e),
            },
            Reply::Err(payload) => {
                tracing::error!("Received error ({:?})", String::from_utf8_lossy(&payload))
            }
        })?;

        Ok(graph)
    }

    // =========================================================================
    // Building
    // =========================================================================

    /// Add a node, or update its role (and metadata, when given)
    pub fn add_node(&mut self, zid: &str, whatami: impl Into<String>, metadata: Option<Value>) {
        let whatami = whatami.into();
        self.nodes
            .entry(zid.to_string())
            .and_modify(|node| {
                node.whatami = whatami.clone();
                if metadata.is_some() {
                    node.metadata = metadata.clone();
                }
            })
            .or_insert_with(|| Node {
                zid: zid.to_string(),
                whatami,
                metadata,
            });
    }

    /// Add an undirected edge; a repeated edge takes the latest protocol
    pub fn add_edge(&mut self, a: &str, b: &str, protocol: impl Into<String>) {
        let key = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        self.edges.insert(key, protocol.into());
    }

    /// Merge a router's admin-space state
    pub fn add_router(&mut self, router: RouterState) {
        self.add_node(&router.zid, "router", router.metadata);
        for session in &router.sessions {
            self.add_node(&session.peer, session.whatami.clone(), None);
            self.add_edge(&router.zid, &session.peer, session.protocols());
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn me(&self) -> &str {
        &self.me
    }

    pub fn node(&self, zid: &str) -> Option<&Node> {
        self.nodes.get(zid)
    }

    /// Nodes ordered by zid
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges ordered by endpoints
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().map(|((a, b), protocol)| Edge {
            a: a.clone(),
            b: b.clone(),
            protocol: protocol.clone(),
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Display label for a node
    ///
    /// `field` is a JSON pointer into the node's metadata (e.g. `/name`).
    /// Falls back to the first few characters of the zid.
    pub fn label(&self, node: &Node, field: &str) -> String {
        if node.zid == self.me {
            return SELF_LABEL.to_string();
        }

        let attributes = json!({
            "whatami": node.whatami,
            "metadata": node.metadata,
        });

        match attributes.pointer(&format!("/metadata{}", field)) {
            Some(Value::String(label)) => label.clone(),
            Some(Value::Null) | None => node.zid.chars().take(SHORT_ZID_LEN).collect(),
            Some(other) => other.to_string(),
        }
    }
}
