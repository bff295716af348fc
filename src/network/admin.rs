//! Router admin-space documents
//!
//! Routers answer `@/*/router` with a JSON description of themselves:
//! ```text
//! {
//!   "zid": "...",
//!   "metadata": { "name": "..." },
//!   "sessions": [
//!     { "peer": "...", "whatami": "peer", "links": [...] }
//!   ]
//! }
//! ```
//! Links are plain locator strings on older routers and objects with a
//! `src` locator on newer ones; both are accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// State a router reports about itself
#[derive(Debug, Clone, Deserialize)]
pub struct RouterState {
    pub zid: String,

    #[serde(default)]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub sessions: Vec<RouterSession>,
}

/// One session held by a router
#[derive(Debug, Clone, Deserialize)]
pub struct RouterSession {
    pub peer: String,
    pub whatami: String,

    #[serde(default)]
    pub links: Vec<Link>,
}

/// A transport link of a session
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Link {
    /// `"tcp/10.0.0.1:7447"`
    Locator(String),

    /// `{ "src": "tcp/10.0.0.1:7447", "dst": ... }`
    Detailed { src: String },
}

impl Link {
    /// Protocol prefix of the link's source locator (`tcp`, `udp`, ...)
    pub fn protocol(&self) -> &str {
        let locator = match self {
            Link::Locator(locator) => locator,
            Link::Detailed { src } => src,
        };
        locator.split('/').next().unwrap_or(locator)
    }
}

impl RouterSession {
    /// Comma-joined link protocols, in link order
    pub fn protocols(&self) -> String {
        self.links
            .iter()
            .map(Link::protocol)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl RouterState {
    pub fn from_slice(payload: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(payload)?)
    }
}
