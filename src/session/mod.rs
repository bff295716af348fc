//! Session Module
//!
//! The boundary to the pub/sub/query bus.
//!
//! ## Responsibilities
//! - Describe what the commands need from a session ([`Session`])
//! - Back it with a real Zenoh session ([`ZenohSession`])
//! - Provide an in-process bus for tests and dry runs ([`LoopbackSession`])
//!
//! Payload bytes cross this boundary untouched; codecs are applied by the
//! commands on either side.

mod loopback;
mod zenoh_session;

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use crossbeam::channel::Sender;

use crate::error::Result;

pub use self::loopback::LoopbackSession;
pub use self::zenoh_session::{build_config, ZenohSession};

/// Admin-space selector every router answers with its state
pub const ROUTER_ADMIN_SELECTOR: &str = "@/*/router";

/// Default scouting target
pub const DEFAULT_SCOUT_WHAT: &str = "peer|router";

/// Kind of a received sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    Put,
    Delete,
}

/// A sample received from the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Key expression the sample was published on
    pub key: String,

    /// Raw payload (empty for deletes)
    pub payload: Bytes,

    pub kind: SampleKind,
}

impl Sample {
    pub fn put(key: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
            kind: SampleKind::Put,
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            payload: Bytes::new(),
            kind: SampleKind::Delete,
        }
    }
}

/// One reply to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A matching sample
    Ok(Sample),

    /// An error raised by the queryable, with its payload
    Err(Bytes),
}

/// A scouting answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    pub zid: String,
    pub whatami: String,
    pub locators: Vec<String>,
}

impl fmt::Display for Hello {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hello {{ zid: {}, whatami: {}, locators: [{}] }}",
            self.zid,
            self.whatami,
            self.locators.join(", ")
        )
    }
}

/// Operations the commands perform against the bus
///
/// Every call is one-shot and synchronous; failures are returned as is and
/// never retried.
pub trait Session {
    /// Keeps a subscription alive until dropped
    type Subscriber;

    /// This session's zid
    fn zid(&self) -> String;

    /// Mode the session was opened in (`peer`, `client`, `router`)
    fn mode(&self) -> String;

    /// Zids of connected routers
    fn routers(&self) -> Result<Vec<String>>;

    /// Zids of connected peers
    fn peers(&self) -> Result<Vec<String>>;

    /// Publish a payload on a key expression
    fn put(&self, key: &str, payload: Bytes) -> Result<()>;

    /// Publish a delete on a key expression
    fn delete(&self, key: &str) -> Result<()>;

    /// Run a query, handing each reply to `on_reply` as it arrives
    fn get(
        &self,
        selector: &str,
        payload: Option<Bytes>,
        timeout: Option<Duration>,
        on_reply: &mut dyn FnMut(Reply),
    ) -> Result<()>;

    /// Forward every sample matching `key` into `sink`
    fn subscribe(&self, key: &str, sink: Sender<Sample>) -> Result<Self::Subscriber>;

    /// Scout for `what` (e.g. `peer|router`) for `timeout`
    fn scout(&self, what: &str, timeout: Duration) -> Result<Vec<Hello>>;
}
