//! In-process session
//!
//! A [`Session`] that never leaves the process: puts are stored and fanned
//! out to matching subscribers, queries are answered from the store and from
//! canned replies. Key expressions are matched with Zenoh's own rules.
//!
//! Part of the public API: downstream code drives the commands against it
//! without a network, the same way this crate's tests do.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use crossbeam::channel::Sender;
use parking_lot::{Mutex, RwLock};
use zenoh::key_expr::keyexpr;

use super::{Hello, Reply, Sample, SampleKind, Session};
use crate::error::{CliError, Result};

type Subscriptions = Arc<Mutex<Vec<(u64, String, Sender<Sample>)>>>;

/// Session backed by process memory
pub struct LoopbackSession {
    zid: String,
    mode: String,

    /// Latest value per key, plus everything configured up front
    state: RwLock<State>,

    /// Live subscriptions: (id, key expression, sink)
    subscriptions: Subscriptions,

    next_subscription: AtomicU64,
}

#[derive(Default)]
struct State {
    store: BTreeMap<String, Bytes>,
    published: Vec<Sample>,
    queries: Vec<(String, Option<Bytes>)>,
    queryables: Vec<(String, Vec<Reply>)>,
    routers: Vec<String>,
    peers: Vec<String>,
    hellos: Vec<Hello>,
}

/// Keeps a loopback subscription alive
pub struct LoopbackSubscriber {
    id: u64,
    subscriptions: Subscriptions,
}

impl Drop for LoopbackSubscriber {
    fn drop(&mut self) {
        self.subscriptions.lock().retain(|(id, _, _)| *id != self.id);
    }
}

fn checked(key: &str) -> Result<&keyexpr> {
    keyexpr::new(key).map_err(|e| CliError::Session(format!("invalid key expression '{}': {}", key, e)))
}

/// Key expression part of a selector (`demo/**?a=1` → `demo/**`)
fn selector_key(selector: &str) -> &str {
    selector.split_once('?').map_or(selector, |(key, _)| key)
}

impl LoopbackSession {
    pub fn new(zid: impl Into<String>) -> Self {
        Self {
            zid: zid.into(),
            mode: "peer".to_string(),
            state: RwLock::new(State::default()),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            next_subscription: AtomicU64::new(1),
        }
    }

    // =========================================================================
    // Setup
    // =========================================================================

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_routers<I: IntoIterator<Item = S>, S: Into<String>>(self, zids: I) -> Self {
        self.state.write().routers = zids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_peers<I: IntoIterator<Item = S>, S: Into<String>>(self, zids: I) -> Self {
        self.state.write().peers = zids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_hellos(self, hellos: Vec<Hello>) -> Self {
        self.state.write().hellos = hellos;
        self
    }

    /// Answer queries intersecting `key` with these replies
    pub fn with_queryable(self, key: impl Into<String>, replies: Vec<Reply>) -> Self {
        self.state.write().queryables.push((key.into(), replies));
        self
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Every put and delete, in order
    pub fn published(&self) -> Vec<Sample> {
        self.state.read().published.clone()
    }

    /// Every query as (selector, payload), in order
    pub fn queries(&self) -> Vec<(String, Option<Bytes>)> {
        self.state.read().queries.clone()
    }

    /// Current value stored under an exact key
    pub fn stored(&self, key: &str) -> Option<Bytes> {
        self.state.read().store.get(key).cloned()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    fn publish(&self, sample: Sample) -> Result<()> {
        let key = checked(&sample.key)?;

        {
            let mut state = self.state.write();
            match sample.kind {
                SampleKind::Put => {
                    state.store.insert(sample.key.clone(), sample.payload.clone());
                }
                SampleKind::Delete => {
                    state.store.remove(&sample.key);
                }
            }
            state.published.push(sample.clone());
        }

        for (_, pattern, sink) in self.subscriptions.lock().iter() {
            let matches = keyexpr::new(pattern.as_str())
                .map(|pattern| pattern.intersects(key))
                .unwrap_or(false);
            if matches && sink.send(sample.clone()).is_err() {
                tracing::trace!("Subscriber on {} has no receiver", pattern);
            }
        }

        Ok(())
    }
}

impl Session for LoopbackSession {
    type Subscriber = LoopbackSubscriber;

    fn zid(&self) -> String {
        self.zid.clone()
    }

    fn mode(&self) -> String {
        self.mode.clone()
    }

    fn routers(&self) -> Result<Vec<String>> {
        Ok(self.state.read().routers.clone())
    }

    fn peers(&self) -> Result<Vec<String>> {
        Ok(self.state.read().peers.clone())
    }

    fn put(&self, key: &str, payload: Bytes) -> Result<()> {
        self.publish(Sample::put(key, payload))
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.publish(Sample::delete(key))
    }

    fn get(
        &self,
        selector: &str,
        payload: Option<Bytes>,
        _timeout: Option<Duration>,
        on_reply: &mut dyn FnMut(Reply),
    ) -> Result<()> {
        let query = checked(selector_key(selector))?;

        // Collect under the lock, reply without it
        let replies: Vec<Reply> = {
            let mut state = self.state.write();
            state.queries.push((selector.to_string(), payload));

            let stored = state
                .store
                .iter()
                .filter(|(key, _)| {
                    keyexpr::new(key.as_str())
                        .map(|key| key.intersects(query))
                        .unwrap_or(false)
                })
                .map(|(key, value)| Reply::Ok(Sample::put(key.clone(), value.clone())));

            let canned = state
                .queryables
                .iter()
                .filter(|(key, _)| {
                    keyexpr::new(key.as_str())
                        .map(|key| key.intersects(query))
                        .unwrap_or(false)
                })
                .flat_map(|(_, replies)| replies.iter().cloned());

            stored.chain(canned).collect()
        };

        for reply in replies {
            on_reply(reply);
        }

        Ok(())
    }

    fn subscribe(&self, key: &str, sink: Sender<Sample>) -> Result<Self::Subscriber> {
        checked(key)?;
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        self.subscriptions.lock().push((id, key.to_string(), sink));

        Ok(LoopbackSubscriber {
            id,
            subscriptions: Arc::clone(&self.subscriptions),
        })
    }

    fn scout(&self, _what: &str, _timeout: Duration) -> Result<Vec<Hello>> {
        Ok(self.state.read().hellos.clone())
    }
}
