//! Zenoh-backed session
//!
//! Thin adapter from [`Session`] onto the `zenoh` crate's blocking API.

use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam::channel::Sender;
use zenoh::config::WhatAmIMatcher;
use zenoh::pubsub::Subscriber;
use zenoh::Wait;

use super::{Hello, Reply, Sample, SampleKind, Session};
use crate::config::SessionConfig;
use crate::error::{CliError, Result};

/// A live Zenoh session
pub struct ZenohSession {
    session: zenoh::Session,

    /// Kept for scouting, which runs outside the session
    config: zenoh::Config,

    mode: String,
}

impl ZenohSession {
    /// Open a session from command-line settings
    pub fn open(config: &SessionConfig) -> Result<Self> {
        let zconfig = build_config(config)?;

        tracing::info!("Opening Zenoh session...");
        let session = zenoh::open(zconfig.clone())
            .wait()
            .map_err(CliError::session)?;
        tracing::info!("Session {} opened in {} mode", session.zid(), config.mode);

        Ok(Self {
            session,
            config: zconfig,
            mode: config.mode.to_string(),
        })
    }

    /// Close the session, flushing anything pending
    pub fn close(self) -> Result<()> {
        self.session.close().wait().map_err(CliError::session)
    }
}

/// Translate settings into a Zenoh configuration
///
/// Order: file (or defaults), mode, endpoints, then `PATH:VALUE` overrides.
pub fn build_config(config: &SessionConfig) -> Result<zenoh::Config> {
    let mut zconfig = match &config.config_file {
        Some(path) => {
            tracing::debug!("Loading Zenoh configuration from {}", path.display());
            zenoh::Config::from_file(path).map_err(|e| CliError::Config(e.to_string()))?
        }
        None => zenoh::Config::default(),
    };

    insert(&mut zconfig, "mode", &serde_json::to_string(config.mode.as_str())?)?;
    if !config.connect.is_empty() {
        insert(&mut zconfig, "connect/endpoints", &serde_json::to_string(&config.connect)?)?;
    }
    if !config.listen.is_empty() {
        insert(&mut zconfig, "listen/endpoints", &serde_json::to_string(&config.listen)?)?;
    }

    for item in &config.overrides {
        tracing::info!("Configuring with PATH={}, VALUE={}", item.path, item.value);
        if zconfig.insert_json5(&item.path, &item.value).is_err() {
            // Not JSON5: treat the raw text as a string
            insert(&mut zconfig, &item.path, &serde_json::to_string(&item.value)?)?;
        }
    }

    Ok(zconfig)
}

fn insert(zconfig: &mut zenoh::Config, path: &str, value: &str) -> Result<()> {
    zconfig
        .insert_json5(path, value)
        .map_err(|e| CliError::Config(format!("{}: {}", path, e)))
}

fn to_sample(sample: &zenoh::sample::Sample) -> Sample {
    Sample {
        key: sample.key_expr().to_string(),
        payload: Bytes::from(sample.payload().to_bytes().into_owned()),
        kind: match sample.kind() {
            zenoh::sample::SampleKind::Put => SampleKind::Put,
            zenoh::sample::SampleKind::Delete => SampleKind::Delete,
        },
    }
}

impl Session for ZenohSession {
    type Subscriber = Subscriber<()>;

    fn zid(&self) -> String {
        self.session.zid().to_string()
    }

    fn mode(&self) -> String {
        self.mode.clone()
    }

    fn routers(&self) -> Result<Vec<String>> {
        Ok(self
            .session
            .info()
            .routers_zid()
            .wait()
            .map(|zid| zid.to_string())
            .collect())
    }

    fn peers(&self) -> Result<Vec<String>> {
        Ok(self
            .session
            .info()
            .peers_zid()
            .wait()
            .map(|zid| zid.to_string())
            .collect())
    }

    fn put(&self, key: &str, payload: Bytes) -> Result<()> {
        tracing::debug!("put {} ({} bytes)", key, payload.len());
        self.session
            .put(key, payload.to_vec())
            .wait()
            .map_err(CliError::session)
    }

    fn delete(&self, key: &str) -> Result<()> {
        tracing::debug!("delete {}", key);
        self.session.delete(key).wait().map_err(CliError::session)
    }

    fn get(
        &self,
        selector: &str,
        payload: Option<Bytes>,
        timeout: Option<Duration>,
        on_reply: &mut dyn FnMut(Reply),
    ) -> Result<()> {
        let mut query = self.session.get(selector);
        if let Some(payload) = payload {
            query = query.payload(payload.to_vec());
        }
        if let Some(timeout) = timeout {
            query = query.timeout(timeout);
        }
        let replies = query.wait().map_err(CliError::session)?;

        // The channel closes once the query is finalized
        while let Ok(reply) = replies.recv() {
            match reply.result() {
                Ok(sample) => on_reply(Reply::Ok(to_sample(sample))),
                Err(err) => on_reply(Reply::Err(Bytes::from(
                    err.payload().to_bytes().into_owned(),
                ))),
            }
        }

        Ok(())
    }

    fn subscribe(&self, key: &str, sink: Sender<Sample>) -> Result<Self::Subscriber> {
        tracing::debug!("Declaring subscriber on {}", key);
        self.session
            .declare_subscriber(key)
            .callback(move |sample| {
                if sink.send(to_sample(&sample)).is_err() {
                    tracing::trace!("Sample dropped, receiver is gone");
                }
            })
            .wait()
            .map_err(CliError::session)
    }

    fn scout(&self, what: &str, timeout: Duration) -> Result<Vec<Hello>> {
        let matcher: WhatAmIMatcher = what
            .parse()
            .map_err(|_| CliError::Usage(format!("invalid scouting target '{}'", what)))?;

        let scout = zenoh::scout(matcher, self.config.clone())
            .wait()
            .map_err(CliError::session)?;

        let deadline = Instant::now() + timeout;
        let mut hellos = Vec::new();
        while let Ok(Some(hello)) = scout.recv_deadline(deadline) {
            tracing::debug!("Scout answer: {:?}", hello);
            hellos.push(Hello {
                zid: hello.zid().to_string(),
                whatami: hello.whatami().to_string(),
                locators: hello.locators().iter().map(|l| l.to_string()).collect(),
            });
        }
        drop(scout);

        Ok(hellos)
    }
}
