//! Configuration for zenoh-cli
//!
//! Session settings gathered from the command line, with sensible defaults.
//! Translating them into a `zenoh::Config` lives in [`crate::session`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;

use crate::error::{CliError, Result};

/// Session configuration for one process run
#[derive(Debug, Clone)]
pub struct SessionConfig {
    // -------------------------------------------------------------------------
    // Topology
    // -------------------------------------------------------------------------
    /// Role this session plays on the bus
    pub mode: Mode,

    /// Endpoints to connect to (e.g. `tcp/10.0.0.1:7447`)
    pub connect: Vec<String>,

    /// Endpoints to listen on
    pub listen: Vec<String>,

    // -------------------------------------------------------------------------
    // Raw Zenoh configuration
    // -------------------------------------------------------------------------
    /// Optional Zenoh configuration file, loaded before anything else
    pub config_file: Option<PathBuf>,

    /// `PATH:VALUE` overrides, applied in order after everything else
    pub overrides: Vec<ConfigOverride>,
}

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    #[default]
    Peer,
    Client,
    Router,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Peer => "peer",
            Mode::Client => "client",
            Mode::Router => "router",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `PATH:VALUE` configuration override
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOverride {
    /// Slash-separated path into the Zenoh configuration
    pub path: String,

    /// Raw value, JSON5 if it parses, a plain string otherwise
    pub value: String,
}

impl ConfigOverride {
    /// Parse `PATH:VALUE`, splitting at the first colon
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once(':') {
            Some((path, value)) if !path.is_empty() => Ok(Self {
                path: path.to_string(),
                value: value.to_string(),
            }),
            _ => Err(CliError::Config(format!(
                "expected PATH:VALUE, got '{}'",
                raw
            ))),
        }
    }
}

impl FromStr for ConfigOverride {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Peer,
            connect: Vec::new(),
            listen: Vec::new(),
            config_file: None,
            overrides: Vec::new(),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for SessionConfig
#[derive(Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the session mode
    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Add endpoints to connect to
    pub fn connect<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.connect.extend(endpoints.into_iter().map(Into::into));
        self
    }

    /// Add endpoints to listen on
    pub fn listen<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.listen.extend(endpoints.into_iter().map(Into::into));
        self
    }

    /// Set the Zenoh configuration file
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.config_file = path;
        self
    }

    /// Append a `PATH:VALUE` override
    pub fn override_with(mut self, item: ConfigOverride) -> Self {
        self.config.overrides.push(item);
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}
