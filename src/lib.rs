//! # zenoh-cli
//!
//! A command-line client for the Zenoh pub/sub/query data bus:
//! - put / get / delete / subscribe against a Zenoh session
//! - scout and info for discovery
//! - a network graph of routers, peers and clients
//! - pluggable codecs between terminal text and wire bytes
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  CLI (clap) + Logging                        │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                 Command Dispatcher                           │
//! │     info · network · scout · delete · put · get · subscribe  │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │ Value Resolver  │                │     Session     │
//!   │ literal/@file/- │                │ Zenoh/Loopback  │
//!   └────────┬────────┘                └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │ Codec Registry  │
//!   │built-ins+plugins│
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod cli;

pub mod codec;
pub mod value;
pub mod session;
pub mod network;
pub mod commands;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CliError, Result};
pub use config::SessionConfig;
pub use codec::CodecRegistry;
/// `LoopbackSession` is public so embedders can run commands without a bus
pub use session::{LoopbackSession, Session, ZenohSession};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of zenoh-cli
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the codec registry: built-ins first, then plugins
pub fn build_registry(load_plugins: bool) -> CodecRegistry {
    let mut registry = CodecRegistry::with_builtins();
    if load_plugins {
        let plugins = codec::bundled();
        let loaded = registry.load_plugins(&plugins);
        tracing::debug!("Loaded {} of {} codec plugins", loaded, plugins.len());
    }
    registry
}
