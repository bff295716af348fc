//! Codec plugins
//!
//! A plugin contributes encoders and/or decoders to the registry. Plugins
//! are compiled in and listed by [`bundled()`]; a downstream build adds its
//! own by implementing [`CodecPlugin`] and passing it to
//! [`CodecRegistry::load_plugins`].

use std::sync::Arc;

use super::{CodecRegistry, Decoder, Encoder};
use crate::error::{CliError, Result};

/// Registration group for plugin encoders
pub const ENCODERS_GROUP: &str = "zenoh_cli.codecs.encoders";

/// Registration group for plugin decoders
pub const DECODERS_GROUP: &str = "zenoh_cli.codecs.decoders";

/// A set of codecs registered as one unit
pub trait CodecPlugin: Send + Sync {
    /// Plugin name, for logging
    fn name(&self) -> &str;

    /// Register this plugin's codecs
    ///
    /// An error discards everything this call registered.
    fn register(&self, registry: &mut CodecRegistry) -> Result<()>;
}

/// Plugins shipped with the binary
pub fn bundled() -> Vec<Box<dyn CodecPlugin>> {
    vec![Box::new(HexPlugin)]
}

// =============================================================================
// Hex
// =============================================================================

/// Lowercase hex text on the command line, raw bytes on the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct HexPlugin;

impl HexPlugin {
    pub const NAME: &'static str = "hex";
}

impl Encoder for HexPlugin {
    fn encode(&self, _key: &str, value: &str) -> Result<Vec<u8>> {
        hex::decode(value.trim()).map_err(|e| CliError::codec(Self::NAME, e))
    }
}

impl Decoder for HexPlugin {
    fn decode(&self, _key: &str, payload: &[u8]) -> Result<String> {
        Ok(hex::encode(payload))
    }
}

impl CodecPlugin for HexPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn register(&self, registry: &mut CodecRegistry) -> Result<()> {
        registry.register(Self::NAME, Arc::new(HexPlugin), Arc::new(HexPlugin));
        Ok(())
    }
}
