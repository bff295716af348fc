//! Codec registry
//!
//! Name → encoder and name → decoder lookup tables.
//!
//! ## Lifecycle
//! 1. `CodecRegistry::with_builtins()` registers `text`, `base64`, `json`
//! 2. `load_plugins()` adds plugin codecs, possibly shadowing built-ins
//! 3. The registry is only read from then on
//!
//! Later registrations for a name replace earlier ones.

use std::collections::HashMap;

use super::{
    register_builtins, CodecPlugin, Decoder, DecoderRef, Encoder, EncoderRef, DECODERS_GROUP,
    ENCODERS_GROUP,
};
use crate::error::{CliError, CodecKind, Result};

/// Registry of named encoders and decoders
#[derive(Default, Clone)]
pub struct CodecRegistry {
    encoders: HashMap<String, EncoderRef>,
    decoders: HashMap<String, DecoderRef>,
}

impl CodecRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in codecs
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtins(&mut registry);
        registry
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register both halves of a codec under one name
    pub fn register(&mut self, name: &str, encoder: EncoderRef, decoder: DecoderRef) {
        self.register_encoder(name, encoder);
        self.register_decoder(name, decoder);
    }

    /// Register an encoder, replacing any previous one with that name
    pub fn register_encoder(&mut self, name: &str, encoder: EncoderRef) {
        if self.encoders.insert(name.to_string(), encoder).is_some() {
            tracing::warn!("Encoder '{}' shadows an earlier registration", name);
        }
    }

    /// Register a decoder, replacing any previous one with that name
    pub fn register_decoder(&mut self, name: &str, decoder: DecoderRef) {
        if self.decoders.insert(name.to_string(), decoder).is_some() {
            tracing::warn!("Decoder '{}' shadows an earlier registration", name);
        }
    }

    /// Register every codec a set of plugins provides
    ///
    /// Each plugin registers into a scratch registry first; only a plugin
    /// that succeeds as a whole is merged. Failing plugins are logged and
    /// skipped. Returns the number of plugins loaded.
    pub fn load_plugins(&mut self, plugins: &[Box<dyn CodecPlugin>]) -> usize {
        let mut loaded = 0;

        for plugin in plugins {
            let mut scratch = CodecRegistry::new();
            match plugin.register(&mut scratch) {
                Ok(()) => {
                    tracing::debug!(
                        "Loaded codec plugin '{}' ({}: {:?}, {}: {:?})",
                        plugin.name(),
                        ENCODERS_GROUP,
                        scratch.encoder_names(),
                        DECODERS_GROUP,
                        scratch.decoder_names()
                    );
                    self.merge(scratch);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::error!("Failed to load codec plugin '{}': {}", plugin.name(), e);
                }
            }
        }

        loaded
    }

    fn merge(&mut self, other: CodecRegistry) {
        for (name, encoder) in other.encoders {
            self.register_encoder(&name, encoder);
        }
        for (name, decoder) in other.decoders {
            self.register_decoder(&name, decoder);
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Look up an encoder by name
    pub fn encoder(&self, name: &str) -> Result<EncoderRef> {
        self.encoders
            .get(name)
            .cloned()
            .ok_or_else(|| CliError::UnknownCodec {
                kind: CodecKind::Encoder,
                name: name.to_string(),
            })
    }

    /// Look up a decoder by name
    pub fn decoder(&self, name: &str) -> Result<DecoderRef> {
        self.decoders
            .get(name)
            .cloned()
            .ok_or_else(|| CliError::UnknownCodec {
                kind: CodecKind::Decoder,
                name: name.to_string(),
            })
    }

    /// Look up both halves of a codec
    pub fn resolve(&self, name: &str) -> Result<(EncoderRef, DecoderRef)> {
        Ok((self.encoder(name)?, self.decoder(name)?))
    }

    /// Registered encoder names, sorted
    pub fn encoder_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.encoders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered decoder names, sorted
    pub fn decoder_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.decoders.keys().cloned().collect();
        names.sort();
        names
    }

    /// Encode through a named encoder
    pub fn encode(&self, name: &str, key: &str, value: &str) -> Result<Vec<u8>> {
        self.encoder(name)?.encode(key, value)
    }

    /// Decode through a named decoder
    pub fn decode(&self, name: &str, key: &str, payload: &[u8]) -> Result<String> {
        self.decoder(name)?.decode(key, payload)
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("encoders", &self.encoder_names())
            .field("decoders", &self.decoder_names())
            .finish()
    }
}
