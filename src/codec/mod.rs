//! Codec Module
//!
//! Converts between human-facing text and the raw bytes carried on the bus.
//!
//! ## Codec Shape
//! A codec is a named pair of functions:
//! ```text
//!   encoder: (key, text)  ──▶ bytes      used by put / get payloads
//!   decoder: (key, bytes) ──▶ text       used by subscribe / get replies
//! ```
//! The key expression is passed to both halves so a codec can pick a
//! representation per key.
//!
//! ## Built-in Codecs
//! - `text`:   UTF-8 in both directions
//! - `base64`: text is base64, bytes are raw
//! - `json`:   validated; published as typed, printed on a single line
//!
//! ## Extension
//! Additional codecs come from [`CodecPlugin`]s, registered after the
//! built-ins. A plugin may shadow a built-in name.

mod builtin;
mod plugin;
mod registry;

use std::sync::Arc;

use crate::error::Result;

pub use builtin::{register_builtins, Base64Codec, JsonCodec, TextCodec};
pub use plugin::{bundled, CodecPlugin, HexPlugin, DECODERS_GROUP, ENCODERS_GROUP};
pub use registry::CodecRegistry;

/// Turns user text into bytes for publication
pub trait Encoder: Send + Sync {
    fn encode(&self, key: &str, value: &str) -> Result<Vec<u8>>;
}

/// Turns received bytes into printable text
pub trait Decoder: Send + Sync {
    fn decode(&self, key: &str, payload: &[u8]) -> Result<String>;
}

impl<F> Encoder for F
where
    F: Fn(&str, &str) -> Result<Vec<u8>> + Send + Sync,
{
    fn encode(&self, key: &str, value: &str) -> Result<Vec<u8>> {
        self(key, value)
    }
}

impl<F> Decoder for F
where
    F: Fn(&str, &[u8]) -> Result<String> + Send + Sync,
{
    fn decode(&self, key: &str, payload: &[u8]) -> Result<String> {
        self(key, payload)
    }
}

/// Shared handle to a registered encoder
pub type EncoderRef = Arc<dyn Encoder>;

/// Shared handle to a registered decoder
pub type DecoderRef = Arc<dyn Decoder>;
