//! Built-in codecs
//!
//! `text`, `base64` and `json`, always registered before any plugin.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::IgnoredAny;

use super::{CodecRegistry, Decoder, Encoder};
use crate::error::{CliError, Result};

/// UTF-8 text in both directions
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl TextCodec {
    pub const NAME: &'static str = "text";
}

impl Encoder for TextCodec {
    fn encode(&self, _key: &str, value: &str) -> Result<Vec<u8>> {
        Ok(value.as_bytes().to_vec())
    }
}

impl Decoder for TextCodec {
    fn decode(&self, _key: &str, payload: &[u8]) -> Result<String> {
        String::from_utf8(payload.to_vec()).map_err(|e| CliError::codec(Self::NAME, e))
    }
}

/// Base64 text on the command line, raw bytes on the wire
///
/// Encoding *decodes* the user's base64 text; decoding renders received
/// bytes as base64. Useful for binary payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Base64Codec {
    pub const NAME: &'static str = "base64";
}

impl Encoder for Base64Codec {
    fn encode(&self, _key: &str, value: &str) -> Result<Vec<u8>> {
        STANDARD
            .decode(value.trim())
            .map_err(|e| CliError::codec(Self::NAME, e))
    }
}

impl Decoder for Base64Codec {
    fn decode(&self, _key: &str, payload: &[u8]) -> Result<String> {
        Ok(STANDARD.encode(payload))
    }
}

/// JSON documents
///
/// Encoding validates the text and publishes it byte for byte. Decoding
/// validates the payload and drops whitespace outside strings, so key order
/// and number spelling survive and the output fits on one line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    pub const NAME: &'static str = "json";
}

impl Encoder for JsonCodec {
    fn encode(&self, _key: &str, value: &str) -> Result<Vec<u8>> {
        serde_json::from_str::<IgnoredAny>(value).map_err(|e| CliError::codec(Self::NAME, e))?;
        Ok(value.as_bytes().to_vec())
    }
}

impl Decoder for JsonCodec {
    fn decode(&self, _key: &str, payload: &[u8]) -> Result<String> {
        serde_json::from_slice::<IgnoredAny>(payload).map_err(|e| CliError::codec(Self::NAME, e))?;
        let text = std::str::from_utf8(payload).map_err(|e| CliError::codec(Self::NAME, e))?;
        Ok(compact(text))
    }
}

/// Remove insignificant whitespace from a valid JSON document
fn compact(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if !matches!(c, ' ' | '\t' | '\n' | '\r') {
            out.push(c);
        }
    }

    out
}

/// Register `text`, `base64` and `json`
pub fn register_builtins(registry: &mut CodecRegistry) {
    registry.register(TextCodec::NAME, Arc::new(TextCodec), Arc::new(TextCodec));
    registry.register(Base64Codec::NAME, Arc::new(Base64Codec), Arc::new(Base64Codec));
    registry.register(JsonCodec::NAME, Arc::new(JsonCodec), Arc::new(JsonCodec));
}
