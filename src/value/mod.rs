//! Value Module
//!
//! Resolves user-supplied values into payload bytes, and received payloads
//! back into printable text.
//!
//! ## Value Sources
//! ```text
//!   -v hello        literal
//!   -v @data.json   contents of data.json
//!   -v -            standard input, read to exhaustion
//! ```
//!
//! ## Line Handling
//! - [`LinePattern`] pulls `{key}` / `{value}` out of input lines (`put --line`)
//! - [`LineFormat`] renders received samples (`get` / `subscribe --line`)

mod pattern;

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use bytes::Bytes;

use crate::codec::{Decoder, Encoder};
use crate::error::Result;

pub use pattern::{LineFormat, LinePattern, LineMatch};

/// Marker selecting standard input as the value source
pub const STDIN_MARKER: &str = "-";

/// Prefix selecting a file as the value source
pub const FILE_PREFIX: char = '@';

/// Where a value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSpec {
    /// Used as given
    Literal(String),

    /// Read from a file
    File(PathBuf),

    /// Read from standard input
    Stdin,
}

impl ValueSpec {
    /// Interpret a command-line value
    pub fn parse(raw: &str) -> Self {
        if raw == STDIN_MARKER {
            ValueSpec::Stdin
        } else if let Some(path) = raw.strip_prefix(FILE_PREFIX) {
            ValueSpec::File(PathBuf::from(path))
        } else {
            ValueSpec::Literal(raw.to_string())
        }
    }

    /// Read the value as text, taking `Stdin` from the process
    pub fn read(&self) -> Result<String> {
        self.read_from(&mut std::io::stdin().lock())
    }

    /// Read the value as text, taking `Stdin` from the given reader
    pub fn read_from<R: Read>(&self, stdin: &mut R) -> Result<String> {
        match self {
            ValueSpec::Literal(value) => Ok(value.clone()),
            ValueSpec::File(path) => {
                let value = fs::read_to_string(path)?;
                tracing::debug!("Read {} bytes from {}", value.len(), path.display());
                Ok(value)
            }
            ValueSpec::Stdin => {
                let mut value = String::new();
                stdin.read_to_string(&mut value)?;
                Ok(value)
            }
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, ValueSpec::Stdin)
    }
}

impl From<&str> for ValueSpec {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

/// Resolve a value and encode it for `key`
///
/// Nothing is returned unless both reading and encoding succeed.
pub fn to_bytes<R: Read>(
    spec: &ValueSpec,
    key: &str,
    encoder: &dyn Encoder,
    stdin: &mut R,
) -> Result<Bytes> {
    let value = spec.read_from(stdin)?;
    let payload = encoder.encode(key, &value)?;
    Ok(Bytes::from(payload))
}

/// Decode a received payload for display
pub fn to_text(key: &str, payload: &[u8], decoder: &dyn Decoder) -> Result<String> {
    decoder.decode(key, payload)
}
