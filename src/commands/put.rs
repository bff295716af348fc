//! `put`: publish one value, or one value per input line
//!
//! ## Modes
//! - plain:     `put -k KEY -v VALUE`, both required and non-empty
//! - line mode: `put --line PATTERN`, each stdin line matched against the
//!   pattern; `-k` / `-v` replace the `{key}` / `{value}` fields
//!
//! In line mode a line that does not match, or a value the encoder rejects,
//! is logged and skipped. Session failures still abort.

use std::io::BufRead;

use bytes::Bytes;

use crate::cli::PutArgs;
use crate::codec::{CodecRegistry, Encoder};
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::value::{self, LinePattern, ValueSpec};

pub fn put<S: Session, R: BufRead>(
    session: &S,
    codecs: &CodecRegistry,
    args: &PutArgs,
    stdin: &mut R,
) -> Result<()> {
    let encoder = codecs.encoder(&args.codec.encoder)?;

    let Some(pattern) = &args.line else {
        let key = args.key.as_deref().filter(|key| !key.is_empty());
        let value = args.value.as_deref().filter(|value| !value.is_empty());
        let (Some(key), Some(value)) = (key, value) else {
            return Err(CliError::Usage(
                "A key and a value must be specified on the command line.".to_string(),
            ));
        };

        let payload = value::to_bytes(&ValueSpec::parse(value), key, encoder.as_ref(), stdin)?;
        return session.put(key, payload);
    };

    let pattern = LinePattern::compile(pattern)?;
    tracing::debug!("Reading lines matching '{}'", pattern.as_str());
    if !pattern.has_field("key") && args.key.is_none() {
        return Err(CliError::Usage(
            "A key must be specified either on the command line or as a pattern parameter."
                .to_string(),
        ));
    }
    if !pattern.has_field("value") && args.value.is_none() {
        return Err(CliError::Usage(
            "A value must be specified either on the command line or as a pattern parameter."
                .to_string(),
        ));
    }

    // Resolved once, reused for every line
    let fixed_value = match &args.value {
        Some(raw) => {
            let spec = ValueSpec::parse(raw);
            if spec.is_stdin() {
                return Err(CliError::Usage(
                    "--line reads standard input; the value cannot come from it too.".to_string(),
                ));
            }
            Some(spec.read_from(stdin)?)
        }
        None => None,
    };

    let mut published = 0usize;
    for line in stdin.lines() {
        let line = line?;

        let Some(fields) = pattern.parse(&line) else {
            tracing::error!("Failed to parse line: {}", line);
            continue;
        };

        let key = args.key.as_deref().or_else(|| fields.get("key"));
        let value = fixed_value.as_deref().or_else(|| fields.get("value"));
        let (Some(key), Some(value)) = (key, value) else {
            tracing::error!("Failed to parse line: {}", line);
            continue;
        };

        let payload = match encoder.encode(key, value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("Encoder ({}) failed, skipping! {}", args.codec.encoder, e);
                continue;
            }
        };

        session.put(key, Bytes::from(payload))?;
        published += 1;
    }

    tracing::debug!("Published {} values from standard input", published);
    Ok(())
}
