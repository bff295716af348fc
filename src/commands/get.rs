//! `get`: query a selector and print every reply

use std::io::{Read, Write};

use super::{print_sample, seconds};
use crate::cli::GetArgs;
use crate::codec::CodecRegistry;
use crate::error::Result;
use crate::session::{Reply, Session};
use crate::value::{self, LineFormat, ValueSpec};

pub fn get<S: Session, R: Read, W: Write>(
    session: &S,
    codecs: &CodecRegistry,
    args: &GetArgs,
    stdin: &mut R,
    out: &mut W,
) -> Result<()> {
    let encoder = codecs.encoder(&args.codec.encoder)?;
    let decoder = codecs.decoder(&args.codec.decoder)?;
    let format = LineFormat::parse(&args.line)?;
    let timeout = args.timeout.map(|t| seconds(t, "--timeout")).transpose()?;

    let payload = match &args.value {
        Some(raw) => Some(value::to_bytes(
            &ValueSpec::parse(raw),
            &args.selector,
            encoder.as_ref(),
            stdin,
        )?),
        None => None,
    };

    // First write error wins; later replies are dropped
    let mut written: Result<()> = Ok(());
    session.get(&args.selector, payload, timeout, &mut |reply| {
        if written.is_err() {
            return;
        }
        match reply {
            Reply::Ok(sample) => {
                written = print_sample(out, &sample, &format, decoder.as_ref(), &args.codec.decoder);
            }
            Reply::Err(payload) => {
                tracing::error!(
                    "Received error ({}) on get({})",
                    String::from_utf8_lossy(&payload),
                    args.selector
                );
            }
        }
    })?;

    written
}
