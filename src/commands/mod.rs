//! Command dispatcher
//!
//! One function per subcommand. Each is generic over the [`Session`] and
//! over its input/output streams, so it runs the same against Zenoh and
//! against the in-process bus.
//!
//! ## Rules shared by all commands
//! - Session failures are returned immediately, never retried
//! - Payloads are translated only through the codec registry
//! - A sample the decoder rejects is logged and skipped

mod get;
mod info;
mod network;
mod put;
mod scout;
mod subscribe;

use std::io::{self, Write};

use crate::cli::Commands;
use crate::codec::{CodecRegistry, Decoder};
use crate::error::{CliError, Result};
use crate::session::{Sample, Session};
use crate::value::{self, LineFormat};

pub use get::get;
pub use info::info;
pub use network::{network, NETWORK_SCOUT_TIMEOUT};
pub use put::put;
pub use scout::scout;
pub use subscribe::{interrupt_flag, subscribe, POLL_INTERVAL};

/// Run a parsed subcommand against stdin/stdout
pub fn dispatch<S: Session>(session: &S, codecs: &CodecRegistry, command: &Commands) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let stdin = io::stdin();
    let mut input = stdin.lock();

    match command {
        Commands::Info => info(session, &mut out),
        Commands::Network(args) => network(session, args, &mut out),
        Commands::Scout(args) => scout(session, args, &mut out),
        Commands::Delete(args) => delete(session, &args.key),
        Commands::Put(args) => put(session, codecs, args, &mut input),
        Commands::Get(args) => get(session, codecs, args, &mut input, &mut out),
        Commands::Subscribe(args) => {
            let stop = interrupt_flag()?;
            subscribe(session, codecs, args, &stop, &mut out)
        }
        Commands::Codecs => list_codecs(codecs, &mut out),
    }
}

/// Run a subcommand that needs no session
pub fn dispatch_local(codecs: &CodecRegistry, command: &Commands) -> Result<()> {
    match command {
        Commands::Codecs => list_codecs(codecs, &mut io::stdout().lock()),
        _ => Err(CliError::Usage(format!("{:?} needs a session", command))),
    }
}

/// Delete every key, in order
pub fn delete<S: Session>(session: &S, keys: &[String]) -> Result<()> {
    for key in keys {
        session.delete(key)?;
    }
    Ok(())
}

/// Print registered codec names
pub fn list_codecs<W: Write>(codecs: &CodecRegistry, out: &mut W) -> Result<()> {
    writeln!(out, "encoders: {}", codecs.encoder_names().join(", "))?;
    writeln!(out, "decoders: {}", codecs.decoder_names().join(", "))?;
    Ok(())
}

/// Decode and print one sample
///
/// A decoder failure is logged and the sample skipped; only write errors
/// are returned.
pub fn print_sample<W: Write>(
    out: &mut W,
    sample: &Sample,
    format: &LineFormat,
    decoder: &dyn Decoder,
    decoder_name: &str,
) -> Result<()> {
    let value = match value::to_text(&sample.key, &sample.payload, decoder) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("Decoder ({}) failed, skipping! {}", decoder_name, e);
            return Ok(());
        }
    };

    writeln!(out, "{}", format.render(&sample.key, &value))?;
    out.flush()?;
    Ok(())
}

/// Seconds from the command line as a Duration
pub(crate) fn seconds(value: f64, option: &str) -> Result<std::time::Duration> {
    std::time::Duration::try_from_secs_f64(value).map_err(|_| {
        CliError::Usage(format!(
            "{} must be a non-negative number of seconds, got {}",
            option, value
        ))
    })
}
