//! `subscribe`: print samples as they arrive
//!
//! Session callbacks run on the bus library's threads. They only forward
//! samples over a channel; this thread decodes and prints them in arrival
//! order. SIGINT/SIGTERM set a flag that ends the loop, after whatever is
//! already queued has been printed.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError};
use signal_hook::consts::signal::{SIGINT, SIGTERM};

use super::print_sample;
use crate::cli::SubscribeArgs;
use crate::codec::CodecRegistry;
use crate::error::Result;
use crate::session::Session;
use crate::value::LineFormat;

/// How often the stop flag is checked while no samples arrive
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Flag raised on SIGINT or SIGTERM
pub fn interrupt_flag() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, Arc::clone(&flag))?;
    }
    Ok(flag)
}

pub fn subscribe<S: Session, W: Write>(
    session: &S,
    codecs: &CodecRegistry,
    args: &SubscribeArgs,
    stop: &AtomicBool,
    out: &mut W,
) -> Result<()> {
    let decoder = codecs.decoder(&args.codec.decoder)?;
    let format = LineFormat::parse(&args.line)?;

    let (sink, samples) = channel::unbounded();
    let _subscribers = args
        .key
        .iter()
        .map(|key| session.subscribe(key, sink.clone()))
        .collect::<Result<Vec<_>>>()?;
    drop(sink);

    tracing::info!("Subscribed to {} key expression(s)", args.key.len());

    while !stop.load(Ordering::SeqCst) {
        match samples.recv_timeout(POLL_INTERVAL) {
            Ok(sample) => {
                print_sample(out, &sample, &format, decoder.as_ref(), &args.codec.decoder)?
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("All subscriptions closed");
                return Ok(());
            }
        }
    }

    for sample in samples.try_iter() {
        print_sample(out, &sample, &format, decoder.as_ref(), &args.codec.decoder)?;
    }

    tracing::info!("Interrupted, closing subscriptions");
    Ok(())
}
