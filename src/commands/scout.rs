//! `scout`: discover peers and routers

use std::io::Write;

use super::seconds;
use crate::cli::ScoutArgs;
use crate::error::Result;
use crate::session::Session;

pub fn scout<S: Session, W: Write>(session: &S, args: &ScoutArgs, out: &mut W) -> Result<()> {
    let timeout = seconds(args.timeout, "--timeout")?;

    writeln!(out, "Scouting...")?;
    out.flush()?;

    for hello in session.scout(&args.what, timeout)? {
        writeln!(out, "{}", hello)?;
    }
    Ok(())
}
