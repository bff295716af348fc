//! `info`: identify this session and its neighbours

use std::io::Write;

use crate::error::Result;
use crate::session::Session;

pub fn info<S: Session, W: Write>(session: &S, out: &mut W) -> Result<()> {
    writeln!(out, "zid: {}", session.zid())?;
    writeln!(out, "routers: {:?}", session.routers()?)?;
    writeln!(out, "peers: {:?}", session.peers()?)?;
    Ok(())
}
