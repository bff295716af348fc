//! `network`: snapshot the network and render it
//!
//! DOT text goes to stdout; `--save-fig` writes an SVG image instead.

use std::fs;
use std::io::Write;
use std::time::Duration;

use crate::cli::NetworkArgs;
use crate::error::Result;
use crate::network::NetworkGraph;
use crate::session::Session;

/// How long the snapshot scouts for neighbours
pub const NETWORK_SCOUT_TIMEOUT: Duration = Duration::from_secs(1);

pub fn network<S: Session, W: Write>(session: &S, args: &NetworkArgs, out: &mut W) -> Result<()> {
    let graph = NetworkGraph::snapshot(session, NETWORK_SCOUT_TIMEOUT)?;
    tracing::debug!(
        "Network graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    if !args.save_fig {
        graph.write_dot(out, &args.metadata_field)?;
        return Ok(());
    }

    let image = graph.to_svg(&args.metadata_field)?;
    fs::write(&args.output, image)?;

    let path = fs::canonicalize(&args.output)?;
    writeln!(out, "Network visualization saved to {}", path.display())?;
    Ok(())
}
