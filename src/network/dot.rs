//! Graph rendering
//!
//! DOT text is the canonical form; the SVG image is laid out from that same
//! document, so both views always agree.

use std::io::{self, Write};

use layout::backends::svg::SVGWriter;
use layout::gv::{DotParser, GraphBuilder};

use super::NetworkGraph;
use crate::error::{CliError, Result};

const ROUTER_COLOR: &str = "steelblue";
const PEER_COLOR: &str = "aliceblue";
const CLIENT_COLOR: &str = "lightgreen";
const SELF_COLOR: &str = "lightcoral";
const UNKNOWN_COLOR: &str = "grey";

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn fill_color(whatami: &str) -> &'static str {
    match whatami {
        "router" => ROUTER_COLOR,
        "peer" => PEER_COLOR,
        "client" => CLIENT_COLOR,
        _ => UNKNOWN_COLOR,
    }
}

impl NetworkGraph {
    /// Write as an undirected Graphviz graph
    ///
    /// `label_field` is the metadata JSON pointer used for node labels.
    pub fn write_dot<W: Write>(&self, out: &mut W, label_field: &str) -> io::Result<()> {
        writeln!(out, "graph zenoh {{")?;
        writeln!(out, "  graph [bgcolor=\"black\"];")?;
        writeln!(
            out,
            "  node [style=filled, shape=circle, fontcolor=\"darkgrey\", fontname=\"bold\"];"
        )?;
        writeln!(out, "  edge [color=\"white\", fontcolor=\"white\"];")?;

        for node in self.nodes() {
            let color = if node.zid == self.me {
                SELF_COLOR
            } else {
                fill_color(&node.whatami)
            };
            let size = if node.whatami == "router" { ", width=1.0" } else { "" };

            writeln!(
                out,
                "  {} [label={}, fillcolor=\"{}\"{}];",
                quote(&node.zid),
                quote(&self.label(node, label_field)),
                color,
                size
            )?;
        }

        for edge in self.edges() {
            writeln!(
                out,
                "  {} -- {} [label={}];",
                quote(&edge.a),
                quote(&edge.b),
                quote(&edge.protocol)
            )?;
        }

        writeln!(out, "}}")
    }

    /// Render as a DOT document
    pub fn to_dot(&self, label_field: &str) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_dot(&mut out, label_field);
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Lay the graph out and render it as an SVG image
    pub fn to_svg(&self, label_field: &str) -> Result<String> {
        let dot = self.to_dot(label_field);
        let mut parser = DotParser::new(&dot);
        let tree = parser
            .process()
            .map_err(|e| CliError::Render(format!("cannot lay out network graph: {}", e)))?;

        let mut builder = GraphBuilder::new();
        builder.visit_graph(&tree);
        let mut visual = builder.get();

        let mut svg = SVGWriter::new();
        visual.do_it(false, false, false, &mut svg);
        Ok(svg.finalize())
    }
}
