//! Tests for the network graph
//!
//! These tests verify:
//! - Router admin documents in both link shapes
//! - Graph building (nodes, undirected edges, metadata merge)
//! - Node labels from metadata with zid fallback
//! - DOT and SVG rendering
//! - Snapshots and the `network` command against the in-process session

use bytes::Bytes;
use serde_json::json;
use zenoh_cli::cli::NetworkArgs;
use zenoh_cli::commands;
use zenoh_cli::network::{NetworkGraph, RouterState, SELF_LABEL};
use zenoh_cli::session::{Hello, Reply, Sample};
use zenoh_cli::LoopbackSession;

// =============================================================================
// Helper Functions
// =============================================================================

fn router_document(zid: &str, name: &str, peers: &[(&str, &str)]) -> Vec<u8> {
    let sessions: Vec<_> = peers
        .iter()
        .map(|(peer, whatami)| {
            json!({
                "peer": peer,
                "whatami": whatami,
                "links": [{ "src": "tcp/10.0.0.1:7447", "dst": "tcp/10.0.0.2:7447" }],
            })
        })
        .collect();

    serde_json::to_vec(&json!({
        "zid": zid,
        "metadata": { "name": name },
        "sessions": sessions,
    }))
    .unwrap()
}

fn hello(zid: &str, whatami: &str) -> Hello {
    Hello {
        zid: zid.to_string(),
        whatami: whatami.to_string(),
        locators: vec![],
    }
}

fn network_args(save_fig: bool, output: std::path::PathBuf) -> NetworkArgs {
    NetworkArgs {
        metadata_field: "/name".to_string(),
        save_fig,
        output,
    }
}

// =============================================================================
// Admin Documents
// =============================================================================

#[test]
fn test_router_state_detailed_links() {
    let state = RouterState::from_slice(&router_document("r1", "edge", &[("p1", "peer")])).unwrap();

    assert_eq!(state.zid, "r1");
    assert_eq!(state.metadata, Some(json!({ "name": "edge" })));
    assert_eq!(state.sessions.len(), 1);
    assert_eq!(state.sessions[0].peer, "p1");
    assert_eq!(state.sessions[0].protocols(), "tcp");
}

#[test]
fn test_router_state_locator_links() {
    let payload = br#"{
        "zid": "r1",
        "sessions": [
            { "peer": "p1", "whatami": "client", "links": ["tcp/1.2.3.4:7447", "udp/1.2.3.4:7447"] }
        ]
    }"#;

    let state = RouterState::from_slice(payload).unwrap();

    assert!(state.metadata.is_none());
    assert_eq!(state.sessions[0].protocols(), "tcp,udp");
}

#[test]
fn test_router_state_rejects_garbage() {
    assert!(RouterState::from_slice(b"not json").is_err());
    assert!(RouterState::from_slice(b"{\"sessions\": []}").is_err());
}

// =============================================================================
// Graph Building
// =============================================================================

#[test]
fn test_new_graph_holds_only_self() {
    let graph = NetworkGraph::new("me", "peer");

    assert_eq!(graph.me(), "me");
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.node("me").unwrap().whatami, "peer");
}

#[test]
fn test_edges_are_undirected() {
    let mut graph = NetworkGraph::new("me", "peer");
    graph.add_node("a", "router", None);
    graph.add_node("b", "peer", None);

    graph.add_edge("b", "a", "tcp");
    graph.add_edge("a", "b", "udp");

    let edges: Vec<_> = graph.edges().collect();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].a, "a");
    assert_eq!(edges[0].b, "b");
    assert_eq!(edges[0].protocol, "udp");
}

#[test]
fn test_add_node_keeps_metadata_when_absent() {
    let mut graph = NetworkGraph::new("me", "peer");
    graph.add_node("r1", "router", Some(json!({ "name": "edge" })));
    graph.add_node("r1", "router", None);

    assert_eq!(graph.node("r1").unwrap().metadata, Some(json!({ "name": "edge" })));
}

#[test]
fn test_add_router_links_sessions() {
    let mut graph = NetworkGraph::new("me", "peer");
    let state = RouterState::from_slice(&router_document("r1", "edge", &[("me", "peer"), ("c1", "client")]))
        .unwrap();

    graph.add_router(state);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node("c1").unwrap().whatami, "client");
    assert_eq!(graph.node("r1").unwrap().whatami, "router");
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn test_labels() {
    let mut graph = NetworkGraph::new("me-zid", "peer");
    graph.add_node("r1-long-zid", "router", Some(json!({ "name": "edge", "site": { "rack": 4 } })));
    graph.add_node("p1-long-zid", "peer", None);

    let me = graph.node("me-zid").unwrap();
    let router = graph.node("r1-long-zid").unwrap();
    let peer = graph.node("p1-long-zid").unwrap();

    assert_eq!(graph.label(me, "/name"), SELF_LABEL);
    assert_eq!(graph.label(router, "/name"), "edge");
    assert_eq!(graph.label(router, "/site/rack"), "4");
    assert_eq!(graph.label(router, "/missing"), "r1-lo");
    assert_eq!(graph.label(peer, "/name"), "p1-lo");
}

// =============================================================================
// DOT Rendering
// =============================================================================

#[test]
fn test_dot_output() {
    let mut graph = NetworkGraph::new("me", "peer");
    graph.add_router(RouterState::from_slice(&router_document("r1", "edge \"1\"", &[("me", "peer")])).unwrap());

    let dot = graph.to_dot("/name");

    assert!(dot.starts_with("graph zenoh {\n"));
    assert!(dot.trim_end().ends_with('}'));
    assert!(dot.contains("\"me\" [label=\"Me!\", fillcolor=\"lightcoral\"];"));
    assert!(dot.contains("\"r1\" [label=\"edge \\\"1\\\"\", fillcolor=\"steelblue\", width=1.0];"));
    assert!(dot.contains("\"me\" -- \"r1\" [label=\"tcp\"];"));
}

// =============================================================================
// Snapshot / Command
// =============================================================================

fn observed_session() -> LoopbackSession {
    LoopbackSession::new("me")
        .with_hellos(vec![hello("p9", "peer"), hello("r1", "router")])
        .with_queryable(
            "@/r1/router",
            vec![
                Reply::Ok(Sample::put(
                    "@/r1/router",
                    Bytes::from(router_document("r1", "edge", &[("me", "peer"), ("c1", "client")])),
                )),
                Reply::Ok(Sample::put("@/r2/router", &b"garbage"[..])),
                Reply::Err(Bytes::from_static(b"unavailable")),
            ],
        )
}

#[test]
fn test_snapshot() {
    let session = observed_session();

    let graph = NetworkGraph::snapshot(&session, std::time::Duration::from_millis(10)).unwrap();

    let zids: Vec<_> = graph.nodes().map(|n| n.zid.as_str()).collect();
    assert_eq!(zids, ["c1", "me", "p9", "r1"]);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(session.queries()[0].0, "@/*/router");
}

#[test]
fn test_snapshot_uses_session_mode() {
    let session = LoopbackSession::new("me").with_mode("router");

    let graph = NetworkGraph::snapshot(&session, std::time::Duration::from_millis(10)).unwrap();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.node("me").unwrap().whatami, "router");
    assert!(graph.to_dot("/name").contains("\"me\" [label=\"Me!\", fillcolor=\"lightcoral\", width=1.0];"));
}

#[test]
fn test_network_command_to_stdout() {
    let session = observed_session();
    let mut out = Vec::new();

    commands::network(&session, &network_args(false, "unused.dot".into()), &mut out).unwrap();

    let dot = String::from_utf8(out).unwrap();
    assert!(dot.starts_with("graph zenoh {"));
    assert!(dot.contains("label=\"edge\""));
}

#[test]
fn test_network_command_save_fig() {
    let session = observed_session();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("net.svg");
    let mut out = Vec::new();

    commands::network(&session, &network_args(true, path.clone()), &mut out).unwrap();

    let message = String::from_utf8(out).unwrap();
    assert!(message.starts_with("Network visualization saved to "));
    assert!(message.trim_end().ends_with("net.svg"));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("<svg"));
    assert!(written.contains("</svg>"));
    assert!(!written.contains("graph zenoh"));
}

#[test]
fn test_svg_rendering_carries_labels() {
    let mut graph = NetworkGraph::new("me", "peer");
    graph.add_router(RouterState::from_slice(&router_document("r1", "edge", &[("me", "peer")])).unwrap());

    let svg = graph.to_svg("/name").unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("Me!"));
    assert!(svg.contains("edge"));
}
