//! Tests for command-line parsing
//!
//! These tests verify:
//! - Global options and their defaults
//! - Subcommand arguments and defaults
//! - Translation of global options into a SessionConfig

use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use zenoh_cli::cli::{Cli, Commands, NETWORK_OUTPUT_FILE};
use zenoh_cli::config::Mode;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("zenoh").chain(args.iter().copied())).unwrap()
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn test_global_defaults() {
    let cli = parse(&["info"]);

    assert_eq!(cli.mode, Mode::Peer);
    assert!(cli.connect.is_empty());
    assert!(cli.config.is_none());
    assert_eq!(cli.log_level, LevelFilter::WARN);
    assert!(!cli.no_plugins);
    assert!(matches!(cli.command, Commands::Info));
}

#[test]
fn test_session_config_from_globals() {
    let cli = parse(&[
        "--mode",
        "client",
        "--connect",
        "tcp/10.0.0.1:7447",
        "--connect",
        "tcp/10.0.0.2:7447",
        "--listen",
        "tcp/0.0.0.0:7448",
        "--cfg",
        "scouting/multicast/enabled:false",
        "--cfg",
        "metadata/name:\"cli\"",
        "info",
    ]);

    let config = cli.session_config();

    assert_eq!(config.mode, Mode::Client);
    assert_eq!(config.connect, ["tcp/10.0.0.1:7447", "tcp/10.0.0.2:7447"]);
    assert_eq!(config.listen, ["tcp/0.0.0.0:7448"]);
    let paths: Vec<_> = config.overrides.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, ["scouting/multicast/enabled", "metadata/name"]);
}

#[test]
fn test_bad_cfg_is_a_parse_error() {
    assert!(Cli::try_parse_from(["zenoh", "--cfg", "no-colon", "info"]).is_err());
}

#[test]
fn test_unknown_mode_is_a_parse_error() {
    assert!(Cli::try_parse_from(["zenoh", "--mode", "satellite", "info"]).is_err());
}

// =============================================================================
// Subcommands
// =============================================================================

#[test]
fn test_put_arguments() {
    let cli = parse(&["put", "-k", "demo/a", "-v", "-", "--encoder", "json"]);

    let Commands::Put(args) = cli.command else {
        panic!("expected put");
    };
    assert_eq!(args.key.as_deref(), Some("demo/a"));
    assert_eq!(args.value.as_deref(), Some("-"));
    assert_eq!(args.codec.encoder, "json");
    assert_eq!(args.codec.decoder, "base64");
    assert!(args.line.is_none());
}

#[test]
fn test_get_defaults() {
    let cli = parse(&["get", "-s", "demo/**"]);

    let Commands::Get(args) = cli.command else {
        panic!("expected get");
    };
    assert_eq!(args.selector, "demo/**");
    assert_eq!(args.line, "{value}");
    assert_eq!(args.codec.encoder, "text");
    assert_eq!(args.codec.decoder, "base64");
    assert!(args.timeout.is_none());
}

#[test]
fn test_subscribe_requires_a_key() {
    assert!(Cli::try_parse_from(["zenoh", "subscribe"]).is_err());

    let cli = parse(&["subscribe", "-k", "a/*", "-k", "b/**", "--decoder", "text"]);
    let Commands::Subscribe(args) = cli.command else {
        panic!("expected subscribe");
    };
    assert_eq!(args.key, ["a/*", "b/**"]);
    assert_eq!(args.codec.decoder, "text");
}

#[test]
fn test_delete_requires_a_key() {
    assert!(Cli::try_parse_from(["zenoh", "delete"]).is_err());
}

#[test]
fn test_scout_and_network_defaults() {
    let Commands::Scout(scout) = parse(&["scout"]).command else {
        panic!("expected scout");
    };
    assert_eq!(scout.what, "peer|router");
    assert_eq!(scout.timeout, 1.0);

    let Commands::Network(network) = parse(&["network", "--save-fig"]).command else {
        panic!("expected network");
    };
    assert!(network.save_fig);
    assert_eq!(network.metadata_field, "/name");
    assert_eq!(network.output, std::path::PathBuf::from(NETWORK_OUTPUT_FILE));
    assert_eq!(NETWORK_OUTPUT_FILE, "zenoh_network.svg");
}

#[test]
fn test_only_codecs_runs_without_session() {
    assert!(!parse(&["codecs"]).command.needs_session());
    assert!(parse(&["info"]).command.needs_session());
}
