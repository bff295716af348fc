//! Command-line surface
//!
//! Global options configure the session; each subcommand maps to one
//! function in [`crate::commands`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::config::{ConfigOverride, Mode, SessionConfig};
use crate::session::DEFAULT_SCOUT_WHAT;

/// Default output file for `network --save-fig`
pub const NETWORK_OUTPUT_FILE: &str = "zenoh_network.svg";

/// Zenoh command-line client
#[derive(Parser, Debug)]
#[command(name = "zenoh")]
#[command(about = "Zenoh command-line client application")]
#[command(version)]
pub struct Cli {
    /// Session mode
    #[arg(long, value_enum, default_value_t = Mode::Peer)]
    pub mode: Mode,

    /// Endpoints to connect to
    #[arg(long, value_name = "ENDPOINT")]
    pub connect: Vec<String>,

    /// Endpoints to listen on
    #[arg(long, value_name = "ENDPOINT")]
    pub listen: Vec<String>,

    /// A path to a configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Configuration option according to 'PATH:VALUE'
    #[arg(long, value_name = "PATH:VALUE")]
    pub cfg: Vec<ConfigOverride>,

    /// Log level (off, error, warn, info, debug, trace); RUST_LOG wins when set
    #[arg(long, default_value = "warn")]
    pub log_level: LevelFilter,

    /// Skip loading codec plugins
    #[arg(long)]
    pub no_plugins: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Session settings from the global options
    pub fn session_config(&self) -> SessionConfig {
        let mut builder = SessionConfig::builder()
            .mode(self.mode)
            .connect(self.connect.iter().cloned())
            .listen(self.listen.iter().cloned())
            .config_file(self.config.clone());

        for item in &self.cfg {
            builder = builder.override_with(item.clone());
        }

        builder.build()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print this session's zid and the zids of connected routers and peers
    Info,

    /// Draw the network around this session (DOT on stdout, SVG with --save-fig)
    Network(NetworkArgs),

    /// Scout for peers and routers
    Scout(ScoutArgs),

    /// Delete one or more keys
    Delete(DeleteArgs),

    /// Publish a value, or one value per line of standard input
    Put(PutArgs),

    /// Print samples as they arrive, until interrupted
    Subscribe(SubscribeArgs),

    /// Query a selector and print the replies
    Get(GetArgs),

    /// List the registered encoders and decoders
    Codecs,
}

impl Commands {
    /// Whether the command talks to the bus
    pub fn needs_session(&self) -> bool {
        !matches!(self, Commands::Codecs)
    }
}

/// Encoder/decoder selection shared by put, get and subscribe
#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Encoder applied to values before publishing
    #[arg(long, default_value = "text")]
    pub encoder: String,

    /// Decoder applied to received payloads
    #[arg(long, default_value = "base64")]
    pub decoder: String,
}

impl Default for CodecArgs {
    fn default() -> Self {
        Self {
            encoder: "text".to_string(),
            decoder: "base64".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// JSON pointer to a field in a router's metadata configuration
    #[arg(long, default_value = "/name")]
    pub metadata_field: String,

    /// Save the graph as an SVG image instead of writing DOT to stdout
    #[arg(long)]
    pub save_fig: bool,

    /// File written by --save-fig
    #[arg(long, default_value = NETWORK_OUTPUT_FILE)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ScoutArgs {
    /// What to scout for
    #[arg(short, long, default_value = DEFAULT_SCOUT_WHAT)]
    pub what: String,

    /// Seconds to scout for
    #[arg(short, long, default_value_t = 1.0)]
    pub timeout: f64,
}

#[derive(Args, Debug, Clone)]
pub struct DeleteArgs {
    /// Key to delete (repeatable)
    #[arg(short, long, required = true)]
    pub key: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PutArgs {
    #[command(flatten)]
    pub codec: CodecArgs,

    /// Key expression to publish on
    #[arg(short, long)]
    pub key: Option<String>,

    /// Value to publish: a literal, @FILE, or - for stdin
    #[arg(short, long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Read stdin line by line, matching each against this pattern (e.g. "{key}: {value}")
    #[arg(long)]
    pub line: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SubscribeArgs {
    #[command(flatten)]
    pub codec: CodecArgs,

    /// Key expression to subscribe to (repeatable)
    #[arg(short, long, required = true)]
    pub key: Vec<String>,

    /// Output format for each sample
    #[arg(long, default_value = "{value}")]
    pub line: String,
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    #[command(flatten)]
    pub codec: CodecArgs,

    /// Selector to query
    #[arg(short, long)]
    pub selector: String,

    /// Query payload: a literal, @FILE, or - for stdin
    #[arg(short, long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Output format for each reply
    #[arg(long, default_value = "{value}")]
    pub line: String,

    /// Seconds to wait for replies (session default when omitted)
    #[arg(long)]
    pub timeout: Option<f64>,
}
