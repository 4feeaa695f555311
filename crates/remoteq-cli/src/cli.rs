use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use remoteq::{DecoderConfig, ShapePolicy};

/// Apply a remoteq query document to a JSON array of records.
#[derive(Debug, Parser)]
#[command(name = "rq", version, about)]
pub struct Cli {
    /// JSON array of records (reads stdin when omitted or `-`)
    pub data: Option<PathBuf>,

    /// Query document as JSON text
    #[arg(long, conflicts_with_all = ["query_b64", "query_file"])]
    pub query: Option<String>,

    /// Query document as base64-encoded JSON
    #[arg(long, conflicts_with = "query_file")]
    pub query_b64: Option<String>,

    /// Read the query document from a file
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// What to do when `_condition` and `_value` lengths differ
    #[arg(long, value_enum, default_value_t = ShapePolicyArg::Reject)]
    pub shape_policy: ShapePolicyArg,

    /// Disable the nestedfilter/nestedexclude classes
    #[arg(long)]
    pub no_nested: bool,

    /// Keep GeoJSON values as plain literals
    #[arg(long)]
    pub no_geometry: bool,

    /// Print the number of matching records
    #[arg(long, conflicts_with = "explain")]
    pub count: bool,

    /// Print the decoded query tree instead of applying it
    #[arg(long)]
    pub explain: bool,

    /// Print JSON on a single line
    #[arg(long)]
    pub compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShapePolicyArg {
    Reject,
    Truncate,
}

impl From<ShapePolicyArg> for ShapePolicy {
    fn from(arg: ShapePolicyArg) -> Self {
        match arg {
            ShapePolicyArg::Reject => ShapePolicy::Reject,
            ShapePolicyArg::Truncate => ShapePolicy::Truncate,
        }
    }
}

impl Cli {
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig::new()
            .shape_policy(self.shape_policy.into())
            .nested_groups(!self.no_nested)
            .coerce_geometry(!self.no_geometry)
    }

    /// Default tracing directive for the `-v` count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
