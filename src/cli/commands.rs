//! CLI commands and argument parsing

use crate::config::{Settings, DEFAULT_PORT};
use clap::{Parser, Subcommand};

/// Incremental JSON adapter for paginated REST APIs
#[derive(Parser, Debug)]
#[command(name = "incremental-json")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URL template for full fetches (`__path__`, `__since__`, `__limit__`)
    #[arg(long, env = "FULL_URL_PATTERN", global = true)]
    pub full_url_pattern: Option<String>,

    /// URL template for incremental fetches, defaults to the full template
    #[arg(long, env = "UPDATED_URL_PATTERN", global = true)]
    pub updated_url_pattern: Option<String>,

    /// Default dotted path of the modification marker
    #[arg(long, env = "UPDATED_PROPERTY", global = true)]
    pub updated_property: Option<String>,

    /// Upstream treats integer `since` as inclusive (true/false)
    #[arg(long, env = "OFFSET_BIGGER_AND_EQUAL", global = true)]
    pub offset_bigger_and_equal: Option<String>,

    /// Authentication mode: empty for static headers, or `oauth2`
    #[arg(long, env = "AUTHENTICATION", global = true)]
    pub authentication: Option<String>,

    /// JSON blob with `headers` and/or `oauth2` settings
    #[arg(long, env = "CONFIG", hide_env_values = true, global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Transport timeout for upstream calls in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", global = true)]
    pub upstream_timeout_secs: Option<u64>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Raw service settings from flags and environment
    pub fn settings(&self) -> Settings {
        Settings {
            full_url_pattern: self.full_url_pattern.clone(),
            updated_url_pattern: self.updated_url_pattern.clone(),
            updated_property: self.updated_property.clone(),
            offset_bigger_and_equal: self.offset_bigger_and_equal.clone(),
            authentication: self.authentication.clone(),
            config: self.config.clone(),
            port: self.port,
            upstream_timeout_secs: self.upstream_timeout_secs,
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode (default)
    Serve,

    /// Show how a request would be translated, without calling the upstream
    Translate {
        /// Inbound request path, e.g. `/orders`
        path: String,

        /// Inbound query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,
    },
}

/// Parse a `key=value` pair
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    Ok((key.to_string(), value.to_string()))
}
