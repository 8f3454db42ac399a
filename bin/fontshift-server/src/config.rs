//! Server configuration, loaded from environment variables at startup and
//! optionally overridden by command-line flags.

use clap::Parser;
use fontshift_core::MAX_BATCH_FILES;

const MIB: usize = 1024 * 1024;

/// Runtime configuration for fontshift-server.
///
/// Every field has a default so the server runs without any environment
/// variables set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:$PORT"`, `PORT` defaulting to 3000).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Directory for daily-rotated log files. Logs go to stdout when unset.
    pub log_dir: Option<String>,

    /// Largest accepted upload, per file.
    pub max_upload_bytes: usize,

    /// Most files accepted by the batch endpoint, never above
    /// [`MAX_BATCH_FILES`].
    pub max_batch_files: usize,

    /// Comma-separated CORS origin allow-list; any origin when unset.
    pub cors_allowed_origins: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    pub enable_swagger: bool,
}

/// Command-line overrides; each flag wins over its environment variable.
#[derive(Debug, Default, Parser)]
#[command(version, about = "HTTP service converting between WOFF, WOFF2, TTF and OTF")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Log filter, e.g. "debug" or "info,fontshift_codec=trace"
    #[arg(long)]
    pub log: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub log_json: bool,

    /// Write logs to daily-rotated files in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<String>,

    /// Per-file upload limit in MiB
    #[arg(long, value_name = "MIB")]
    pub max_upload_mb: Option<usize>,

    /// Files accepted per batch request
    #[arg(long, value_name = "N")]
    pub max_batch_files: Option<usize>,

    /// Comma-separated CORS origins
    #[arg(long, value_name = "ORIGINS")]
    pub cors_origins: Option<String>,

    /// Do not serve Swagger UI
    #[arg(long)]
    pub no_swagger: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let port = get("PORT").unwrap_or_else(|| "3000".to_owned());
        Self {
            bind_address: get("FONTSHIFT_BIND").unwrap_or_else(|| format!("0.0.0.0:{port}")),
            log_level: get("FONTSHIFT_LOG").unwrap_or_else(|| "info".to_owned()),
            log_json: get("FONTSHIFT_LOG_JSON").is_some_and(|v| is_truthy(&v)),
            log_dir: get("FONTSHIFT_LOG_DIR").filter(|v| !v.trim().is_empty()),
            max_upload_bytes: parse_or(get("FONTSHIFT_MAX_UPLOAD_MB"), 10) * MIB,
            max_batch_files: batch_limit(parse_or(get("FONTSHIFT_MAX_BATCH_FILES"), MAX_BATCH_FILES)),
            cors_allowed_origins: get("FONTSHIFT_CORS_ORIGINS"),
            enable_swagger: get("FONTSHIFT_ENABLE_SWAGGER").is_none_or(|v| is_truthy(&v)),
        }
    }

    /// Applies command-line flags on top of the environment.
    pub fn with_cli(mut self, cli: Cli) -> Self {
        if let Some(bind) = cli.bind {
            self.bind_address = bind;
        }
        if let Some(log) = cli.log {
            self.log_level = log;
        }
        self.log_json |= cli.log_json;
        if cli.log_dir.is_some() {
            self.log_dir = cli.log_dir;
        }
        if let Some(mb) = cli.max_upload_mb {
            self.max_upload_bytes = mb * MIB;
        }
        if let Some(n) = cli.max_batch_files {
            self.max_batch_files = batch_limit(n);
        }
        if cli.cors_origins.is_some() {
            self.cors_allowed_origins = cli.cors_origins;
        }
        if cli.no_swagger {
            self.enable_swagger = false;
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn batch_limit(requested: usize) -> usize {
    requested.clamp(1, MAX_BATCH_FILES)
}
