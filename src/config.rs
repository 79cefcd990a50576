use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_file: String,
    pub cors_enabled: bool,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Smart waste bin tracking API")]
pub struct Args {
    /// Host to bind to (overrides BIN_TRACKER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides BIN_TRACKER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path of the JSON file holding bin records (overrides BIN_TRACKER_DATA_FILE)
    #[arg(long)]
    pub data_file: Option<String>,

    /// Disable the permissive CORS layer
    #[arg(long)]
    pub no_cors: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("BIN_TRACKER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("BIN_TRACKER_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing BIN_TRACKER_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading BIN_TRACKER_PORT"),
        };
        let env_data_file =
            env::var("BIN_TRACKER_DATA_FILE").unwrap_or_else(|_| "bin_data.json".into());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            data_file: args.data_file.unwrap_or(env_data_file),
            cors_enabled: !args.no_cors,
        };

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
