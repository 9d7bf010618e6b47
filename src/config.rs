// src/config.rs
use crate::constants::{
    DEFAULT_MIN_REQUEST_INTERVAL, MAX_RECORDS_PER_REQUEST, NOTION_HOST, RATE_LIMIT_BACKOFF,
    REQUEST_TIMEOUT, TOKEN_ENV_VAR,
};
use crate::error::AppError;
use crate::types::{AuthToken, NotionId, ValidatedUrl, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URL or ID (e.g., "https://www.notion.so/Title-ea07db1b9bff415ab180b0525f3898f6")
    pub notion_input: String,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Minimum milliseconds between the starts of two requests
    #[arg(long, default_value_t = DEFAULT_MIN_REQUEST_INTERVAL.as_millis() as u64)]
    pub min_interval_ms: u64,

    /// Also fetch the users who created or edited blocks
    #[arg(long, default_value_t = false)]
    pub fetch_users: bool,

    /// Host serving the api/v3 endpoints
    #[arg(long, default_value = NOTION_HOST)]
    pub base_url: String,

    /// Serve responses from a previously recorded exchange file when possible
    #[arg(long)]
    pub replay: Option<String>,

    /// Write every exchange of this run to a JSON file
    #[arg(long)]
    pub record: Option<String>,
}

/// Everything `NotionClient` needs to talk to the server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host, e.g. `https://www.notion.so`.
    pub base_url: String,
    pub auth_token: Option<AuthToken>,
    pub min_request_interval: Duration,
    /// Waits before each retry of a 429 response.
    pub rate_limit_backoff: Vec<Duration>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: NOTION_HOST.to_string(),
            auth_token: None,
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            rate_limit_backoff: RATE_LIMIT_BACKOFF.to_vec(),
            timeout: REQUEST_TIMEOUT,
        }
    }
}

/// Knobs of a single page download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Ids per `getRecordValues` request, capped at `MAX_RECORDS_PER_REQUEST`.
    pub batch_size: usize,
    pub fetch_users: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            batch_size: MAX_RECORDS_PER_REQUEST,
            fetch_users: false,
        }
    }
}

impl DownloadOptions {
    /// The batch size actually used: at least one, at most the API cap.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_RECORDS_PER_REQUEST)
    }
}

/// Resolved configuration of one CLI run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub root_id: NotionId,
    pub client: ClientConfig,
    pub download: DownloadOptions,
    pub verbose: bool,
    pub replay_file: Option<PathBuf>,
    pub record_file: Option<PathBuf>,
}

impl PipelineConfig {
    /// Resolves a complete configuration from CLI input and environment.
    ///
    /// The session token is optional: public pages load without it.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let auth_token = match std::env::var(TOKEN_ENV_VAR) {
            Ok(token) if !token.trim().is_empty() => Some(AuthToken::new(token)?),
            _ => None,
        };

        Self::from_parts(cli, auth_token)
    }

    fn from_parts(cli: CommandLineInput, auth_token: Option<AuthToken>) -> Result<Self, AppError> {
        let root_id = NotionId::parse(&cli.notion_input)?;
        let base_url = ValidatedUrl::parse(&cli.base_url)?;

        const MAX_INTERVAL_MS: u64 = 60_000;
        if cli.min_interval_ms > MAX_INTERVAL_MS {
            return Err(ValidationError::OutOfBounds {
                value: cli.min_interval_ms,
                min: 0,
                max: MAX_INTERVAL_MS,
            }
            .into());
        }

        Ok(PipelineConfig {
            root_id,
            client: ClientConfig {
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                auth_token,
                min_request_interval: Duration::from_millis(cli.min_interval_ms),
                ..ClientConfig::default()
            },
            download: DownloadOptions {
                fetch_users: cli.fetch_users,
                ..DownloadOptions::default()
            },
            verbose: cli.verbose,
            replay_file: cli.replay.map(PathBuf::from),
            record_file: cli.record.map(PathBuf::from),
        })
    }
}
