use std::time::Duration;

use clap::Parser;
use todo_sync::config::{DEFAULT_BASE_URL, SyncConfig};

use crate::error::CliError;

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(about = "Keep a todo list in sync with a REST backend")]
#[command(version)]
pub struct Cli {
    /// Backend base URL
    #[arg(long, env = "TODO_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds between health probes while the backend is unavailable
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_interval_secs: u64,

    /// Seconds before a health probe is abandoned
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub probe_timeout_secs: u64,

    /// Seconds before a list, create, update or delete request is abandoned
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Start with the network reported as offline
    #[arg(long)]
    pub offline: bool,
}

impl Cli {
    pub fn sync_config(&self) -> Result<SyncConfig, CliError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CliError::InvalidBaseUrl(self.base_url.clone()));
        }
        Ok(SyncConfig {
            base_url: self.base_url.clone(),
            probe_interval: Duration::from_secs(self.probe_interval_secs),
            probe_timeout: Duration::from_secs(self.probe_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}
