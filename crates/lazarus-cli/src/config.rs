//! Connection settings shared by every subcommand

use anyhow::{Context, Result};
use clap::Args;
use lazarus_core::{ArtifactSink, DirectorySink, SessionController};
use lazarus_rest_client::{RestClient, RestClientConfig, DEFAULT_BASE_URL};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Engine connection and diagnostics options
#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    /// Base URL of the resurrection engine
    #[arg(
        long,
        global = true,
        env = "LAZARUS_SERVER",
        default_value = DEFAULT_BASE_URL,
        value_name = "URL"
    )]
    pub server: String,

    /// Abort a request that takes longer than this many seconds
    #[arg(long, global = true, env = "LAZARUS_TIMEOUT_SECS", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Emit debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl ServerArgs {
    pub fn rest_config(&self) -> Result<RestClientConfig> {
        let config = RestClientConfig::from_url(&self.server)
            .with_context(|| format!("invalid --server value {:?}", self.server))?;
        Ok(match self.timeout_secs {
            Some(secs) => config.with_timeout(Duration::from_secs(secs)),
            None => config,
        })
    }

    pub fn rest_client(&self) -> Result<RestClient> {
        Ok(RestClient::new(self.rest_config()?)?)
    }

    /// Controller over a REST client, saving artifacts into `output_dir`
    pub fn controller(&self, output_dir: &Path) -> Result<Arc<SessionController<RestClient>>> {
        let client = Arc::new(self.rest_client()?);
        let sink: Arc<dyn ArtifactSink> = Arc::new(DirectorySink::new(output_dir));
        Ok(Arc::new(SessionController::new(client, sink)))
    }
}
