//! `lazarus scan`

use anyhow::{bail, Result};
use clap::Args;
use lazarus_api_contract::ScanReport;
use lazarus_client_api::ClientApi;
use lazarus_core::{CancellationToken, Outcome, SessionController};
use std::path::Path;
use std::sync::Arc;

use crate::config::ServerArgs;
use crate::console::{render_report, ConsoleObserver};

/// Arguments for the scan command
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Repository to examine (`owner/repo` or a full git URL)
    #[arg(value_name = "REPO_URL")]
    pub url: String,
}

impl ScanArgs {
    /// Run the scan command
    pub async fn run(self, server: &ServerArgs) -> Result<()> {
        let controller = server.controller(Path::new("."))?;
        controller.subscribe(Arc::new(ConsoleObserver)).await;

        println!("Summoning Lazarus...\nTarget: {}\n", self.url);
        let report = scan_report(&controller, &self.url, crate::cancel_on_interrupt()).await?;
        println!("\n{}", render_report(&report));
        Ok(())
    }
}

/// Run the scan intent and hand back the retained report
pub async fn scan_report<C: ClientApi>(
    controller: &SessionController<C>,
    url: &str,
    cancel: CancellationToken,
) -> Result<ScanReport> {
    match controller.scan_with(url, cancel).await? {
        Outcome::Completed => match controller.report().await {
            Some(report) => Ok(report),
            None => bail!("scan completed without a report"),
        },
        Outcome::Failed { reason } => bail!("scan failed: {reason}"),
        Outcome::Cancelled => bail!("scan cancelled"),
        Outcome::Ignored { phase } => bail!("scan ignored while {phase}"),
    }
}
