//! `lazarus resurrect`

use anyhow::{bail, Result};
use clap::Args;
use lazarus_api_contract::{ResurrectionResult, ScanReport};
use lazarus_client_api::ClientApi;
use lazarus_core::{CancellationToken, Outcome, SessionController};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::ServerArgs;
use crate::console::{render_report, render_summary, ConsoleObserver};
use crate::scan::scan_report;

/// Arguments for the resurrect command
#[derive(Args, Debug)]
pub struct ResurrectArgs {
    /// Repository to revive (`owner/repo` or a full git URL)
    #[arg(value_name = "REPO_URL")]
    pub url: String,

    /// Directory the revived project archive is written to
    #[arg(
        long,
        env = "LAZARUS_OUTPUT_DIR",
        default_value = ".",
        value_name = "DIR"
    )]
    pub output_dir: PathBuf,

    /// Do not ask for confirmation before modifying the project
    #[arg(short, long)]
    pub yes: bool,

    /// Skip fetching the revived project archive
    #[arg(long)]
    pub no_download: bool,
}

/// How a resurrect run ended
#[derive(Debug)]
pub enum Verdict {
    /// Nothing was outdated; no remediation was attempted
    AlreadyAlive(ScanReport),
    /// The user declined at the confirmation prompt
    Declined(ScanReport),
    /// Remediation ran. `download` is `None` when the archive was not requested
    Resurrected {
        report: ScanReport,
        result: ResurrectionResult,
        download: Option<Outcome>,
    },
}

impl ResurrectArgs {
    /// Run the resurrect command
    pub async fn run(self, server: &ServerArgs) -> Result<()> {
        let controller = server.controller(&self.output_dir)?;
        controller.subscribe(Arc::new(ConsoleObserver)).await;

        println!("Attempting Resurrection...\nTarget: {}\n", self.url);
        let cancel = crate::cancel_on_interrupt();
        match self.workflow(&controller, cancel).await? {
            Verdict::AlreadyAlive(_) => {
                println!("This project is already alive! No action needed.");
            }
            Verdict::Declined(_) => println!("Resurrection aborted."),
            Verdict::Resurrected {
                report, download, ..
            } => {
                println!("\nProject is revived at: {}", report.local_path);
                if let Some(Outcome::Failed { reason }) = download {
                    bail!("export failed: {reason}");
                }
            }
        }
        Ok(())
    }

    /// Scan, confirm, resurrect and optionally download
    pub async fn workflow<C: ClientApi>(
        &self,
        controller: &SessionController<C>,
        cancel: CancellationToken,
    ) -> Result<Verdict> {
        let report = scan_report(controller, &self.url, cancel.clone()).await?;
        println!("\n{}", render_report(&report));

        if report.dependency_health.outdated == 0 {
            return Ok(Verdict::AlreadyAlive(report));
        }
        if !self.yes && !confirm("Do you want to attempt resurrection?").await? {
            return Ok(Verdict::Declined(report));
        }

        match controller.resurrect_with(cancel.clone()).await {
            Outcome::Completed => {}
            Outcome::Failed { reason } => bail!("resurrection failed: {reason}"),
            Outcome::Cancelled => bail!("resurrection cancelled"),
            Outcome::Ignored { phase } => bail!("resurrection ignored while {phase}"),
        }
        let Some(result) = controller.result().await else {
            bail!("resurrection completed without a result");
        };
        println!("\n{}", render_summary(&result));

        let download = if self.no_download {
            None
        } else {
            Some(controller.download_with(cancel).await)
        };
        Ok(Verdict::Resurrected {
            report,
            result,
            download,
        })
    }
}

/// Ask a yes/no question on the terminal; anything but `y`/`yes` is no
async fn confirm(question: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(format!("\n{question} [y/N]: ").as_bytes())
        .await?;
    stdout.flush().await?;

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
