//! `lazarus status`

use anyhow::{Context, Result};

use crate::config::ServerArgs;

/// Ping the engine and report whether it is online
pub async fn run(server: &ServerArgs) -> Result<()> {
    let client = server.rest_client()?;
    let health = client
        .health()
        .await
        .with_context(|| format!("engine at {} is unreachable", client.base_url()))?;

    tracing::debug!(status = %health.status, "health check answered");
    println!("{}: {}", health.status, health.message);
    if health.status != "online" {
        anyhow::bail!("engine reported status {:?}", health.status);
    }
    Ok(())
}
