//! Persistence of downloaded artifacts.

use async_trait::async_trait;
use lazarus_api_contract::Artifact;
use std::path::{Path, PathBuf};

/// External collaborator that saves a downloaded artifact for the user.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persist `artifact` and describe where it ended up.
    async fn save(&self, artifact: &Artifact) -> crate::Result<String>;
}

/// Writes artifacts into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target path for `file_name`, never escaping the sink directory.
    pub fn target_path(&self, file_name: &str) -> crate::Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| crate::Error::artifact(format!("invalid file name: {file_name:?}")))?;
        Ok(self.dir.join(name))
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, artifact: &Artifact) -> crate::Result<String> {
        let path = self.target_path(&artifact.file_name)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &artifact.bytes).await?;

        tracing::info!(path = %path.display(), bytes = artifact.len(), "artifact saved");
        Ok(path.display().to_string())
    }
}
