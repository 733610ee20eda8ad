//! artifact backup collaborator
//!
//! The updater only decides *whether* a backup happens; how the copy is made
//! lives behind [BackupService].
use std::io;
use std::path::Path;

/// Makes a safety copy of the previous artifact before regeneration
pub trait BackupService {
    fn backup(&self, artifact: &Path) -> io::Result<()>;
}

// blanket impl for Fn, mostly for tests
impl<F> BackupService for F
where
    F: Fn(&Path) -> io::Result<()>,
{
    fn backup(&self, artifact: &Path) -> io::Result<()> {
        self(artifact)
    }
}

/// Copies the artifact next to itself with a timestamped `.bak` suffix
///
/// A missing artifact is not an error - there is nothing to back up before
/// the first generation.
#[derive(Debug, Default)]
pub struct TimestampedBackup;

impl BackupService for TimestampedBackup {
    fn backup(&self, artifact: &Path) -> io::Result<()> {
        if !artifact.exists() {
            tracing::debug!(artifact=%artifact.display(), "no previous artifact, skipping backup");
            return Ok(());
        }

        let file_name = artifact
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "artifact".to_string());
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let backup_path = artifact.with_file_name(format!("{file_name}.{stamp}.bak"));

        tracing::info!(from=%artifact.display(), to=%backup_path.display(), "backing up previous artifact");
        std::fs::copy(artifact, &backup_path)?;
        Ok(())
    }
}
