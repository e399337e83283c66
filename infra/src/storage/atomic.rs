//! Atomic file replacement

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::InfrastructureError;

/// Replace `path` with `bytes`.
///
/// The data goes to a uniquely named temporary file in the same directory,
/// is flushed to disk, and is then renamed over `path`.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), InfrastructureError> {
    let tmp_path = temp_path_for(path);

    let result = write_and_rename(&tmp_path, path, bytes).await;
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path).await;
    }
    result
}

async fn write_and_rename(tmp_path: &Path, path: &Path, bytes: &[u8]) -> Result<(), InfrastructureError> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp_path, path).await?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()))
}
