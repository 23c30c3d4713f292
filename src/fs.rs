//! Async file helpers over `tokio::fs`, with path-carrying errors.

use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{TspError, TspResult};

pub async fn file_exists(path: &Path) -> bool {
    fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
}

pub async fn read_text(path: &Path) -> TspResult<String> {
    fs::read_to_string(path)
        .await
        .map_err(|e| TspError::read(path, e))
}

/// Create `path` exclusively. Fails with [`TspError::OutputExists`] if it
/// already exists, even if it appeared after an earlier existence check.
pub async fn write_new(path: &Path, content: &str) -> TspResult<()> {
    ensure_parent(path).await?;

    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(TspError::OutputExists {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(TspError::write(path, e)),
    };

    file.write_all(content.as_bytes())
        .await
        .map_err(|e| TspError::write(path, e))?;
    file.flush().await.map_err(|e| TspError::write(path, e))
}

/// Create or truncate `path`.
pub async fn write_replace(path: &Path, content: &str) -> TspResult<()> {
    ensure_parent(path).await?;
    fs::write(path, content)
        .await
        .map_err(|e| TspError::write(path, e))
}

async fn ensure_parent(path: &Path) -> TspResult<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
            .await
            .map_err(|e| TspError::write(dir, e)),
        _ => Ok(()),
    }
}
