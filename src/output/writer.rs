// src/output/writer.rs

//! Persists downloaded files under the output directory.
//!
//! Writes are streamed chunk by chunk, truncate existing files, and are not
//! atomic: an interrupted write leaves a partial file behind.

use super::path::destination_path;
#[cfg(unix)]
use crate::constants::{DIR_MODE, FILE_MODE};
use crate::core_types::ByteStream;
use crate::errors::{io_error_with_path, Result};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tokio::fs::{DirBuilder, File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Writes remote files below `output_dir`, laid out relative to a remote root.
#[derive(Debug, Clone)]
pub struct FileWriter {
    output_dir: PathBuf,
    base_dir: String,
}

impl FileWriter {
    /// Creates a writer for files under the remote path `base_dir`.
    pub fn new(output_dir: impl Into<PathBuf>, base_dir: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_dir: base_dir.into(),
        }
    }

    /// The local path `remote_path` is written to.
    pub fn destination(&self, remote_path: &str) -> Result<PathBuf> {
        Ok(self
            .output_dir
            .join(destination_path(&self.base_dir, remote_path)?))
    }

    /// Streams `content` into the destination of `remote_path`, creating
    /// missing parent directories. Returns the number of bytes written.
    pub async fn write(&self, remote_path: &str, mut content: ByteStream) -> Result<u64> {
        let destination = self.destination(remote_path)?;
        log::debug!("Writing '{}'", destination.display());

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent).await?;
        }

        let file = open_truncated(&destination).await?;
        let mut writer = BufWriter::new(file);
        let mut written = 0u64;

        while let Some(chunk) = content.next().await {
            let chunk = chunk?;
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| io_error_with_path(e, &destination))?;
            written += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| io_error_with_path(e, &destination))?;
        Ok(written)
    }
}

async fn create_dir_all(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(DIR_MODE);
    builder
        .create(dir)
        .await
        .map_err(|e| io_error_with_path(e, dir))
}

async fn open_truncated(path: &Path) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);
    options
        .open(path)
        .await
        .map_err(|e| io_error_with_path(e, path))
}
