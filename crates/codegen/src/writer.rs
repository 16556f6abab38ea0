//! # File Writer
//!
//! Persists generated files below an output directory. Each file is written
//! to a temporary file in its destination directory and then renamed over
//! the destination, so a reader never observes a partially written file and
//! an interrupted run leaves earlier files intact.
//!
//! Files have distinct paths, so [`FsWriter::write_all`] writes them
//! concurrently on tokio's blocking pool. Blocking tasks cannot be aborted
//! once started, so a shared cancel flag makes queued writes skip after the
//! first failure.

use nestbase_core::{EngineError, EngineResult};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinSet;

use crate::{GeneratedFile, GeneratedOutput};

/// Writes generated files below a root directory
#[derive(Debug, Clone)]
pub struct FsWriter {
    root: PathBuf,
}

impl FsWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write one file, replacing any existing file at its path
    pub fn write_file(&self, file: &GeneratedFile) -> EngineResult<PathBuf> {
        write_atomically(&self.root.join(&file.path), &file.content)
    }

    /// Write every file of the output concurrently.
    ///
    /// Returns the written paths sorted. The first failure is reported with
    /// the failing path. Writes that have not started yet are skipped; writes
    /// already in progress run to completion, so files written before the
    /// failure stay on disk.
    pub async fn write_all(&self, output: &GeneratedOutput) -> EngineResult<Vec<PathBuf>> {
        let cancelled = Arc::new(AtomicBool::new(false));
        let mut tasks = JoinSet::new();

        for file in &output.files {
            let destination = self.root.join(&file.path);
            let content = file.content.clone();
            let cancelled = Arc::clone(&cancelled);
            tasks.spawn_blocking(move || write_unless_cancelled(&cancelled, &destination, &content));
        }

        let mut written = Vec::with_capacity(output.files.len());
        while let Some(joined) = tasks.join_next().await {
            let result = joined
                .map_err(|e| EngineError::internal(format!("write task failed: {}", e)))
                .and_then(|r| r);

            match result {
                Ok(Some(path)) => {
                    tracing::debug!(path = %path.display(), "file written");
                    written.push(path);
                }
                Ok(None) => {}
                Err(e) => {
                    cancelled.store(true, Ordering::SeqCst);
                    // Drops tasks still waiting for a blocking thread
                    tasks.abort_all();
                    tracing::error!(error = %e, "writing generated files failed");
                    return Err(e);
                }
            }
        }

        written.sort();
        Ok(written)
    }
}

/// Write the file unless an earlier write failed.
///
/// Returns `Ok(None)` when the write was skipped. A failure raises the flag.
fn write_unless_cancelled(
    cancelled: &AtomicBool,
    destination: &Path,
    content: &str,
) -> EngineResult<Option<PathBuf>> {
    if cancelled.load(Ordering::SeqCst) {
        tracing::debug!(path = %destination.display(), "write skipped after earlier failure");
        return Ok(None);
    }

    write_atomically(destination, content)
        .map(Some)
        .inspect_err(|_| cancelled.store(true, Ordering::SeqCst))
}

fn write_atomically(destination: &Path, content: &str) -> EngineResult<PathBuf> {
    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(parent).map_err(|e| EngineError::DirectoryCreate {
        path: parent.to_path_buf(),
        message: e.to_string(),
    })?;

    let write_error = |message: String| EngineError::FileWrite {
        path: destination.to_path_buf(),
        message,
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent).map_err(|e| write_error(e.to_string()))?;
    temp.write_all(content.as_bytes())
        .and_then(|_| temp.flush())
        .map_err(|e| write_error(e.to_string()))?;
    temp.persist(destination)
        .map_err(|e| write_error(e.error.to_string()))?;

    Ok(destination.to_path_buf())
}

// ============================================================================
// Tests
// ============================================================================
