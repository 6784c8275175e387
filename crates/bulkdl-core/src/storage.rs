//! Disk I/O for stored downloads.
//!
//! Files are created with `create_new`, so the existence check and the create
//! are a single atomic step: when two tasks resolve to the same name, exactly
//! one of them writes and the other observes [`Persisted::AlreadyExists`].

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Outcome of [`persist_new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// The file was created and the full buffer written.
    Written(u64),
    /// A non-directory entry already occupies the path; nothing was touched.
    AlreadyExists,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not create {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    pub fn path(&self) -> &Path {
        match self {
            StorageError::Create { path, .. } | StorageError::Write { path, .. } => path,
        }
    }
}

/// True if a non-directory entry exists at `path` (symlinks are followed).
pub fn file_exists(path: &Path) -> bool {
    fs::metadata(path).map(|m| !m.is_dir()).unwrap_or(false)
}

/// Creates `path` only if nothing is there yet and writes `data` in full.
///
/// A directory at `path` is an error, not a duplicate. If the write fails the
/// partially written file (which this call created) is removed.
pub fn persist_new(path: &Path, data: &[u8]) -> Result<Persisted, StorageError> {
    let file = match File::options().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && !path.is_dir() => {
            return Ok(Persisted::AlreadyExists);
        }
        Err(source) => {
            return Err(StorageError::Create {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    write_or_discard(path, file, data)?;
    Ok(Persisted::Written(data.len() as u64))
}

/// A writer whose contents can be flushed to stable storage.
trait SyncWrite: Write {
    fn sync(&mut self) -> io::Result<()>;
}

impl SyncWrite for File {
    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Writes `data` in full to `out`, which was freshly created at `path`.
/// On failure `out` is closed and `path` removed before the error is returned.
fn write_or_discard<W: SyncWrite>(
    path: &Path,
    mut out: W,
    data: &[u8],
) -> Result<(), StorageError> {
    if let Err(source) = out.write_all(data).and_then(|()| out.sync()) {
        drop(out);
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!("could not remove partial file {}: {}", path.display(), e);
        }
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

/// Creates the output directory (and parents) if missing; mode 0755 on Unix.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(path)
        .with_context(|| format!("could not create output directory {}", path.display()))?;
    tracing::info!("created output directory {}", path.display());
    Ok(())
}
