//! Atomic output file writes.
//!
//! Generated datasets are written to a hidden sibling file first and renamed
//! over the target once fully synced, so readers never observe a partially
//! written dataset.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use camino::Utf8Path;
use cap_std::fs::{Dir, OpenOptions};

use crate::error::OutputError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Writes `contents` to `file_name` inside `dir` atomically.
///
/// `display_path` is only used for error reporting.
///
/// # Errors
///
/// Returns [`OutputError::Write`] if the temporary file cannot be created,
/// written, synced, or renamed. The temporary file is removed on failure.
pub(crate) fn write_atomic(
    dir: &Dir,
    file_name: &str,
    display_path: &Utf8Path,
    contents: &[u8],
) -> Result<(), OutputError> {
    let to_error = |err: io::Error| OutputError::Write {
        path: display_path.to_path_buf(),
        message: err.to_string(),
    };

    let mut pending = PendingFile::create(dir, file_name).map_err(to_error)?;
    pending.write_and_sync(contents).map_err(to_error)?;
    pending.commit(file_name).map_err(to_error)?;

    // Directory sync is best effort; the rename has already happened.
    drop(dir.open(".").and_then(|handle| handle.sync_all()));
    Ok(())
}

/// A temporary file that is removed unless committed.
struct PendingFile<'dir> {
    dir: &'dir Dir,
    tmp_name: String,
    file: Option<cap_std::fs::File>,
    committed: bool,
}

impl<'dir> PendingFile<'dir> {
    fn create(dir: &'dir Dir, file_name: &str) -> io::Result<Self> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let file = dir.open_with(&tmp_name, &options)?;
        Ok(Self {
            dir,
            tmp_name,
            file: Some(file),
            committed: false,
        })
    }

    fn write_and_sync(&mut self, contents: &[u8]) -> io::Result<()> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("temporary file already closed"))?;
        file.write_all(contents)?;
        file.sync_all()
    }

    fn commit(&mut self, target_name: &str) -> io::Result<()> {
        // Close before renaming; Windows refuses to rename open files.
        drop(self.file.take());
        replace_target(self.dir, &self.tmp_name, target_name)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        if !self.committed {
            drop(self.file.take());
            drop(self.dir.remove_file(&self.tmp_name));
        }
    }
}

#[cfg(windows)]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    match dir.remove_file(target_name) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(tmp_name, dir, target_name)
}

#[cfg(not(windows))]
fn replace_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}
