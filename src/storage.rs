//! Atomic file reading and writing for containers.
//!
//! A sealed container is written to a randomly named temp file in the
//! target directory, fsynced, then atomically renamed over the target. A
//! crash mid-write leaves either the old file or the new one, never a
//! torn container.

use anyhow::{Context, Result};
use getrandom::fill;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Loads an entire container file into memory.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))
}

/// Writes `data` to `path` via tmp file + fsync + atomic rename.
pub fn write_file_atomic(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = random_tmp_path(path)?;

    let mut tmp_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .context("failed to create temporary file")?;

    tmp_file.write_all(data)?;
    tmp_file.sync_all()?;
    drop(tmp_file);

    if let Err(e) = atomic_replace(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    // persist the rename itself
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }

    Ok(())
}

/// Unique sibling path `name.tmp.<randomhex>`, named from secure random
/// bytes to avoid collisions.
fn random_tmp_path(path: &Path) -> Result<PathBuf> {
    let mut buf = [0u8; 8];
    fill(&mut buf)?;

    let rand_string = buf.iter().map(|b| format!("{b:02x}")).collect::<String>();
    let file_name = path
        .file_name()
        .context("output path has no file name")?
        .to_string_lossy();

    Ok(path.with_file_name(format!("{file_name}.tmp.{rand_string}")))
}

/// Atomic replace via `MoveFileExW` with write-through so the rename is
/// persisted before returning.
#[cfg(target_os = "windows")]
fn atomic_replace(tmp_path: &Path, target: &Path) -> Result<()> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::{
        MOVEFILE_REPLACE_EXISTING, MOVEFILE_WRITE_THROUGH, MoveFileExW,
    };

    fn to_wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    let tmp_w = to_wide(tmp_path.as_os_str());
    let target_w = to_wide(target.as_os_str());

    // SAFETY:
    // - Strings are valid UTF-16 and null-terminated
    // - Pointers remain valid during the call
    // - Windows does not retain the pointers after return
    let result = unsafe {
        MoveFileExW(
            tmp_w.as_ptr(),
            target_w.as_ptr(),
            MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
        )
    };

    if result == 0 {
        let err = std::io::Error::last_os_error();
        return Err(err).context("atomic replace failed");
    }

    Ok(())
}

/// On Unix, `rename()` is atomic when both paths share a filesystem.
#[cfg(not(target_os = "windows"))]
fn atomic_replace(tmp_path: &Path, target: &Path) -> Result<()> {
    fs::rename(tmp_path, target)?;
    Ok(())
}
