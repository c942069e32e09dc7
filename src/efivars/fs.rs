//! efivarfs-backed platform store

use super::{PlatformStore, ProbeOutcome};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// [`PlatformStore`] over the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformStore for FsStore {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        match std::fs::metadata(path) {
            Ok(_) => ProbeOutcome::Present,
            Err(e) => classify_io_error(&e),
        }
    }

    fn read_record(&self, path: &Path, len: usize) -> Result<Vec<u8>> {
        let mut file = File::open(path).map_err(|e| access_error(path, &e))?;

        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => Error::Unexpected(format!(
                "{}: record is shorter than {} bytes",
                path.display(),
                len
            )),
            _ => Error::Unexpected(format!("{}: {}", path.display(), e)),
        })?;

        Ok(buf)
    }

    fn write_record(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        let mut file = File::create(path).map_err(|e| access_error(path, &e))?;

        let written = write_variable(&mut file, path, bytes)?;
        // Close-time errors are reported, not dropped with the handle.
        file.sync_all()
            .map_err(|e| Error::Unexpected(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Wrote {} bytes to {}", written, path.display());
        Ok(())
    }
}

/// Write a whole variable with one `write` call, removing `path` if the
/// write fails or stops short.
fn write_variable<W: Write>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<usize> {
    // efivarfs takes the whole variable in a single write(2).
    let err = match writer.write(bytes) {
        Ok(n) if n == bytes.len() => {
            return writer
                .flush()
                .map(|()| n)
                .map_err(|e| Error::Unexpected(format!("{}: {}", path.display(), e)));
        }
        Ok(n) => Error::Unexpected(format!(
            "{}: wrote {} of {} bytes",
            path.display(),
            n,
            bytes.len()
        )),
        Err(e) => Error::Unexpected(format!("{}: {}", path.display(), e)),
    };

    drop(writer);
    remove_partial(path);
    Err(err)
}

/// Map an OS error from an existence check onto a [`ProbeOutcome`]
pub(crate) fn classify_io_error(err: &io::Error) -> ProbeOutcome {
    match err.kind() {
        io::ErrorKind::PermissionDenied => ProbeOutcome::Denied,
        io::ErrorKind::NotFound => ProbeOutcome::Absent,
        _ if err.raw_os_error() == Some(libc::ENOTDIR) => ProbeOutcome::Absent,
        _ => ProbeOutcome::Failed(err.to_string()),
    }
}

fn access_error(path: &Path, err: &io::Error) -> Error {
    tracing::warn!("{}: {}", path.display(), err);
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            Error::NoPrivilege(format!("{}: {}", path.display(), err))
        }
        _ => Error::Unexpected(format!("{}: {}", path.display(), err)),
    }
}

fn remove_partial(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::warn!(
            "Failed to remove partially written {}: {}",
            path.display(),
            e
        );
    }
}
