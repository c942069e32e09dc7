//! Platform variable access
//!
//! UEFI variables are exposed by the kernel as files under efivarfs, one
//! file per `NAME-GUID`. The first four bytes of each file hold the
//! variable's attribute word and the payload follows.
//!
//! [`PlatformStore`] is the seam between the classifier and the real
//! filesystem. Every access distinguishes a permission failure from an
//! absent object from anything else, because the classifier maps each to a
//! different outcome.

mod fs;
pub mod records;

pub use fs::FsStore;
pub use records::{EpcBiosRecord, EpcSwRecord};

use crate::error::Result;
use std::path::Path;

/// Variable published by firmware that supports the software enable
pub const EPCBIOS_VARIABLE: &str = "EPCBIOS-c60aa7f6-e8d6-4956-8ba1-fe26298f5e87";

/// Variable written to request the software enable on next boot
pub const EPCSW_VARIABLE: &str = "EPCSW-d69a279b-58eb-45d1-a148-771bb9eb5251";

/// Result of an existence check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The object exists
    Present,
    /// Not found, or a path component is not a directory
    Absent,
    /// Permission denied
    Denied,
    /// Any other failure
    Failed(String),
}

/// Filesystem-like store of named binary records
pub trait PlatformStore {
    /// Check whether `path` exists.
    fn probe(&self, path: &Path) -> ProbeOutcome;

    /// Read exactly `len` bytes from the start of `path`.
    ///
    /// A record shorter than `len` is an `Unexpected` error.
    fn read_record(&self, path: &Path, len: usize) -> Result<Vec<u8>>;

    /// Create or replace `path` with `bytes`.
    ///
    /// If the write does not complete, the partially written record is
    /// deleted before the error is returned.
    fn write_record(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

impl<T: PlatformStore + ?Sized> PlatformStore for &T {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        (**self).probe(path)
    }

    fn read_record(&self, path: &Path, len: usize) -> Result<Vec<u8>> {
        (**self).read_record(path, len)
    }

    fn write_record(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        (**self).write_record(path, bytes)
    }
}
