//! In-memory CPUID and platform store doubles for unit tests

use crate::config::EfiPaths;
use crate::cpu::{CpuidRegisters, CpuidSource};
use crate::efivars::{EpcBiosRecord, PlatformStore, ProbeOutcome, EPCBIOS_VARIABLE, EPCSW_VARIABLE};
use crate::error::{Error, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Recorded `cpuid` results; unknown leaves read as zeros
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeCpuid {
    leaves: HashMap<(u32, u32), CpuidRegisters>,
    queries: Cell<usize>,
}

impl FakeCpuid {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, leaf: u32, subleaf: u32, regs: CpuidRegisters) -> Self {
        self.leaves.insert((leaf, subleaf), regs);
        self
    }

    /// "GenuineIntel" with no feature bits
    pub(crate) fn intel() -> Self {
        Self::new().with(0x00, 0, CpuidRegisters::new(0x16, 0x756e_6547, 0x6c65_746e, 0x4965_6e69))
    }

    /// Intel CPU with the SGX feature bit but nothing enabled
    pub(crate) fn sgx_capable() -> Self {
        Self::intel().with(0x07, 0, CpuidRegisters::new(0, 1 << 2, 0, 0))
    }

    /// Intel CPU with SGX enabled and one 94 MiB EPC section
    pub(crate) fn sgx_active() -> Self {
        Self::sgx_capable()
            .with(0x12, 0, CpuidRegisters::new(0x1, 0, 0, 0x2424))
            .with(0x12, 2, CpuidRegisters::new(0x7000_0001, 0, 0x05e0_0001, 0))
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries.get()
    }
}

impl CpuidSource for FakeCpuid {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegisters {
        self.queries.set(self.queries.get() + 1);
        self.leaves.get(&(leaf, subleaf)).copied().unwrap_or_default()
    }
}

/// Directories and files held in memory, with forced failures per path
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    /// `None` marks a directory
    entries: RefCell<HashMap<PathBuf, Option<Vec<u8>>>>,
    forced: HashMap<PathBuf, ProbeOutcome>,
    read_errors: HashMap<PathBuf, Error>,
    fail_writes: bool,
    deny_writes: bool,
    accesses: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// UEFI-booted system with efivarfs mounted and no SGX variables
    pub(crate) fn uefi(paths: &EfiPaths) -> Self {
        Self::new()
            .with_dir(&paths.efi_root)
            .with_dir(&paths.efivars_dir)
    }

    /// UEFI system whose firmware publishes EPCBIOS
    pub(crate) fn with_epcbios(self, paths: &EfiPaths, record: EpcBiosRecord) -> Self {
        self.with_file(&paths.variable(EPCBIOS_VARIABLE), &record.to_bytes())
    }

    pub(crate) fn with_epcsw(self, paths: &EfiPaths, bytes: &[u8]) -> Self {
        self.with_file(&paths.variable(EPCSW_VARIABLE), bytes)
    }

    pub(crate) fn with_dir(self, path: &Path) -> Self {
        self.entries.borrow_mut().insert(path.to_path_buf(), None);
        self
    }

    pub(crate) fn with_file(self, path: &Path, bytes: &[u8]) -> Self {
        self.entries
            .borrow_mut()
            .insert(path.to_path_buf(), Some(bytes.to_vec()));
        self
    }

    /// Make every access to `path` report `outcome`
    pub(crate) fn with_outcome(mut self, path: &Path, outcome: ProbeOutcome) -> Self {
        self.forced.insert(path.to_path_buf(), outcome);
        self
    }

    /// Every write reports a short write and leaves nothing behind
    pub(crate) fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Reads of `path` fail with `err` while probes still see the entry
    pub(crate) fn with_read_error(mut self, path: &Path, err: Error) -> Self {
        self.read_errors.insert(path.to_path_buf(), err);
        self
    }

    /// Every write is refused before anything is created
    pub(crate) fn with_denied_writes(mut self) -> Self {
        self.deny_writes = true;
        self
    }

    pub(crate) fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.entries.borrow().get(path).cloned().flatten()
    }

    /// Number of probes, reads and writes made
    pub(crate) fn accesses(&self) -> usize {
        self.accesses.get()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.get()
    }

    fn touch(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }

    fn forced_error(&self, path: &Path) -> Option<Error> {
        match self.forced.get(path)? {
            ProbeOutcome::Denied => Some(Error::NoPrivilege(path.display().to_string())),
            ProbeOutcome::Failed(msg) => {
                Some(Error::Unexpected(format!("{}: {}", path.display(), msg)))
            }
            ProbeOutcome::Present | ProbeOutcome::Absent => None,
        }
    }
}

impl PlatformStore for MemoryStore {
    fn probe(&self, path: &Path) -> ProbeOutcome {
        self.touch();
        if let Some(outcome) = self.forced.get(path) {
            return outcome.clone();
        }
        if self.entries.borrow().contains_key(path) {
            ProbeOutcome::Present
        } else {
            ProbeOutcome::Absent
        }
    }

    fn read_record(&self, path: &Path, len: usize) -> Result<Vec<u8>> {
        self.touch();
        if let Some(err) = self.forced_error(path) {
            return Err(err);
        }
        if let Some(err) = self.read_errors.get(path) {
            return Err(err.clone());
        }

        match self.entries.borrow().get(path) {
            Some(Some(bytes)) if bytes.len() >= len => Ok(bytes[..len].to_vec()),
            Some(Some(bytes)) => Err(Error::Unexpected(format!(
                "{}: record is shorter than {} bytes ({})",
                path.display(),
                len,
                bytes.len()
            ))),
            Some(None) => Err(Error::Unexpected(format!("{}: is a directory", path.display()))),
            None => Err(Error::Unexpected(format!("{}: not found", path.display()))),
        }
    }

    fn write_record(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.touch();
        self.writes.set(self.writes.get() + 1);
        if let Some(err) = self.forced_error(path) {
            return Err(err);
        }
        if self.deny_writes {
            return Err(Error::NoPrivilege(path.display().to_string()));
        }

        if self.fail_writes {
            return Err(Error::Unexpected(format!(
                "{}: wrote {} of {} bytes",
                path.display(),
                bytes.len() / 2,
                bytes.len()
            )));
        }

        self.entries
            .borrow_mut()
            .insert(path.to_path_buf(), Some(bytes.to_vec()));
        Ok(())
    }
}
