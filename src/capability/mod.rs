//! SGX capability detection and software enable
//!
//! [`SgxCapability`] combines three signals into one [`DeviceStatus`]:
//!
//! ```text
//! cpuid ──► supported? ──no──► DisabledUnsupportedCpu
//!              │ yes
//!              ▼
//!           active? ──yes──► Enabled
//!              │ no
//!              ▼
//!   /sys/firmware/efi ──absent──► /boot/efi ──► Disabled | DisabledLegacyBoot
//!              │ present
//!              ▼
//!     EPCBIOS ──absent──► DisabledManualEnableRequired
//!              │ present
//!              ▼
//!      EPCSW ──absent──► DisabledControlInterfaceAvailable
//!              │ present
//!              ▼
//!     DisabledRebootRequired
//! ```
//!
//! Nothing is cached between calls; every call re-probes the CPU and the
//! store.
//!
//! The EPCBIOS read and EPCSW write are not protected against a second
//! process doing the same thing at the same time. The firmware interface
//! offers no lock to take.

mod classify;
mod enable;

use crate::config::SgxEnableConfig;
use crate::cpu::{probe_support, CpuidSource, FeatureSupport};
use crate::efivars::{PlatformStore, ProbeOutcome, EPCBIOS_VARIABLE};
use crate::error::{Error, Result};
use std::path::Path;

/// Capability queries over an injected CPUID source and platform store
pub struct SgxCapability<C, S> {
    cpuid: C,
    store: S,
    config: SgxEnableConfig,
}

impl<C, S> std::fmt::Debug for SgxCapability<C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SgxCapability")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C: CpuidSource, S: PlatformStore> SgxCapability<C, S> {
    /// Create a capability checker.
    ///
    /// Fails with `InvalidParameter` if `config` does not validate.
    pub fn new(cpuid: C, store: S, config: SgxEnableConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            cpuid,
            store,
            config,
        })
    }

    /// Current CPU support, probed fresh
    pub fn feature_support(&self) -> FeatureSupport {
        probe_support(&self.cpuid, self.config.cpu.max_epc_subleaves)
    }

    /// Whether SGX is usable now or could be after a software enable.
    ///
    /// Unlike [`classify`](Self::classify) this does not look at the boot
    /// mode; a present EPCBIOS variable is taken as proof of a control
    /// interface.
    pub fn is_capable(&self) -> Result<bool> {
        let support = self.feature_support();
        if !support.supported {
            return Ok(false);
        }
        if support.active {
            return Ok(true);
        }

        let epcbios = self.config.paths.variable(EPCBIOS_VARIABLE);
        match self.probe(&epcbios)? {
            Presence::Present => Ok(true),
            Presence::Absent => Ok(false),
        }
    }

    pub fn config(&self) -> &SgxEnableConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn cpuid(&self) -> &C {
        &self.cpuid
    }

    /// Probe a path where only a permission failure and an unclassifiable
    /// failure are errors.
    fn probe(&self, path: &Path) -> Result<Presence> {
        match self.store.probe(path) {
            ProbeOutcome::Present => Ok(Presence::Present),
            ProbeOutcome::Absent => Ok(Presence::Absent),
            ProbeOutcome::Denied => {
                tracing::warn!("{}: permission denied", path.display());
                Err(Error::NoPrivilege(format!(
                    "Permission denied: {}",
                    path.display()
                )))
            }
            ProbeOutcome::Failed(msg) => {
                tracing::warn!("{}: {}", path.display(), msg);
                Err(Error::Unexpected(format!("{}: {}", path.display(), msg)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Present,
    Absent,
}
