//! Device status classification

use super::{Presence, SgxCapability};
use crate::cpu::CpuidSource;
use crate::efivars::{PlatformStore, ProbeOutcome, EPCBIOS_VARIABLE, EPCSW_VARIABLE};
use crate::error::{Error, Result};
use crate::status::DeviceStatus;

impl<C: CpuidSource, S: PlatformStore> SgxCapability<C, S> {
    /// Classify the platform into exactly one [`DeviceStatus`].
    ///
    /// The CPU is checked before any filesystem access, and the boot mode
    /// before the control variables, which only mean something under a
    /// UEFI boot.
    pub fn classify(&self) -> Result<DeviceStatus> {
        let support = self.feature_support();
        if !support.supported {
            return Ok(DeviceStatus::DisabledUnsupportedCpu);
        }
        if support.active {
            return Ok(DeviceStatus::Enabled);
        }

        let paths = &self.config.paths;

        match self.store.probe(&paths.efi_root) {
            ProbeOutcome::Present => {}
            ProbeOutcome::Absent => return Ok(self.classify_without_efifs()),
            ProbeOutcome::Denied => {
                tracing::warn!("{}: permission denied", paths.efi_root.display());
                return Err(Error::NoPrivilege(format!(
                    "no privilege to examine boot environment: {}",
                    paths.efi_root.display()
                )));
            }
            ProbeOutcome::Failed(msg) => {
                tracing::warn!("{}: {}", paths.efi_root.display(), msg);
                return Err(Error::Unexpected(format!(
                    "{}: {}",
                    paths.efi_root.display(),
                    msg
                )));
            }
        }

        // The per-variable probes below are authoritative; a missing
        // efivars mount just makes them come back absent.
        if self.probe(&paths.efivars_dir)? == Presence::Absent {
            tracing::debug!(
                "{} exists but {} does not",
                paths.efi_root.display(),
                paths.efivars_dir.display()
            );
        }

        if self.probe(&paths.variable(EPCBIOS_VARIABLE))? == Presence::Absent {
            tracing::debug!("No software control interface");
            return Ok(DeviceStatus::DisabledManualEnableRequired);
        }

        match self.probe(&paths.variable(EPCSW_VARIABLE))? {
            Presence::Absent => Ok(DeviceStatus::DisabledControlInterfaceAvailable),
            Presence::Present => Ok(DeviceStatus::DisabledRebootRequired),
        }
    }

    /// No firmware filesystem: either a legacy boot or one we cannot see.
    fn classify_without_efifs(&self) -> DeviceStatus {
        let boot_efi = &self.config.paths.boot_efi;
        match self.store.probe(boot_efi) {
            ProbeOutcome::Present => DeviceStatus::Disabled,
            ProbeOutcome::Absent => DeviceStatus::DisabledLegacyBoot,
            ProbeOutcome::Denied => {
                tracing::warn!("{}: permission denied, reporting disabled", boot_efi.display());
                DeviceStatus::Disabled
            }
            ProbeOutcome::Failed(msg) => {
                tracing::warn!("{}: {}, reporting disabled", boot_efi.display(), msg);
                DeviceStatus::Disabled
            }
        }
    }
}
