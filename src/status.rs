//! Device status classification result

use serde::Serialize;
use std::fmt;

/// Where the platform stands with respect to SGX.
///
/// Exactly one variant describes a system at any point in time. Numeric
/// codes follow the platform SDK's device status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// SGX is enabled and usable
    Enabled,
    /// The software enable has been requested; SGX turns on after reboot
    DisabledRebootRequired,
    /// Booted in legacy (non-UEFI) mode, so firmware variables are unreachable
    DisabledLegacyBoot,
    /// Disabled, with no further detail available
    Disabled,
    /// Disabled; firmware accepts a software enable request
    DisabledControlInterfaceAvailable,
    /// Disabled; firmware offers no software enable, use the BIOS setup
    DisabledManualEnableRequired,
    /// The processor does not implement SGX
    DisabledUnsupportedCpu,
}

impl DeviceStatus {
    /// SDK device status code
    pub fn code(self) -> u32 {
        match self {
            DeviceStatus::Enabled => 0,
            DeviceStatus::DisabledRebootRequired => 1,
            DeviceStatus::DisabledLegacyBoot => 2,
            DeviceStatus::Disabled => 3,
            DeviceStatus::DisabledControlInterfaceAvailable => 4,
            DeviceStatus::DisabledManualEnableRequired => 5,
            DeviceStatus::DisabledUnsupportedCpu => 7,
        }
    }

    /// Enabled now, or will be after the pending reboot
    pub fn is_enabled_or_pending(self) -> bool {
        matches!(
            self,
            DeviceStatus::Enabled | DeviceStatus::DisabledRebootRequired
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceStatus::Enabled => "enabled",
            DeviceStatus::DisabledRebootRequired => "disabled_reboot_required",
            DeviceStatus::DisabledLegacyBoot => "disabled_legacy_boot",
            DeviceStatus::Disabled => "disabled",
            DeviceStatus::DisabledControlInterfaceAvailable => {
                "disabled_control_interface_available"
            }
            DeviceStatus::DisabledManualEnableRequired => "disabled_manual_enable_required",
            DeviceStatus::DisabledUnsupportedCpu => "disabled_unsupported_cpu",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
