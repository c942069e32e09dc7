//! User-facing status text, exit codes and the JSON report

use crate::capability::SgxCapability;
use crate::cpu::{CpuidSource, FeatureSupport};
use crate::efivars::PlatformStore;
use crate::error::Error;
use crate::status::DeviceStatus;
use serde::Serialize;

/// Process exit code for success
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit code for every other outcome
pub const EXIT_FAILURE: u8 = 1;

/// Exit code for a final status: success only when SGX is enabled or will
/// be after the pending reboot.
pub fn exit_code(status: DeviceStatus) -> u8 {
    if status.is_enabled_or_pending() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

/// Explanation shown for a classified status
pub fn status_message(status: DeviceStatus) -> &'static str {
    match status {
        DeviceStatus::Enabled => "Intel SGX is already enabled on this system",
        DeviceStatus::DisabledUnsupportedCpu => "This CPU does not support Intel SGX",
        DeviceStatus::DisabledLegacyBoot => {
            "This processor supports Intel SGX but was booted in legacy mode.\n\
             A UEFI boot is required to determine whether or not your BIOS\n\
             supports Intel SGX, and to attempt the software enable.\n\
             Alternatively, you can check your BIOS to see if it has an\n\
             explicit option to enable SGX."
        }
        DeviceStatus::Disabled => {
            "Intel SGX is explicitly disabled on your system. It may be\n\
             disabled in the BIOS, or the BIOS may not support Intel SGX."
        }
        DeviceStatus::DisabledManualEnableRequired => {
            "Intel SGX is explicitly disabled, and your BIOS does not\n\
             support the \"software enable\" option. Check your BIOS for an\n\
             explicit option to enable Intel SGX."
        }
        DeviceStatus::DisabledRebootRequired => {
            "The software enable has been performed on this system and\n\
             Intel SGX will be enabled after the system is rebooted."
        }
        DeviceStatus::DisabledControlInterfaceAvailable => {
            "Intel SGX is disabled and can be enabled using this utility."
        }
    }
}

/// Shown after this run performed the software enable
pub const ENABLE_PERFORMED_MESSAGE: &str =
    "Software enable has been set. Please reboot your system to finish\n\
     enabling Intel SGX.";

/// Explanation for a failed status query
pub fn status_error_message(err: &Error) -> String {
    match err {
        Error::NoPrivilege(_) => "could not examine the EFI filesystem".to_string(),
        Error::InvalidParameter(_) | Error::Unexpected(_) => format!(
            "could not get SGX status: {} (0x{:04x})",
            err,
            err.code()
        ),
    }
}

/// Explanation for a failed software enable
pub fn enable_error_message(err: &Error) -> String {
    match err {
        Error::NoPrivilege(_) => "You may need to rerun this utility as root".to_string(),
        Error::InvalidParameter(_) | Error::Unexpected(_) => format!(
            "I could not attempt the software enable: {} (0x{:04x})",
            err,
            err.code()
        ),
    }
}

/// Machine-readable outcome of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Final status, absent when the run failed
    pub status: Option<DeviceStatus>,
    /// SDK device status code of `status`
    pub status_code: Option<u32>,
    pub cpu: FeatureSupport,
    /// Whether this run wrote the EPCSW variable
    pub enable_performed: bool,
    pub message: String,
    /// SDK error code when the run failed
    pub error_code: Option<u32>,
    pub exit_code: u8,
}

impl StatusReport {
    /// Report a classified status
    pub fn from_status(cpu: FeatureSupport, status: DeviceStatus) -> Self {
        Self {
            status: Some(status),
            status_code: Some(status.code()),
            cpu,
            enable_performed: false,
            message: status_message(status).to_string(),
            error_code: None,
            exit_code: exit_code(status),
        }
    }

    /// Report a software enable performed by this run
    pub fn enabled(cpu: FeatureSupport) -> Self {
        let status = DeviceStatus::DisabledRebootRequired;
        Self {
            enable_performed: true,
            message: ENABLE_PERFORMED_MESSAGE.to_string(),
            ..Self::from_status(cpu, status)
        }
    }

    /// Report a failure with the text already chosen for it
    pub fn from_error(cpu: FeatureSupport, err: &Error, message: String) -> Self {
        Self {
            status: None,
            status_code: None,
            cpu,
            enable_performed: false,
            message,
            error_code: Some(err.code()),
            exit_code: EXIT_FAILURE,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| {
            format!("{{\"message\":\"failed to encode report: {}\",\"exit_code\":1}}", e)
        })
    }
}

/// Classify the platform and, unless `status_only` is set, attempt the
/// software enable when firmware offers it.
pub fn evaluate<C: CpuidSource, S: PlatformStore>(
    capability: &SgxCapability<C, S>,
    status_only: bool,
) -> StatusReport {
    let cpu = capability.feature_support();

    let status = match capability.classify() {
        Ok(status) => status,
        Err(e) => return StatusReport::from_error(cpu, &e, status_error_message(&e)),
    };

    if status != DeviceStatus::DisabledControlInterfaceAvailable || status_only {
        return StatusReport::from_status(cpu, status);
    }

    match capability.enable() {
        Ok(DeviceStatus::DisabledRebootRequired) => StatusReport::enabled(cpu),
        Ok(other) => StatusReport::from_status(cpu, other),
        Err(e) => StatusReport::from_error(cpu, &e, enable_error_message(&e)),
    }
}
