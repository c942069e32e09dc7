//! sgx-enable configuration management
//!
//! Every field has a default matching a stock Linux system, so a missing
//! configuration file and an empty one behave the same. The control
//! variable names are not configurable; only where the firmware filesystem
//! is mounted is.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default mount point of the firmware filesystem
pub const DEFAULT_EFI_ROOT: &str = "/sys/firmware/efi";

/// Default mount point of efivarfs
pub const DEFAULT_EFIVARS_DIR: &str = "/sys/firmware/efi/efivars";

/// Default EFI system partition mount point
pub const DEFAULT_BOOT_EFI: &str = "/boot/efi";

/// Default upper bound on EPC sub-leaves enumerated by the feature prober
pub const DEFAULT_MAX_EPC_SUBLEAVES: u32 = 64;

/// Main sgx-enable configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgxEnableConfig {
    /// Firmware filesystem locations
    #[serde(default)]
    pub paths: EfiPaths,

    /// CPU probing limits
    #[serde(default)]
    pub cpu: CpuConfig,
}

/// Firmware filesystem locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfiPaths {
    /// Present only when the kernel was booted through UEFI
    pub efi_root: PathBuf,

    /// Directory holding one file per UEFI variable
    pub efivars_dir: PathBuf,

    /// EFI system partition; its presence hints at a UEFI-capable install
    pub boot_efi: PathBuf,
}

impl Default for EfiPaths {
    fn default() -> Self {
        Self {
            efi_root: PathBuf::from(DEFAULT_EFI_ROOT),
            efivars_dir: PathBuf::from(DEFAULT_EFIVARS_DIR),
            boot_efi: PathBuf::from(DEFAULT_BOOT_EFI),
        }
    }
}

impl EfiPaths {
    /// Full path of a variable file under the efivars directory
    pub fn variable(&self, name: &str) -> PathBuf {
        self.efivars_dir.join(name)
    }
}

/// CPU probing limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuConfig {
    /// Stop enumerating EPC sub-leaves after this many
    pub max_epc_subleaves: u32,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            max_epc_subleaves: DEFAULT_MAX_EPC_SUBLEAVES,
        }
    }
}

impl SgxEnableConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::InvalidParameter(format!("Invalid configuration: {}", e)))
    }

    /// Reject configurations no probe could run against
    pub fn validate(&self) -> Result<()> {
        for (field, path) in [
            ("paths.efi_root", &self.paths.efi_root),
            ("paths.efivars_dir", &self.paths.efivars_dir),
            ("paths.boot_efi", &self.paths.boot_efi),
        ] {
            check_absolute(field, path)?;
        }

        if self.cpu.max_epc_subleaves == 0 {
            return Err(Error::InvalidParameter(
                "cpu.max_epc_subleaves must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn check_absolute(field: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(Error::InvalidParameter(format!("{} is empty", field)));
    }
    if !path.is_absolute() {
        return Err(Error::InvalidParameter(format!(
            "{} must be an absolute path, got {}",
            field,
            path.display()
        )));
    }
    Ok(())
}
