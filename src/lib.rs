//! sgx-enable - Intel SGX capability detection and software enable
//!
//! Determines whether the processor supports Intel SGX, whether it is
//! currently enabled, and, on UEFI systems whose firmware offers a
//! software control interface, requests that firmware enable it on the
//! next boot.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     sgx-enable (binary)                       │
//! │        CLI parsing, status text, exit codes, JSON report      │
//! └───────────────────────────────┬──────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────▼──────────────────────────────┐
//! │                        SgxCapability                          │
//! │   classify()  ─ one DeviceStatus out of seven                 │
//! │   enable()    ─ EPCBIOS read, EPCSW write                     │
//! │   is_capable()                                                │
//! └───────────────┬──────────────────────────────┬───────────────┘
//!                 │                              │
//! ┌───────────────▼──────────────┐ ┌─────────────▼───────────────┐
//! │   CpuidSource                │ │   PlatformStore             │
//! │   NativeCpuid (cpuid insn)   │ │   FsStore (efivarfs)        │
//! └──────────────────────────────┘ └─────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cpu`]: `cpuid` access and SGX feature probing
//! - [`efivars`]: UEFI variable store access and EPC control records
//! - [`capability`]: status classification and the software enable
//! - [`status`]: the device status enumeration
//! - [`report`]: user-facing messages, exit codes and JSON output
//! - [`config`]: configuration management
//!
//! ## Example
//!
//! ```no_run
//! use sgx_enable::{FsStore, NativeCpuid, SgxCapability, SgxEnableConfig};
//!
//! let capability = SgxCapability::new(NativeCpuid, FsStore::new(), SgxEnableConfig::default())?;
//! println!("{}", capability.classify()?);
//! # Ok::<(), sgx_enable::Error>(())
//! ```

pub mod capability;
pub mod config;
pub mod cpu;
pub mod efivars;
pub mod error;
pub mod report;
pub mod status;

#[cfg(test)]
mod testing;

pub use capability::SgxCapability;
pub use config::SgxEnableConfig;
pub use cpu::{CpuidSource, FeatureSupport, NativeCpuid};
pub use efivars::{FsStore, PlatformStore, ProbeOutcome};
pub use error::{Error, Result};
pub use status::DeviceStatus;
