//! SGX support and activation detection from `cpuid` leaves

use super::{bit, CpuidSource, LEAF_EXTENDED_FEATURES, LEAF_SGX, LEAF_VENDOR, SGX_FIRST_EPC_SUBLEAF};
use serde::Serialize;

/// "Genu"
const VENDOR_EBX: u32 = 0x756e_6547;
/// "ineI"
const VENDOR_EDX: u32 = 0x4965_6e69;
/// "ntel"
const VENDOR_ECX: u32 = 0x6c65_746e;

/// What the CPU reports about SGX
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureSupport {
    /// The processor implements SGX
    pub supported: bool,
    /// SGX instructions are usable and EPC memory is allocated
    pub active: bool,
}

/// Derive [`FeatureSupport`] from the processor's `cpuid` leaves.
///
/// `max_epc_subleaves` bounds the EPC section enumeration; running past it
/// reports SGX as inactive.
pub fn probe_support<C: CpuidSource + ?Sized>(cpuid: &C, max_epc_subleaves: u32) -> FeatureSupport {
    if !is_cpu_supported(cpuid) {
        tracing::debug!("CPU does not support SGX");
        return FeatureSupport::default();
    }

    FeatureSupport {
        supported: true,
        active: is_sgx_available(cpuid, max_epc_subleaves),
    }
}

fn is_cpu_supported<C: CpuidSource + ?Sized>(cpuid: &C) -> bool {
    let vendor = cpuid.cpuid(LEAF_VENDOR, 0);
    if vendor.ebx != VENDOR_EBX || vendor.ecx != VENDOR_ECX || vendor.edx != VENDOR_EDX {
        return false;
    }

    bit(cpuid.cpuid(LEAF_EXTENDED_FEATURES, 0).ebx, 2)
}

fn is_sgx_available<C: CpuidSource + ?Sized>(cpuid: &C, max_epc_subleaves: u32) -> bool {
    let caps = cpuid.cpuid(LEAF_SGX, 0);

    // SGX1 | SGX2
    if caps.eax & 0x3 == 0 {
        tracing::debug!("SGX instructions are not available");
        return false;
    }

    if caps.edx & 0xFFFF == 0 {
        tracing::debug!("Maximum enclave size is zero");
        return false;
    }

    // At least one valid EPC section must have memory behind it.
    for subleaf in (SGX_FIRST_EPC_SUBLEAF..).take(max_epc_subleaves as usize) {
        let epc = cpuid.cpuid(LEAF_SGX, subleaf);

        if !bit(epc.eax, 0) {
            tracing::debug!("No EPC memory found before invalid sub-leaf {}", subleaf);
            return false;
        }

        let has_base = epc.eax & 0xFFFF_F000 != 0 || epc.ebx & 0xF_FFFF != 0;
        let has_size = epc.ecx & 0xFFFF_F000 != 0 || epc.edx & 0xF_FFFF != 0;
        if has_base && has_size {
            tracing::debug!("EPC section found at sub-leaf {}", subleaf);
            return true;
        }
    }

    tracing::warn!(
        "Stopped EPC enumeration after {} sub-leaves without finding EPC memory",
        max_epc_subleaves
    );
    false
}
