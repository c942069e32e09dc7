//! CPU feature probing
//!
//! The raw `cpuid` instruction sits behind [`CpuidSource`] so the feature
//! prober can run against recorded register values in tests.

mod prober;

pub use prober::{probe_support, FeatureSupport};

/// Vendor leaf (maximum basic leaf and vendor string)
pub const LEAF_VENDOR: u32 = 0x00;

/// Structured extended feature flags
pub const LEAF_EXTENDED_FEATURES: u32 = 0x07;

/// SGX capability enumeration
pub const LEAF_SGX: u32 = 0x12;

/// First SGX sub-leaf describing an EPC section
pub const SGX_FIRST_EPC_SUBLEAF: u32 = 2;

/// The four registers returned by one `cpuid` query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuidRegisters {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidRegisters {
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }
}

/// Source of `cpuid` results for a (leaf, sub-leaf) pair
pub trait CpuidSource {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegisters;
}

impl<T: CpuidSource + ?Sized> CpuidSource for &T {
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegisters {
        (**self).cpuid(leaf, subleaf)
    }
}

/// Executes `cpuid` on the current processor through `raw-cpuid`.
///
/// On targets without the instruction every query reads as zeros, which
/// the prober reports as an unsupported CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCpuid;

impl CpuidSource for NativeCpuid {
    #[cfg(target_arch = "x86_64")]
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidRegisters {
        let res = raw_cpuid::native_cpuid::cpuid_count(leaf, subleaf);
        CpuidRegisters::new(res.eax, res.ebx, res.ecx, res.edx)
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn cpuid(&self, _leaf: u32, _subleaf: u32) -> CpuidRegisters {
        CpuidRegisters::default()
    }
}

#[inline(always)]
pub(crate) fn bit(value: u32, position: u32) -> bool {
    (value & (1 << position)) != 0
}
