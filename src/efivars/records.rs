//! EPC control records
//!
//! Both records start with the efivarfs attribute word, so the layouts
//! below are file layouts rather than variable payloads.

use crate::error::{Error, Result};

/// Leading part of the EPCBIOS variable file
///
/// ```text
/// offset 0x0  attributes    (efivarfs attribute word)
/// offset 0x4  reserved      (supported PRM bins)
/// offset 0x8  max_epc_size
/// ```
///
/// Firmware may append further fields; only these are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpcBiosRecord {
    pub attributes: u32,
    pub reserved: u32,
    pub max_epc_size: u32,
}

impl EpcBiosRecord {
    pub const SIZE: usize = 12;

    /// Decode the first [`Self::SIZE`] bytes of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(Error::Unexpected(format!(
                "EPCBIOS record is {} bytes, expected {}",
                bytes.len(),
                Self::SIZE
            )));
        }

        Ok(Self {
            attributes: read_u32(bytes, 0),
            reserved: read_u32(bytes, 4),
            max_epc_size: read_u32(bytes, 8),
        })
    }

    #[cfg(test)]
    pub(crate) fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.attributes.to_le_bytes());
        buf[4..8].copy_from_slice(&self.reserved.to_le_bytes());
        buf[8..12].copy_from_slice(&self.max_epc_size.to_le_bytes());
        buf
    }
}

/// The EPCSW variable file: attribute word followed by the requested EPC size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpcSwRecord {
    pub attributes: u32,
    pub max_epc_size: u32,
}

impl EpcSwRecord {
    pub const SIZE: usize = 8;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&self.attributes.to_le_bytes());
        buf[4..8].copy_from_slice(&self.max_epc_size.to_le_bytes());
        buf
    }
}

impl From<&EpcBiosRecord> for EpcSwRecord {
    fn from(bios: &EpcBiosRecord) -> Self {
        Self {
            attributes: bios.attributes,
            max_epc_size: bios.max_epc_size,
        }
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(word)
}
