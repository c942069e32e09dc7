//! Software enable through the EPCSW variable

use super::SgxCapability;
use crate::cpu::CpuidSource;
use crate::efivars::{EpcBiosRecord, EpcSwRecord, PlatformStore, EPCBIOS_VARIABLE, EPCSW_VARIABLE};
use crate::error::Result;
use crate::status::DeviceStatus;

impl<C: CpuidSource, S: PlatformStore> SgxCapability<C, S> {
    /// Request that firmware enable SGX on the next boot.
    ///
    /// Only acts when [`classify`](Self::classify) reports
    /// `DisabledControlInterfaceAvailable`; every other status is returned
    /// as is, without touching the control variables. Once EPCSW exists
    /// the platform classifies as `DisabledRebootRequired`, so repeated
    /// calls write at most once per boot.
    pub fn enable(&self) -> Result<DeviceStatus> {
        let status = self.classify()?;
        if status != DeviceStatus::DisabledControlInterfaceAvailable {
            tracing::debug!("Nothing to enable, status is {}", status);
            return Ok(status);
        }

        let paths = &self.config.paths;
        let epcbios_path = paths.variable(EPCBIOS_VARIABLE);
        let epcsw_path = paths.variable(EPCSW_VARIABLE);

        let bytes = self.store.read_record(&epcbios_path, EpcBiosRecord::SIZE)?;
        let epcbios = EpcBiosRecord::from_bytes(&bytes)?;
        tracing::debug!(
            "EPCBIOS attributes={:#x} max_epc_size={:#x}",
            epcbios.attributes,
            epcbios.max_epc_size
        );

        let epcsw = EpcSwRecord::from(&epcbios);
        self.store.write_record(&epcsw_path, &epcsw.to_bytes())?;

        tracing::info!("Software enable requested, reboot to finish enabling SGX");
        Ok(DeviceStatus::DisabledRebootRequired)
    }
}
