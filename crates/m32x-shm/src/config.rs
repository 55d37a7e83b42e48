use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("frequency_hz must be non-zero")]
    ZeroFrequency,
    #[error("boot_rom_cells must be at least 4 to hold the reset vectors (got {0})")]
    BootRomTooSmall(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShmConfig {
    /// Native clock of the SHM.
    pub frequency_hz: u64,
    /// Name of the boot ROM stream looked up in the file pak.
    pub boot_rom_name: String,
    /// Boot ROM capacity in 16-bit cells.
    pub boot_rom_cells: usize,
    /// Events kept by the instruction tracer.
    pub trace_capacity: usize,
}

impl Default for ShmConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 23_000_000,
            boot_rom_name: "sh2.boot.mrom".to_owned(),
            boot_rom_cells: 2048 >> 1,
            trace_capacity: 16 * 1024,
        }
    }
}

impl ShmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frequency_hz == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if self.boot_rom_cells < 4 {
            return Err(ConfigError::BootRomTooSmall(self.boot_rom_cells));
        }
        Ok(())
    }
}
