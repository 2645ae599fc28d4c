use typed_builder::TypedBuilder;

use crate::error::HostError;
use crate::{FONTSET_SIZE, FONT_ADDRESS, PROGRAM_REGION_END, PROGRAM_START};

/// Construction-time settings for an [`Engine`](crate::Engine).
///
/// ```
/// use chip8vm_core::EngineConfig;
///
/// let config = EngineConfig::builder().rng_seed(Some(42)).build();
/// assert_eq!(config.program_start, 0x200);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct EngineConfig {
    /// Where program bytes are loaded and where PC starts.
    #[builder(default = PROGRAM_START)]
    pub program_start: u16,
    /// Where the 80-byte hex font lives.
    #[builder(default = FONT_ADDRESS)]
    pub font_address: u16,
    /// Seed for the random-and-mask instruction. `None` draws from OS entropy.
    #[builder(default)]
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), HostError> {
        check_layout(self.program_start, self.font_address)
    }
}

/// The program must start on an even address inside the program region and
/// the font table must fit entirely below it.
pub(crate) fn check_layout(program_start: u16, font_address: u16) -> Result<(), HostError> {
    let program_start = usize::from(program_start);
    let font_end = usize::from(font_address) + FONTSET_SIZE;
    if program_start >= PROGRAM_REGION_END {
        return Err(HostError::InvalidConfig(
            "program start lies outside the program region",
        ));
    }
    if program_start % 2 != 0 {
        return Err(HostError::InvalidConfig("program start must be even"));
    }
    if font_end > program_start {
        return Err(HostError::InvalidConfig(
            "font table must end at or before the program start",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.program_start, 0x200);
        assert_eq!(config.font_address, 0x050);
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_font_overlapping_program() {
        let config = EngineConfig::builder().font_address(0x1D0).build();
        assert!(matches!(
            config.validate(),
            Err(HostError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_odd_or_out_of_range_program_start() {
        let odd = EngineConfig::builder().program_start(0x201).build();
        assert!(odd.validate().is_err());
        let high = EngineConfig::builder().program_start(0x1000).build();
        assert!(high.validate().is_err());
    }
}
