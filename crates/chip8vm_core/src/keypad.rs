use crate::error::HostError;
use crate::NUM_KEYS;

/// Key-state query used by the skip-if-key instructions.
pub trait KeyInput {
    /// Whether hex key `key` is held. Values above 0xF are never pressed.
    fn is_pressed(&self, key: u8) -> bool;
}

/// The 16-key hexadecimal keypad, as last reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; NUM_KEYS],
}

impl Keypad {
    pub fn set(&mut self, key: u8, pressed: bool) -> Result<(), HostError> {
        let slot = self
            .keys
            .get_mut(usize::from(key))
            .ok_or(HostError::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn release_all(&mut self) {
        self.keys = [false; NUM_KEYS];
    }
}

impl KeyInput for Keypad {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }
}
