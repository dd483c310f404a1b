//! Persistent settings
//!
//! Image of the values that the firmware keeps in EEPROM for this keymap. Stored with
//! `postcard`, the buffer size is known at compile time thanks to `MaxSize`.

use serde::{Deserialize, Serialize};
use postcard::experimental::max_size::MaxSize;

use crate::keyboard::layers::Layer;
use crate::keyboard::leds::RgbConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Default layer selected with the DIP switch
    pub default_layer: Layer,
    pub rgb: RgbConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_layer: Layer::Base,
            rgb: RgbConfig::default(),
        }
    }
}

impl Settings {
    /// Size of buffer large enough for any settings value
    pub const SIZE: usize = Self::POSTCARD_MAX_SIZE;

    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
        postcard::to_slice(self, buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }

    /// Load settings, falling back to defaults on invalid data
    ///
    /// Overlay layers cannot be the default layer, such values are treated as invalid.
    pub fn load(bytes: &[u8]) -> Self {
        match Self::from_bytes(bytes) {
            Ok(settings) if !settings.default_layer.is_overlay() => settings,
            Ok(settings) => {
                warn!("Invalid default layer: {:?}", settings.default_layer);
                Self::default()
            },
            Err(_e) => {
                warn!("Could not load settings, using defaults");
                Self::default()
            },
        }
    }
}
