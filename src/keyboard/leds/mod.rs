//! RGB matrix state as seen by the keymap
//!
//! The animation engine runs in the host firmware, this only mirrors its
//! configuration so that layer changes can temporarily replace the effect.

/// Colouring of keys on overlay layers
pub mod indicators;

pub use indicators::{render, IndicatorConfig, KeyCategory};

use serde::{Deserialize, Serialize};
use postcard::experimental::max_size::MaxSize;

/// RGB matrix effects enabled in the firmware build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RgbMode {
    SolidColor = 1,
    Breathing,
    BandSpiralVal,
    CycleAll,
    CycleLeftRight,
    CycleUpDown,
    RainbowMovingChevron,
    CycleOutIn,
    CycleOutInDual,
    CyclePinwheel,
    CycleSpiral,
    DualBeacon,
    RainbowBeacon,
    JellybeanRaindrops,
    PixelRain,
    TypingHeatmap,
    DigitalRain,
    SolidReactiveSimple,
    SolidReactiveMultiWide,
    SolidReactiveMultiCross,
    SolidReactiveMultiNexus,
    Splash,
    Multisplash,
    SolidSplash,
    SolidMultisplash,
}

impl RgbMode {
    /// Effects that only react to key presses and leave other LEDs dark
    ///
    /// These can stay on while an overlay layer colours its keys, all other
    /// effects would fight with the indicator colours.
    pub const fn is_overlay_compatible(self) -> bool {
        use RgbMode::*;
        matches!(self,
            TypingHeatmap
            | SolidReactiveMultiWide | SolidReactiveMultiCross | SolidReactiveMultiNexus
            | Splash | Multisplash | SolidSplash | SolidMultisplash
        )
    }
}

/// Colour in hue/saturation/value space, all components scaled to 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const OFF: Self = Self { h: 0, s: 0, v: 0 };

    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// RGB matrix configuration, as persisted by the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RgbConfig {
    pub enabled: bool,
    pub mode: RgbMode,
    pub hsv: Hsv,
    pub speed: u8,
}

impl Default for RgbConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: RgbMode::CycleLeftRight,
            hsv: Hsv::new(0, 255, 255),
            speed: 128,
        }
    }
}

impl RgbConfig {
    pub const SIZE: usize = Self::POSTCARD_MAX_SIZE;

    /// Serialize into `buf`, returning the used part
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> postcard::Result<&'a mut [u8]> {
        postcard::to_slice(self, buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }
}
