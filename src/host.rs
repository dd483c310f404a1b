//! Services of the host firmware used by the keymap
//!
//! Matrix scanning, HID reports, the RGB effect engine and persistent storage are
//! implemented by the firmware. The keymap only calls into them through [`Host`].

use rgb::RGB8;

use crate::keyboard::actions::Key;
use crate::keyboard::layers::Layer;
use crate::keyboard::leds::{Hsv, RgbConfig, RgbMode};

pub trait Host {
    /// Normal key processing of the firmware
    fn process_key(&mut self, key: Key, pressed: bool);

    /// Press and immediately release a key
    fn tap(&mut self, key: Key) {
        self.process_key(key, true);
        self.process_key(key, false);
    }

    /// Store default layer in persistent storage
    fn set_persistent_default_layer(&mut self, layer: Layer);

    /// Current (runtime) RGB matrix configuration
    fn rgb_config(&self) -> RgbConfig;

    /// Change RGB effect without writing it to persistent storage
    fn set_rgb_mode_noeeprom(&mut self, mode: RgbMode);

    /// Change RGB colour without writing it to persistent storage
    fn set_rgb_hsv_noeeprom(&mut self, hsv: Hsv);

    /// Replace the runtime RGB configuration with the persisted one
    fn reload_rgb_from_eeprom(&mut self);

    /// Set colour of a single LED for the current frame
    fn set_led_color(&mut self, led: u8, color: RGB8);
}
