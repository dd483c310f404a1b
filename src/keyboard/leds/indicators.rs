use core::ops::Range;

use rgb::RGB8;

use crate::bsp::{MATRIX_COLS, MATRIX_ROWS, LED_MAP};
use crate::bsp::layout::NO_LED;
use crate::host::Host;
use crate::keyboard::actions::{Action, FirmwareAction, Key, KeyCode, MouseAction};

/// Groups of keys that get the same indicator colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyCategory {
    /// Mouse keys and cursor movement
    Navigation,
    /// RGB matrix control
    Rgb,
    /// Bootloader, reset and key lock
    System,
    /// Keycodes of this keymap
    User,
    Other,
}

impl Key {
    /// Indicator category, `None` for keys that do not get coloured
    pub fn category(&self) -> Option<KeyCategory> {
        use KeyCode::*;
        let category = match self {
            Key::NoOp | Key::Trans => return None,
            Key::KeyCode(Up | Down | Left | Right | Home | End | PgUp | PgDown) => KeyCategory::Navigation,
            Key::Custom(Action::Mouse(MouseAction::Click(_) | MouseAction::Move(_))) => KeyCategory::Navigation,
            Key::Custom(Action::Rgb(_)) => KeyCategory::Rgb,
            Key::Custom(Action::Firmware(fw)) => match fw {
                FirmwareAction::Bootloader
                | FirmwareAction::Reboot
                | FirmwareAction::ClearEeprom
                | FirmwareAction::KeyLock => KeyCategory::System,
                _ => KeyCategory::Other,
            },
            Key::Custom(Action::User(_)) => KeyCategory::User,
            _ => KeyCategory::Other,
        };
        Some(category)
    }
}

/// Colours used by the indicator pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorConfig {
    pub navigation: RGB8,
    pub rgb: RGB8,
    pub system: RGB8,
    pub user: RGB8,
    /// Any other key that is not transparent
    pub neutral: RGB8,
    /// Colour of the keep-awake LED on base layers
    pub keep_awake: RGB8,
    /// LED showing that keep-awake is running
    pub keep_awake_led: u8,
}

impl IndicatorConfig {
    pub const DEFAULT: Self = Self {
        navigation: RGB8::new(0, 255, 255),
        rgb: RGB8::new(255, 0, 255),
        system: RGB8::new(255, 0, 0),
        user: RGB8::new(255, 128, 0),
        neutral: RGB8::new(32, 32, 32),
        keep_awake: RGB8::new(255, 255, 255),
        keep_awake_led: 20,
    };

    pub const fn color(&self, category: KeyCategory) -> RGB8 {
        match category {
            KeyCategory::Navigation => self.navigation,
            KeyCategory::Rgb => self.rgb,
            KeyCategory::System => self.system,
            KeyCategory::User => self.user,
            KeyCategory::Other => self.neutral,
        }
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Colour all LEDs in `leds` by the category of their key on the given layer
///
/// LEDs of transparent or empty keys are not touched. Returns number of LEDs set.
pub fn render(
    layer: &[[Key; MATRIX_COLS]; MATRIX_ROWS],
    leds: Range<u8>,
    config: &IndicatorConfig,
    host: &mut impl Host,
) -> usize {
    let mut count = 0;
    for (row, keys) in layer.iter().enumerate() {
        for (col, key) in keys.iter().enumerate() {
            let led = LED_MAP[row][col];
            if led == NO_LED || !leds.contains(&led) {
                continue;
            }
            if let Some(category) = key.category() {
                host.set_led_color(led, config.color(category));
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::led_index;
    use crate::host::mock::MockHost;
    use crate::keyboard::actions::{c, k, ConsumerKey, MouseButton, RgbAction, UserAction};

    #[test]
    fn key_categories() {
        let verify = |key: Key, category: Option<KeyCategory>| {
            assert_eq!(key.category(), category, "Wrong category of {:?}", key);
        };
        verify(Key::Trans, None);
        verify(Key::NoOp, None);
        verify(k(KeyCode::Up), Some(KeyCategory::Navigation));
        verify(k(KeyCode::PgDown), Some(KeyCategory::Navigation));
        verify(Key::Custom(Action::Mouse(MouseAction::Click(MouseButton::Left))), Some(KeyCategory::Navigation));
        verify(Key::Custom(Action::Rgb(RgbAction::Toggle)), Some(KeyCategory::Rgb));
        verify(Key::Custom(Action::Firmware(FirmwareAction::Bootloader)), Some(KeyCategory::System));
        verify(Key::Custom(Action::Firmware(FirmwareAction::KeyLock)), Some(KeyCategory::System));
        verify(Key::Custom(Action::Firmware(FirmwareAction::NkroToggle)), Some(KeyCategory::Other));
        verify(Key::Custom(Action::User(UserAction::KeepAwake)), Some(KeyCategory::User));
        verify(Key::Custom(Action::User(UserAction::Unlock)), Some(KeyCategory::User));
        verify(k(KeyCode::F13), Some(KeyCategory::Other));
        verify(c(ConsumerKey::Mute), Some(KeyCategory::Other));
    }

    #[test]
    fn render_colours_only_keys_in_range() {
        let config = IndicatorConfig::default();
        let mut layer = [[Key::Trans; MATRIX_COLS]; MATRIX_ROWS];
        layer[0][0] = Key::Custom(Action::Firmware(FirmwareAction::Bootloader));
        layer[0][1] = k(KeyCode::F1);
        layer[0][2] = Key::NoOp;
        layer[4][13] = k(KeyCode::Up);
        // no LED at this position
        layer[2][13] = k(KeyCode::Enter);

        let mut host = MockHost::new();
        assert_eq!(render(&layer, 0..110, &config, &mut host), 3);
        assert_eq!(host.leds[0], Some(config.system));
        assert_eq!(host.leds[1], Some(config.neutral));
        assert_eq!(host.leds[2], None);
        assert_eq!(host.leds[led_index(4, 13).unwrap() as usize], Some(config.navigation));

        let mut host = MockHost::new();
        assert_eq!(render(&layer, 1..50, &config, &mut host), 1);
        assert_eq!(host.leds[0], None);
        assert_eq!(host.leds[1], Some(config.neutral));
    }
}
