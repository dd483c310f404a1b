pub use keyberon::key_code::KeyCode;

use super::layers::Layer;

/// Entry of the layer table: what a key position does on a given layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Empty position, does nothing
    NoOp,
    /// Use the key from the next lower active layer
    Trans,
    /// Standard keyboard page key
    KeyCode(KeyCode),
    /// USB HID consumer page key
    Consumer(ConsumerKey),
    /// Activate the layer while the key is held
    Layer(Layer),
    /// Additional key actions
    Custom(Action),
}

/// Additional key actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Control RGB matrix effects
    Rgb(RgbAction),
    /// Use mouse keys
    Mouse(MouseAction),
    /// Record or play dynamic macros
    Macro(MacroAction),
    /// Perform special firmware-related actions
    Firmware(FirmwareAction),
    /// Keycodes of this keymap
    User(UserAction),
}

/// Step direction for adjustable values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Inc {
    Up,
    Down,
}

/// Actions for RGB matrix control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RgbAction {
    /// Turn RGB matrix on/off
    Toggle,
    /// Cycle through effects
    Mode(Inc),
    Hue(Inc),
    Saturation(Inc),
    /// Brightness
    Value(Inc),
    /// Effect animation speed
    Speed(Inc),
}

/// Actions related to mouse keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseAction {
    /// Key emulates a mouse key
    Click(MouseButton),
    /// Key performs mouse movement when held
    Move(MouseMovement),
}

/// Emulate a mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseButton {
    Left,
    Right,
    Mid,
}

/// Emulate mouse (or mouse wheel) movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MouseMovement {
    Up,
    Down,
    Left,
    Right,
    WheelUp,
    WheelDown,
}

/// Dynamic macros, recorded at runtime into one of two slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroAction {
    Record(MacroSlot),
    Play(MacroSlot),
    /// Stop recording
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MacroSlot {
    First,
    Second,
}

/// Firmware-level keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareAction {
    /// Jump to bootloader
    Bootloader,
    Reboot,
    /// Reset persisted settings
    ClearEeprom,
    /// Hold the next pressed key until it is pressed again
    KeyLock,
    DebugToggle,
    NkroToggle,
    CapsWordToggle,
}

/// Keycodes implemented by this keymap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UserAction {
    /// Toggle periodic key taps that keep the host awake
    KeepAwake,
    /// Release all keys held by key lock
    Unlock,
}

/// HID Consumer Usage Page keys
///
/// Reference: <https://usb.org/sites/default/files/hut1_2.pdf>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerKey {
    Sleep = 0x32,
    BrightnessUp = 0x6F,
    BrightnessDown = 0x70,
    NextTrack = 0xB5,
    PrevTrack = 0xB6,
    Stop = 0xB7,
    PlayPause = 0xCD,
    Mute = 0xE2,
    VolumeIncrement = 0xE9,
    VolumeDecrement = 0xEA,
    Calculator = 0x192,
    ControlPanel = 0x19F,
}

impl ConsumerKey {
    /// Usage ID to put into consumer control report
    pub const fn usage_id(self) -> u16 {
        self as u16
    }
}

impl Key {
    /// Keys that the firmware handles as plain HID keyboard keys
    pub const fn is_basic(&self) -> bool {
        matches!(self, Key::KeyCode(_))
    }
}

// keyberon's KeyCode has no defmt support, so print it as its HID usage
#[cfg(feature = "defmt")]
impl defmt::Format for Key {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Key::NoOp => defmt::write!(f, "NoOp"),
            Key::Trans => defmt::write!(f, "Trans"),
            Key::KeyCode(kc) => defmt::write!(f, "KeyCode({=u8:#x})", *kc as u8),
            Key::Consumer(key) => defmt::write!(f, "Consumer({})", key),
            Key::Layer(layer) => defmt::write!(f, "Layer({})", layer),
            Key::Custom(action) => defmt::write!(f, "Custom({})", action),
        }
    }
}

/// Standard keyboard key
pub const fn k(kc: KeyCode) -> Key {
    Key::KeyCode(kc)
}

/// Consumer page key
pub const fn c(key: ConsumerKey) -> Key {
    Key::Consumer(key)
}

/// Momentary layer
pub const fn mo(layer: Layer) -> Key {
    Key::Layer(layer)
}

/// Transparent key
pub const TRNS: Key = Key::Trans;
/// Empty key
pub const NO: Key = Key::NoOp;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_usage_ids() {
        assert_eq!(ConsumerKey::BrightnessUp.usage_id(), 0x6F);
        assert_eq!(ConsumerKey::BrightnessDown.usage_id(), 0x70);
        assert_eq!(ConsumerKey::ControlPanel.usage_id(), 0x19F);
    }

    #[test]
    fn constructors() {
        assert_eq!(k(KeyCode::A), Key::KeyCode(KeyCode::A));
        assert_eq!(c(ConsumerKey::Mute), Key::Consumer(ConsumerKey::Mute));
        assert_eq!(mo(Layer::Functions), Key::Layer(Layer::Functions));
        assert!(k(KeyCode::A).is_basic());
        assert!(!TRNS.is_basic());
        assert!(!Key::Custom(Action::User(UserAction::Unlock)).is_basic());
    }
}
