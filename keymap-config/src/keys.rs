use proc_macro2::{TokenStream, Ident, Span};
use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;

use crate::{impl_enum_to_tokens, impl_enum_tuple_to_tokens};

/// Keys of each layer in physical order
pub type Layers = Vec<Vec<Key>>;

/// Encoder actions of each layer
pub type Encoders = Vec<Vec<Encoder>>;

pub fn layers_to_tokens(layers: &Layers) -> TokenStream {
    quote! {
        [ #( crate::bsp::iso_110([ #( #layers ),* ]) ),* ]
    }
}

pub fn encoders_to_tokens(encoders: &Encoders) -> TokenStream {
    quote! {
        [ #( [ #( #encoders ),* ] ),* ]
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum Key {
    /// Empty position
    NoOp,
    /// Use key from the next lower active layer
    Trans,
    KeyCode(KeyCode),
    Consumer(ConsumerKey),
    /// Activate layer while held
    Layer(Layer),
    Custom(Action),
}

impl Key {
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Key::KeyCode(kc) => kc.validate(),
            _ => Ok(()),
        }
    }
}

/// Name of a `keyberon::key_code::KeyCode` variant, e.g. "Kb1" or "LShift"
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[serde(transparent)]
pub struct KeyCode(pub String);

impl KeyCode {
    /// Check that the name can be used as an identifier, the compiler checks the rest
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid = self.0.chars().next().map_or(false, |c| c.is_ascii_uppercase())
            && self.0.chars().all(|c| c.is_ascii_alphanumeric());
        anyhow::ensure!(valid, "Invalid key code name: {:?}", self.0);
        Ok(())
    }
}

impl ToTokens for KeyCode {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let i = Ident::new(&self.0, Span::call_site());
        tokens.append_all(quote! { keyberon::key_code::KeyCode::#i });
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct Encoder {
    /// Counter-clockwise rotation
    pub ccw: Key,
    /// Clockwise rotation
    pub cw: Key,
}

impl ToTokens for Encoder {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let ccw = &self.ccw;
        let cw = &self.cw;
        tokens.append_all(quote! { (#ccw, #cw) });
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum Layer {
    Base,
    Special,
    Functions,
    Macros,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum ConsumerKey {
    Sleep,
    BrightnessUp,
    BrightnessDown,
    NextTrack,
    PrevTrack,
    Stop,
    PlayPause,
    Mute,
    VolumeIncrement,
    VolumeDecrement,
    Calculator,
    ControlPanel,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
#[schemars(rename = "CustomAction")]
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

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum RgbAction {
    Toggle,
    Mode(Inc),
    Hue(Inc),
    Saturation(Inc),
    Value(Inc),
    Speed(Inc),
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum MouseAction {
    Click(MouseButton),
    Move(MouseMovement),
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum MouseButton {
    Left,
    Right,
    Mid,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum MouseMovement {
    Up,
    Down,
    Left,
    Right,
    WheelUp,
    WheelDown,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum MacroAction {
    Record(MacroSlot),
    Play(MacroSlot),
    Stop,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum MacroSlot {
    First,
    Second,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum FirmwareAction {
    Bootloader,
    Reboot,
    ClearEeprom,
    KeyLock,
    DebugToggle,
    NkroToggle,
    CapsWordToggle,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum UserAction {
    /// Toggle periodic key taps that keep the host awake
    KeepAwake,
    /// Release all keys held by key lock
    Unlock,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub enum Inc {
    Up,
    Down,
}

impl_enum_to_tokens! {
    enum Layer: crate::keyboard::layers::Layer,
    enum ConsumerKey: crate::keyboard::actions::ConsumerKey,
    enum MouseButton: crate::keyboard::actions::MouseButton,
    enum MouseMovement: crate::keyboard::actions::MouseMovement,
    enum MacroSlot: crate::keyboard::actions::MacroSlot,
    enum FirmwareAction: crate::keyboard::actions::FirmwareAction,
    enum UserAction: crate::keyboard::actions::UserAction,
    enum Inc: crate::keyboard::actions::Inc,
}

impl_enum_tuple_to_tokens! {
    enum Key: crate::keyboard::actions::Key {
        NoOp, Trans, KeyCode(kc), Consumer(consumer), Layer(layer), Custom(action)
    }
    enum Action: crate::keyboard::actions::Action {
        Rgb(rgb), Mouse(mouse), Macro(m), Firmware(firmware), User(user)
    }
    enum RgbAction: crate::keyboard::actions::RgbAction {
        Toggle, Mode(inc), Hue(inc), Saturation(inc), Value(inc), Speed(inc)
    }
    enum MouseAction: crate::keyboard::actions::MouseAction { Click(button), Move(movement) }
    enum MacroAction: crate::keyboard::actions::MacroAction { Record(slot), Play(slot), Stop }
}
