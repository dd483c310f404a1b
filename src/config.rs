//! Keymap configuration

#[cfg(feature = "json-config")]
pub use generated::CONFIG;

#[cfg(not(feature = "json-config"))]
pub use code::CONFIG;

#[cfg(feature = "json-config")]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}

#[cfg(not(feature = "json-config"))]
mod code {
    use keyberon::key_code::KeyCode::*;
    use rgb::RGB8;

    use crate::bsp::iso_110;
    use crate::keyboard::KeymapConfig;
    use crate::keyboard::actions::*;
    use crate::keyboard::keep_awake::KEEP_AWAKE_INTERVAL_MS;
    use crate::keyboard::layers::{EncoderMap, Layer, Layers};
    use crate::keyboard::leds::IndicatorConfig;

    pub static CONFIG: KeymapConfig = KeymapConfig {
        layers: &LAYERS,
        encoders: &ENCODERS,
        indicators: INDICATORS,
        keep_awake_interval: KEEP_AWAKE_INTERVAL_MS,
    };

    const FN: Key = mo(Layer::Functions);
    const MCR: Key = mo(Layer::Macros);

    const MUTE: Key = c(ConsumerKey::Mute);
    const VOLU: Key = c(ConsumerKey::VolumeIncrement);
    const VOLD: Key = c(ConsumerKey::VolumeDecrement);
    const MPRV: Key = c(ConsumerKey::PrevTrack);
    const MPLY: Key = c(ConsumerKey::PlayPause);
    const MNXT: Key = c(ConsumerKey::NextTrack);
    const BRIU: Key = c(ConsumerKey::BrightnessUp);
    const BRID: Key = c(ConsumerKey::BrightnessDown);
    const CPNL: Key = c(ConsumerKey::ControlPanel);
    const CALC: Key = c(ConsumerKey::Calculator);
    const SLEP: Key = c(ConsumerKey::Sleep);

    const fn rgb(action: RgbAction) -> Key {
        Key::Custom(Action::Rgb(action))
    }

    const RGB_TOG: Key = rgb(RgbAction::Toggle);
    const RGB_MOD: Key = rgb(RgbAction::Mode(Inc::Up));
    const RGB_RMOD: Key = rgb(RgbAction::Mode(Inc::Down));
    const RGB_HUI: Key = rgb(RgbAction::Hue(Inc::Up));
    const RGB_HUD: Key = rgb(RgbAction::Hue(Inc::Down));
    const RGB_SAI: Key = rgb(RgbAction::Saturation(Inc::Up));
    const RGB_SAD: Key = rgb(RgbAction::Saturation(Inc::Down));
    const RGB_VAI: Key = rgb(RgbAction::Value(Inc::Up));
    const RGB_VAD: Key = rgb(RgbAction::Value(Inc::Down));
    const RGB_SPI: Key = rgb(RgbAction::Speed(Inc::Up));
    const RGB_SPD: Key = rgb(RgbAction::Speed(Inc::Down));

    const DM_REC1: Key = Key::Custom(Action::Macro(MacroAction::Record(MacroSlot::First)));
    const DM_REC2: Key = Key::Custom(Action::Macro(MacroAction::Record(MacroSlot::Second)));
    const DM_PLY1: Key = Key::Custom(Action::Macro(MacroAction::Play(MacroSlot::First)));
    const DM_PLY2: Key = Key::Custom(Action::Macro(MacroAction::Play(MacroSlot::Second)));
    const DM_RSTP: Key = Key::Custom(Action::Macro(MacroAction::Stop));

    const BTN1: Key = Key::Custom(Action::Mouse(MouseAction::Click(MouseButton::Left)));
    const BTN2: Key = Key::Custom(Action::Mouse(MouseAction::Click(MouseButton::Right)));
    const MS_U: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::Up)));
    const MS_D: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::Down)));
    const MS_L: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::Left)));
    const MS_R: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::Right)));
    const WH_U: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::WheelUp)));
    const WH_D: Key = Key::Custom(Action::Mouse(MouseAction::Move(MouseMovement::WheelDown)));

    const BOOT: Key = Key::Custom(Action::Firmware(FirmwareAction::Bootloader));
    const LOCK: Key = Key::Custom(Action::Firmware(FirmwareAction::KeyLock));
    const DB_TOGG: Key = Key::Custom(Action::Firmware(FirmwareAction::DebugToggle));
    const NK_TOGG: Key = Key::Custom(Action::Firmware(FirmwareAction::NkroToggle));
    const CW_TOGG: Key = Key::Custom(Action::Firmware(FirmwareAction::CapsWordToggle));

    const WAKE: Key = Key::Custom(Action::User(UserAction::KeepAwake));
    const UNLK: Key = Key::Custom(Action::User(UserAction::Unlock));

    const ___: Key = TRNS;

    #[rustfmt::skip]
    static LAYERS: Layers = [
        // Base
        iso_110([
            k(Escape),  k(F1),   k(F2),   k(F3),   k(F4),   k(F5),   k(F6),   k(F7),   k(F8),   k(F9),   k(F10),  k(F11),     k(F12),   MUTE,      k(PScreen), k(LockingScrollLock), k(Pause), DM_PLY1, DM_PLY2, NO, NO,
            k(Grave),   k(Kb1),  k(Kb2),  k(Kb3),  k(Kb4),  k(Kb5),  k(Kb6),  k(Kb7),  k(Kb8),  k(Kb9),  k(Kb0),  k(Minus),   k(Equal), k(BSpace), k(Insert), k(Home), k(PgUp),    k(NumLock), k(KpSlash), k(KpAsterisk), k(KpMinus),
            k(Tab),     k(Q),    k(W),    k(E),    k(R),    k(T),    k(Y),    k(U),    k(I),    k(O),    k(P),    k(LBracket), k(RBracket),          k(Delete), k(End),  k(PgDown),  k(Kp7),  k(Kp8),  k(Kp9),
            k(CapsLock), k(A),   k(S),    k(D),    k(F),    k(G),    k(H),    k(J),    k(K),    k(L),    k(SColon), k(Quote), k(NonUsHash), k(Enter),                               k(Kp4),  k(Kp5),  k(Kp6),  k(KpPlus),
            k(LShift),  k(NonUsBslash), k(Z), k(X), k(C),   k(V),    k(B),    k(N),    k(M),    k(Comma), k(Dot), k(Slash),         k(RShift),            k(Up),             k(Kp1),  k(Kp2),  k(Kp3),
            k(LCtrl),   k(LGui), k(LAlt),                   k(Space),                           k(RAlt), FN,      MCR,        k(RCtrl), k(Left), k(Down), k(Right),          k(Kp0),  k(KpDot), k(KpEnter),
        ]),
        // Special: base layer without caps lock
        iso_110([
            ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___,   ___, ___, ___,   ___, ___, ___, ___,
            ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___,   ___, ___, ___,   ___, ___, ___, ___,
            ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___,        ___, ___, ___,   ___, ___, ___,
            NO,  ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___,                    ___, ___, ___, ___,
            ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___, ___,      ___,        ___,        ___, ___, ___,
            ___, ___, ___,                ___,                ___, ___, ___, ___,   ___, ___, ___,   ___,   ___, ___,
        ]),
        // Functions
        iso_110([
            BOOT,    BRID, BRIU, CPNL,    CALC, RGB_VAD, RGB_VAI, MPRV,    MPLY, MNXT, MUTE, VOLD, VOLU, RGB_TOG,   SLEP, UNLK, RGB_MOD,   DM_REC1, DM_REC2, LOCK,    WAKE,
            NO,      NO,   NO,   NO,      NO,   NO,      NO,      NO,      NO,   NO,   NO,   NO,   NO,   NO,        NO,   NO,   WH_U,      NO,      RGB_RMOD, RGB_MOD, RGB_SPD,
            RGB_TOG, NO,   NO,   NO,      NO,   NO,      NO,      NO,      NO,   NO,   NO,   NO,   NO,              NO,   NO,   WH_D,      NO,      RGB_HUI, NO,
            CW_TOGG, NO,   NO,   DB_TOGG, NO,   NO,      NO,      NO,      NO,   NO,   NO,   NO,   NO,   BTN1,                            RGB_SAD, NO,      RGB_SAI, RGB_SPI,
            NO,      NO,   NO,   NO,      NO,   NO,      NO,      NK_TOGG, NO,   NO,   NO,   NO,         BTN2,            MS_U,            NO,      RGB_HUD, NO,
            NO,      NO,   NO,                           NO,                     NO,   NO,   NO,   NO,        MS_L, MS_D, MS_R,      NO,      RGB_TOG, NO,
        ]),
        // Macros
        iso_110([
            DM_RSTP, k(F13), k(F14), k(F15), k(F16), k(F17), k(F18), k(F19), k(F20), k(F21), k(F22), k(F23), k(F24), NO,   NO, NO, NO,   NO, NO, NO, NO,
            NO,      NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,   NO, NO, NO,   NO, NO, NO, NO,
            NO,      NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,           NO, NO, NO,   NO, NO, NO,
            NO,      NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,                  NO, NO, NO, NO,
            NO,      NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,     NO,             NO,       NO,        NO, NO, NO,
            NO,      NO,     NO,                             NO,                             NO,     NO,     NO,     NO,   NO, NO, NO,   NO,   NO, NO,
        ]),
    ];

    /// Encoder actions as (counter-clockwise, clockwise)
    static ENCODERS: EncoderMap = [
        [(VOLD, VOLU)],
        [(___, ___)],
        [(RGB_VAD, RGB_VAI)],
        [(NO, NO)],
    ];

    const MAX: u8 = 255;

    const INDICATORS: IndicatorConfig = IndicatorConfig {
        navigation: RGB8::new(0, MAX, MAX),
        rgb: RGB8::new(MAX, 0, MAX),
        system: RGB8::new(MAX, 0, 0),
        user: RGB8::new(MAX, MAX / 2, 0),
        neutral: RGB8::new(MAX / 8, MAX / 8, MAX / 8),
        keep_awake: RGB8::new(MAX, MAX, MAX),
        // same key as keep-awake on the functions layer
        keep_awake_led: 20,
    };

}
