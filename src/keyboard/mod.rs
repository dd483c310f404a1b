//! Keymap logic
//!
//! Resolves key events on the layer tables and implements the keymap hooks called
//! by the host firmware: custom keycodes, DIP switch, layer changes and RGB indicators.
//! All state lives in [`Keyboard`], the firmware calls it from a single context.

/// Keycodes and special keyboard actions
pub mod actions;
pub mod deferred;
pub mod keep_awake;
pub mod key_lock;
pub mod layers;
/// RGB matrix configuration and indicator colours
pub mod leds;

use core::ops::Range;

use keyberon::layout::Event;

use crate::host::Host;
use crate::settings::Settings;
use actions::{Action, Key, UserAction};
use deferred::Deferred;
use keep_awake::KeepAwake;
use key_lock::KeyLock;
use layers::{EncoderMap, Layer, LayerState, Layers, SourceLayers};
use leds::{Hsv, IndicatorConfig, RgbMode};

/// Keymap configuration
pub struct KeymapConfig {
    /// Key tables of all layers
    pub layers: &'static Layers,
    /// Encoder actions of all layers
    pub encoders: &'static EncoderMap,
    /// Colours of the indicator pass
    pub indicators: IndicatorConfig,
    /// Period of keep-awake key taps in milliseconds
    pub keep_awake_interval: u32,
}

/// Tasks scheduled for deferred execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    KeepAwake,
}

/// Keymap state
pub struct Keyboard {
    config: &'static KeymapConfig,
    layers: LayerState,
    sources: SourceLayers,
    deferred: Deferred<Task>,
    keep_awake: KeepAwake,
    key_lock: KeyLock,
    override_indicators: bool,
}

impl Keyboard {
    /// Create keymap state using persisted `settings`
    pub fn new(config: &'static KeymapConfig, settings: &Settings) -> Self {
        info!("q6-keymap {} (default layer {:?})", crate::build_info::PKG_VERSION, settings.default_layer);
        Self {
            config,
            layers: LayerState::new(settings.default_layer),
            sources: SourceLayers::new(),
            deferred: Deferred::new(),
            keep_awake: KeepAwake::new(config.keep_awake_interval),
            key_lock: KeyLock::new(),
            override_indicators: false,
        }
    }

    pub fn layer_state(&self) -> &LayerState {
        &self.layers
    }

    pub fn keep_awake_active(&self) -> bool {
        self.keep_awake.is_active()
    }

    pub fn indicators_overridden(&self) -> bool {
        self.override_indicators
    }

    pub fn key_lock(&self) -> &KeyLock {
        &self.key_lock
    }

    /// Handle key press/release from the matrix, `now` is current time in milliseconds
    pub fn event(&mut self, event: Event, now: u32, host: &mut impl Host) {
        let (row, col, pressed) = match event {
            Event::Press(row, col) => (row, col, true),
            Event::Release(row, col) => (row, col, false),
        };
        let key = if pressed {
            let (layer, key) = layers::resolve(self.config.layers, &self.layers, row, col);
            self.sources.set(row, col, layer);
            key
        } else {
            let layer = self.sources.get(row, col);
            layers::key_on_layer(self.config.layers, layer, row, col)
        };
        trace!("Key {:?} pressed={}", key, pressed);
        self.process(key, pressed, now, host);
    }

    /// Handle encoder rotation as a tap of the key mapped on the current layer
    pub fn encoder(&mut self, index: u8, clockwise: bool, now: u32, host: &mut impl Host) {
        let key = layers::resolve_encoder(self.config.encoders, &self.layers, index, clockwise);
        self.process(key, true, now, host);
        self.process(key, false, now, host);
    }

    /// Run deferred tasks, should be called periodically
    pub fn tick(&mut self, now: u32, host: &mut impl Host) {
        let keep_awake = &mut self.keep_awake;
        self.deferred.poll(now, |task, _trigger| match task {
            Task::KeepAwake => keep_awake.fire(&mut *host),
        });
    }

    fn process(&mut self, key: Key, pressed: bool, now: u32, host: &mut impl Host) {
        if !self.key_lock.process(key, pressed) {
            return;
        }
        if !self.process_user(key, pressed, now, host) {
            return;
        }
        match key {
            Key::NoOp | Key::Trans => {},
            Key::Layer(layer) => {
                let changed = if pressed {
                    self.layers.layer_on(layer)
                } else {
                    self.layers.layer_off(layer)
                };
                if changed {
                    self.layer_state_changed(host);
                }
            },
            key => host.process_key(key, pressed),
        }
    }

    /// Custom keycode handling, returns false if the key must not be processed further
    pub fn process_user(&mut self, key: Key, pressed: bool, now: u32, host: &mut impl Host) -> bool {
        match key {
            Key::Custom(Action::User(UserAction::KeepAwake)) => {
                if pressed {
                    self.keep_awake.toggle(now, &mut self.deferred, Task::KeepAwake);
                }
                false
            },
            Key::Custom(Action::User(UserAction::Unlock)) => {
                if pressed {
                    self.key_lock.unlock_all(host);
                }
                false
            },
            Key::Custom(Action::Rgb(_)) => {
                // let the effect changed by this key show on overlay layers
                if self.override_indicators {
                    debug!("Indicator override disabled");
                }
                self.override_indicators = false;
                true
            },
            _ => true,
        }
    }

    /// DIP switch changed: select default layer and persist it
    ///
    /// Always returns false so that the firmware skips its own DIP switch handling.
    pub fn dip_switch(&mut self, _index: u8, active: bool, host: &mut impl Host) -> bool {
        let layer = if active { Layer::Special } else { Layer::Base };
        info!("DIP event: Switching to {:?} layer", layer);
        host.set_persistent_default_layer(layer);
        // only swaps the base layers, overlays on top stay as they are
        self.layers.set_default(layer);
        false
    }

    /// Update indicator state and RGB effect for the current highest layer
    ///
    /// Overlay layers turn on the indicator override and switch off effects that would
    /// draw over the indicators, without saving that to persistent storage. Base layers
    /// restore the persisted RGB configuration.
    pub fn layer_state_changed(&mut self, host: &mut impl Host) {
        let highest = self.layers.highest();
        debug!("Layer changed: {:?}", highest);
        if highest.is_overlay() {
            self.override_indicators = true;
            let rgb = host.rgb_config();
            if !rgb.mode.is_overlay_compatible() {
                debug!("Disabling RGB effect {:?}", rgb.mode);
                host.set_rgb_mode_noeeprom(RgbMode::SolidColor);
                host.set_rgb_hsv_noeeprom(Hsv::OFF);
            }
        } else {
            host.reload_rgb_from_eeprom();
            self.override_indicators = false;
        }
    }

    /// Indicator pass for LEDs in range `leds`
    ///
    /// Returns true if the LEDs have been fully handled and the firmware should not
    /// draw its own indicators.
    pub fn indicators(&mut self, leds: Range<u8>, host: &mut impl Host) -> bool {
        let highest = self.layers.highest();
        let config = &self.config.indicators;
        if highest.is_overlay() {
            if !self.override_indicators {
                return false;
            }
            let layer = &self.config.layers[highest.index()];
            leds::render(layer, leds, config, host);
            true
        } else {
            if self.keep_awake.is_active() && leds.contains(&config.keep_awake_led) {
                host.set_led_color(config.keep_awake_led, config.keep_awake);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::boxed::Box;
    use std::vec::Vec;

    use super::*;
    use crate::bsp::{led_index, NLEDS};
    use crate::config::CONFIG;
    use crate::host::mock::{HostEvent, MockHost};
    use actions::{c, k, ConsumerKey, Inc, KeyCode, RgbAction};
    use keep_awake::KEEP_AWAKE_KEY;
    use leds::RgbConfig;

    const FN: (u8, u8) = (5, 11);
    const MACROS: (u8, u8) = (5, 12);
    const KEY_LOCK: (u8, u8) = (0, 19);
    const WAKE: (u8, u8) = (0, 20);
    const UNLOCK: (u8, u8) = (0, 15);

    fn init_logger() {
        let _ = env_logger::builder().filter_level(log::LevelFilter::Trace).is_test(true).try_init();
    }

    fn keyboard() -> Keyboard {
        init_logger();
        Keyboard::new(&CONFIG, &Settings::default())
    }

    fn press(kb: &mut Keyboard, host: &mut MockHost, (row, col): (u8, u8)) {
        kb.event(Event::Press(row, col), 0, host);
    }

    fn release(kb: &mut Keyboard, host: &mut MockHost, (row, col): (u8, u8)) {
        kb.event(Event::Release(row, col), 0, host);
    }

    fn tap(kb: &mut Keyboard, host: &mut MockHost, pos: (u8, u8)) {
        press(kb, host, pos);
        release(kb, host, pos);
    }

    /// Tap a key on the functions layer
    fn fn_tap(kb: &mut Keyboard, host: &mut MockHost, pos: (u8, u8)) {
        press(kb, host, FN);
        tap(kb, host, pos);
        release(kb, host, FN);
    }

    fn keep_awake_taps(host: &MockHost) -> usize {
        host.keys().iter().filter(|k| **k == (KEEP_AWAKE_KEY, true)).count()
    }

    fn run(kb: &mut Keyboard, host: &mut MockHost, from: u32, to: u32) {
        for now in (from..to).step_by(100) {
            kb.tick(now, host);
        }
    }

    #[test]
    fn basic_keys() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        tap(&mut kb, &mut host, (0, 0));
        tap(&mut kb, &mut host, (3, 13));
        assert_eq!(host.keys(), [
            (k(KeyCode::Escape), true),
            (k(KeyCode::Escape), false),
            (k(KeyCode::Enter), true),
            (k(KeyCode::Enter), false),
        ]);
    }

    #[test]
    fn release_on_layer_of_press() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        press(&mut kb, &mut host, FN);
        press(&mut kb, &mut host, (0, 1));
        release(&mut kb, &mut host, FN);
        release(&mut kb, &mut host, (0, 1));
        assert_eq!(host.keys(), [
            (c(ConsumerKey::BrightnessDown), true),
            (c(ConsumerKey::BrightnessDown), false),
        ]);
    }

    #[test]
    fn macros_layer() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        press(&mut kb, &mut host, MACROS);
        assert_eq!(kb.layer_state().highest(), Layer::Macros);
        tap(&mut kb, &mut host, (0, 1));
        // empty position
        tap(&mut kb, &mut host, (1, 1));
        release(&mut kb, &mut host, MACROS);
        assert_eq!(kb.layer_state().highest(), Layer::Base);
        assert_eq!(host.keys(), [(k(KeyCode::F13), true), (k(KeyCode::F13), false)]);
    }

    #[test]
    fn keep_awake_taps_every_interval() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        fn_tap(&mut kb, &mut host, WAKE);
        assert!(kb.keep_awake_active());
        assert!(host.keys().is_empty(), "keep-awake key must be swallowed");

        run(&mut kb, &mut host, 0, 60_000);
        assert_eq!(keep_awake_taps(&host), 0);
        run(&mut kb, &mut host, 60_000, 180_001);
        assert_eq!(keep_awake_taps(&host), 3);
    }

    #[test]
    fn keep_awake_toggle_twice_cancels() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        fn_tap(&mut kb, &mut host, WAKE);
        run(&mut kb, &mut host, 0, 70_000);
        assert_eq!(keep_awake_taps(&host), 1);

        fn_tap(&mut kb, &mut host, WAKE);
        assert!(!kb.keep_awake_active());
        run(&mut kb, &mut host, 70_000, 600_000);
        assert_eq!(keep_awake_taps(&host), 1);

        // toggled twice without any firing
        let mut host = MockHost::new();
        fn_tap(&mut kb, &mut host, WAKE);
        fn_tap(&mut kb, &mut host, WAKE);
        assert!(!kb.keep_awake_active());
        run(&mut kb, &mut host, 0, 600_000);
        assert_eq!(keep_awake_taps(&host), 0);
    }

    #[test]
    fn unlock_clears_key_lock() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        fn_tap(&mut kb, &mut host, KEY_LOCK);
        assert!(kb.key_lock().is_watching());
        tap(&mut kb, &mut host, (3, 1));
        assert_eq!(host.keys(), [(k(KeyCode::A), true)], "locked key must stay pressed");
        assert_eq!(kb.key_lock().locked(), &[KeyCode::A]);

        host.clear();
        fn_tap(&mut kb, &mut host, UNLOCK);
        assert!(kb.key_lock().locked().is_empty());
        assert_eq!(host.keys(), [(k(KeyCode::A), false)]);
    }

    #[test]
    fn unlock_stops_watching() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        fn_tap(&mut kb, &mut host, KEY_LOCK);
        fn_tap(&mut kb, &mut host, UNLOCK);
        assert!(!kb.key_lock().is_watching());
        tap(&mut kb, &mut host, (3, 1));
        assert_eq!(host.keys(), [(k(KeyCode::A), true), (k(KeyCode::A), false)]);
    }

    #[test]
    fn dip_switch_sets_default_layer() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        assert!(!kb.dip_switch(0, true, &mut host));
        assert_eq!(host.default_layer, Some(Layer::Special));
        assert_eq!(kb.layer_state().default_layer(), Layer::Special);

        // transparent keys come from the base layer, caps lock is disabled
        tap(&mut kb, &mut host, (3, 0));
        tap(&mut kb, &mut host, (3, 1));
        assert_eq!(host.keys(), [(k(KeyCode::A), true), (k(KeyCode::A), false)]);

        assert!(!kb.dip_switch(0, false, &mut host));
        assert_eq!(host.default_layer, Some(Layer::Base));
        assert_eq!(kb.layer_state().default_layer(), Layer::Base);
        host.clear();
        tap(&mut kb, &mut host, (3, 0));
        assert_eq!(host.keys(), [(k(KeyCode::CapsLock), true), (k(KeyCode::CapsLock), false)]);
    }

    #[test]
    fn dip_switch_keeps_runtime_rgb() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        // changed without saving
        host.rgb.mode = RgbMode::Breathing;

        kb.dip_switch(0, true, &mut host);
        assert_eq!(host.events, [HostEvent::DefaultLayer(Layer::Special)]);
        assert_eq!(host.rgb.mode, RgbMode::Breathing);

        // with an overlay held the override stays on
        host.events.clear();
        press(&mut kb, &mut host, FN);
        assert!(kb.indicators_overridden());
        kb.dip_switch(0, false, &mut host);
        assert_eq!(host.events.last(), Some(&HostEvent::DefaultLayer(Layer::Base)));
        assert!(!host.events.contains(&HostEvent::RgbReload));
        assert!(kb.indicators_overridden());
    }

    #[test]
    fn overlay_disables_incompatible_effect() {
        let mut kb = keyboard();
        let rgb = RgbConfig { mode: RgbMode::CycleLeftRight, ..Default::default() };
        let mut host = MockHost::with_rgb(rgb);
        let persisted = host.eeprom.clone();

        press(&mut kb, &mut host, FN);
        assert!(kb.indicators_overridden());
        assert_eq!(host.events, [HostEvent::RgbMode(RgbMode::SolidColor), HostEvent::RgbHsv(Hsv::OFF)]);
        assert_eq!(host.eeprom, persisted, "override must not be persisted");

        release(&mut kb, &mut host, FN);
        assert!(!kb.indicators_overridden());
        assert_eq!(host.rgb, rgb);
        assert_eq!(host.rgb_bytes(), persisted);
    }

    #[test]
    fn overlay_keeps_compatible_effect() {
        let mut kb = keyboard();
        let rgb = RgbConfig { mode: RgbMode::TypingHeatmap, ..Default::default() };
        let mut host = MockHost::with_rgb(rgb);
        press(&mut kb, &mut host, MACROS);
        assert!(kb.indicators_overridden());
        assert!(host.events.is_empty());
        assert_eq!(host.rgb, rgb);
    }

    /// Keymap where the macros key is also reachable from the functions layer
    fn stacked_overlays() -> &'static KeymapConfig {
        let mut layers = Box::new(*CONFIG.layers);
        layers[Layer::Functions.index()][MACROS.0 as usize][MACROS.1 as usize] = actions::mo(Layer::Macros);
        Box::leak(Box::new(KeymapConfig {
            layers: Box::leak(layers),
            encoders: CONFIG.encoders,
            indicators: CONFIG.indicators,
            keep_awake_interval: CONFIG.keep_awake_interval,
        }))
    }

    #[test]
    fn switching_overlays_keeps_override() {
        init_logger();
        let mut kb = Keyboard::new(stacked_overlays(), &Settings::default());
        let mut host = MockHost::new();
        press(&mut kb, &mut host, FN);
        press(&mut kb, &mut host, MACROS);
        assert_eq!(kb.layer_state().highest(), Layer::Macros);
        release(&mut kb, &mut host, FN);
        assert_eq!(kb.layer_state().highest(), Layer::Macros);
        assert!(kb.indicators_overridden());
        assert!(!host.events.contains(&HostEvent::RgbReload));

        release(&mut kb, &mut host, MACROS);
        assert_eq!(kb.layer_state().highest(), Layer::Base);
        assert!(!kb.indicators_overridden());
        assert_eq!(host.events.iter().filter(|e| **e == HostEvent::RgbReload).count(), 1);
    }

    #[test]
    fn functions_layer_indicators() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        let config = &CONFIG.indicators;
        press(&mut kb, &mut host, FN);
        assert!(kb.indicators(0..NLEDS as u8, &mut host));

        let colors = [config.navigation, config.rgb, config.system, config.user, config.neutral];
        for (row, keys) in CONFIG.layers[Layer::Functions.index()].iter().enumerate() {
            for (col, key) in keys.iter().enumerate() {
                let Some(led) = led_index(row as u8, col as u8) else { continue };
                let color = host.leds[led as usize];
                match key.category() {
                    None => assert_eq!(color, None, "LED {} of {:?} must be untouched", led, key),
                    Some(category) => {
                        let color = color.unwrap();
                        assert_eq!(color, config.color(category));
                        assert_eq!(colors.iter().filter(|c| **c == color).count(), 1);
                    },
                }
            }
        }

        let led = |pos: (u8, u8)| host.leds[led_index(pos.0, pos.1).unwrap() as usize];
        assert_eq!(led((0, 0)), Some(config.system));
        assert_eq!(led(KEY_LOCK), Some(config.system));
        assert_eq!(led(WAKE), Some(config.user));
        assert_eq!(led(UNLOCK), Some(config.user));
        assert_eq!(led((0, 13)), Some(config.rgb));
        assert_eq!(led((4, 15)), Some(config.navigation));
        assert_eq!(led((0, 1)), Some(config.neutral));
        assert_eq!(led((1, 1)), None);
    }

    #[test]
    fn rgb_key_clears_override() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        press(&mut kb, &mut host, FN);
        tap(&mut kb, &mut host, (0, 13));
        assert!(!kb.indicators_overridden());
        assert!(host.keys().contains(&(Key::Custom(Action::Rgb(RgbAction::Toggle)), true)));

        host.clear();
        assert!(!kb.indicators(0..NLEDS as u8, &mut host));
        assert!(host.leds.iter().all(Option::is_none));
    }

    #[test]
    fn keep_awake_led_on_base_layer() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        let config = &CONFIG.indicators;

        assert!(!kb.indicators(0..NLEDS as u8, &mut host));
        assert!(host.leds.iter().all(Option::is_none));

        fn_tap(&mut kb, &mut host, WAKE);
        assert!(!kb.indicators(0..NLEDS as u8, &mut host));
        let lit: Vec<_> = host.leds.iter().enumerate().filter(|(_, c)| c.is_some()).collect();
        assert_eq!(lit, [(config.keep_awake_led as usize, &Some(config.keep_awake))]);

        // LED not in the requested range
        host.clear();
        assert!(!kb.indicators(30..NLEDS as u8, &mut host));
        assert!(host.leds.iter().all(Option::is_none));
    }

    #[test]
    fn encoder_actions() {
        let mut kb = keyboard();
        let mut host = MockHost::new();
        kb.encoder(0, true, 0, &mut host);
        kb.encoder(0, false, 0, &mut host);
        assert_eq!(host.keys(), [
            (c(ConsumerKey::VolumeIncrement), true),
            (c(ConsumerKey::VolumeIncrement), false),
            (c(ConsumerKey::VolumeDecrement), true),
            (c(ConsumerKey::VolumeDecrement), false),
        ]);

        // Special layer is transparent
        kb.dip_switch(0, true, &mut host);
        host.clear();
        kb.encoder(0, true, 0, &mut host);
        assert_eq!(host.keys()[0], (c(ConsumerKey::VolumeIncrement), true));

        host.clear();
        press(&mut kb, &mut host, FN);
        kb.encoder(0, true, 0, &mut host);
        assert_eq!(host.keys(), [
            (Key::Custom(Action::Rgb(RgbAction::Value(Inc::Up))), true),
            (Key::Custom(Action::Rgb(RgbAction::Value(Inc::Up))), false),
        ]);
        release(&mut kb, &mut host, FN);

        host.clear();
        press(&mut kb, &mut host, MACROS);
        kb.encoder(0, true, 0, &mut host);
        assert!(host.keys().is_empty());
    }

    #[test]
    fn starts_on_persisted_default_layer() {
        init_logger();
        let settings = Settings { default_layer: Layer::Special, ..Default::default() };
        let kb = Keyboard::new(&CONFIG, &settings);
        assert_eq!(kb.layer_state().default_layer(), Layer::Special);
    }
}
