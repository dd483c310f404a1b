//! Layer state and keymap lookup

use serde::{Deserialize, Serialize};
use postcard::experimental::max_size::MaxSize;

use crate::bsp::{MATRIX_COLS, MATRIX_ROWS, NENCODERS};
use super::actions::Key;

pub const NLAYERS: usize = 4;

/// Key table of all layers, indexed by `[layer][row][col]`
pub type Layers = [[[Key; MATRIX_COLS]; MATRIX_ROWS]; NLAYERS];

/// Encoder actions of all layers as `(counter-clockwise, clockwise)` pairs
pub type EncoderMap = [[(Key, Key); NENCODERS]; NLAYERS];

/// Keymap layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, MaxSize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Layer {
    /// Default typing layer
    Base = 0,
    /// Alternative default layer selected with the DIP switch
    Special = 1,
    /// Held with the Fn key
    Functions = 2,
    /// Held with the macro key
    Macros = 3,
}

impl Layer {
    pub const ALL: [Layer; NLAYERS] = [Layer::Base, Layer::Special, Layer::Functions, Layer::Macros];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Layer::Base),
            1 => Some(Layer::Special),
            2 => Some(Layer::Functions),
            3 => Some(Layer::Macros),
            _ => None,
        }
    }

    /// Overlay layers are only reached by holding a key, never set as default
    pub const fn is_overlay(self) -> bool {
        matches!(self, Layer::Functions | Layer::Macros)
    }

    const fn mask(self) -> u32 {
        1 << self as u32
    }
}

/// Active layers and default layers as bitmasks
///
/// The effective state is the union of both, lookups start from the highest layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerState {
    active: u32,
    default: u32,
}

impl LayerState {
    pub const fn new(default: Layer) -> Self {
        Self { active: 0, default: default.mask() }
    }

    /// Turn a layer on, returns true if the state changed
    pub fn layer_on(&mut self, layer: Layer) -> bool {
        let prev = self.active;
        self.active |= layer.mask();
        prev != self.active
    }

    /// Turn a layer off, returns true if the state changed
    pub fn layer_off(&mut self, layer: Layer) -> bool {
        let prev = self.active;
        self.active &= !layer.mask();
        prev != self.active
    }

    /// Replace the default layer, returns true if the state changed
    pub fn set_default(&mut self, layer: Layer) -> bool {
        let prev = self.default;
        self.default = layer.mask();
        prev != self.default
    }

    pub fn is_active(&self, layer: Layer) -> bool {
        (self.active | self.default) & layer.mask() != 0
    }

    /// Highest of the active and default layers
    pub fn highest(&self) -> Layer {
        let state = self.active | self.default;
        let highest = (u32::BITS - 1).saturating_sub(state.leading_zeros()) as usize;
        Layer::from_index(highest).unwrap_or(Layer::Base)
    }

    /// Highest of the default layers
    pub fn default_layer(&self) -> Layer {
        let highest = (u32::BITS - 1).saturating_sub(self.default.leading_zeros()) as usize;
        Layer::from_index(highest).unwrap_or(Layer::Base)
    }

    /// Active layers from the highest to the lowest
    pub fn iter_active(&self) -> impl Iterator<Item = Layer> + '_ {
        Layer::ALL.into_iter().rev().filter(move |layer| self.is_active(*layer))
    }

    pub fn raw(&self) -> u32 {
        self.active
    }
}

/// Find the key for a matrix position, skipping transparent entries
///
/// Returns the layer that provided the key. When all active layers are transparent
/// the key from [`Layer::Base`] is used, even if that layer is not active, so that
/// a fully transparent default layer behaves like the base one.
pub fn resolve(layers: &Layers, state: &LayerState, row: u8, col: u8) -> (Layer, Key) {
    let (row, col) = (row as usize, col as usize);
    if row >= MATRIX_ROWS || col >= MATRIX_COLS {
        return (Layer::Base, Key::NoOp);
    }
    let found = state.iter_active()
        .map(|layer| (layer, layers[layer.index()][row][col]))
        .find(|(_, key)| *key != Key::Trans);
    found.unwrap_or_else(|| (Layer::Base, opaque(layers[Layer::Base.index()][row][col])))
}

/// Key of the given layer, with transparent treated as no-op
pub fn key_on_layer(layers: &Layers, layer: Layer, row: u8, col: u8) -> Key {
    layers[layer.index()]
        .get(row as usize)
        .and_then(|keys| keys.get(col as usize))
        .map_or(Key::NoOp, |key| opaque(*key))
}

fn opaque(key: Key) -> Key {
    match key {
        Key::Trans => Key::NoOp,
        key => key,
    }
}

/// Find the encoder action for the current layer state, same rules as [`resolve`]
pub fn resolve_encoder(encoders: &EncoderMap, state: &LayerState, index: u8, clockwise: bool) -> Key {
    let index = index as usize;
    if index >= NENCODERS {
        return Key::NoOp;
    }
    let select = |(ccw, cw): (Key, Key)| if clockwise { cw } else { ccw };
    state.iter_active()
        .map(|layer| select(encoders[layer.index()][index]))
        .find(|key| *key != Key::Trans)
        .unwrap_or_else(|| opaque(select(encoders[Layer::Base.index()][index])))
}

/// Layer that was used to resolve each key when it was pressed
///
/// Releases must be resolved on the same layer as the press, or a key pressed on an
/// overlay layer would never be released after the overlay is turned off.
pub struct SourceLayers {
    layers: [[Layer; MATRIX_COLS]; MATRIX_ROWS],
}

impl SourceLayers {
    pub const fn new() -> Self {
        Self { layers: [[Layer::Base; MATRIX_COLS]; MATRIX_ROWS] }
    }

    pub fn set(&mut self, row: u8, col: u8, layer: Layer) {
        if let Some(entry) = self.layers.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            *entry = layer;
        }
    }

    pub fn get(&self, row: u8, col: u8) -> Layer {
        self.layers.get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
            .unwrap_or(Layer::Base)
    }
}

impl Default for SourceLayers {
    fn default() -> Self {
        Self::new()
    }
}
