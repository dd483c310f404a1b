use proc_macro2::TokenStream;
use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::JsonSchema;

use crate::impl_struct_to_tokens;

/// Colours of the indicator pass on overlay layers
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct IndicatorConfig {
    /// Mouse keys and cursor movement
    navigation: RGB8,
    /// RGB matrix control
    rgb: RGB8,
    /// Bootloader, reset and key lock
    system: RGB8,
    /// Keep-awake and unlock
    user: RGB8,
    /// All other keys that are not transparent
    neutral: RGB8,
    /// Colour of the keep-awake LED on base layers
    keep_awake: RGB8,
    /// LED number used to show that keep-awake is running
    keep_awake_led: u8,
}

/// Colour as `[r, g, b]`
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq, Clone)]
pub struct RGB8(u8, u8, u8);

impl_struct_to_tokens! {
    struct IndicatorConfig: crate::keyboard::leds::IndicatorConfig {
        navigation, rgb, system, user, neutral, keep_awake, keep_awake_led,
    }
}

impl ToTokens for RGB8 {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let RGB8(r, g, b) = self;
        tokens.append_all(quote! {
            rgb::RGB8::new(#r, #g, #b)
        })
    }
}
