pub mod format;
pub mod indicators;
pub mod keys;

use std::{path::Path, fs::File, io::{Write, BufReader}};

use anyhow::{ensure, Context};
use proc_macro2::TokenStream;
use quote::{quote, ToTokens, TokenStreamExt};
use serde::{Serialize, Deserialize};
use schemars::{JsonSchema, schema_for, schema::RootSchema};

/// Number of layers of the keymap
pub const NLAYERS: usize = 4;
/// Number of physical keys in the `iso_110` layout
pub const NKEYS: usize = 110;
/// Number of rotary encoders
pub const NENCODERS: usize = 1;

/// Keymap configuration as stored in JSON
///
/// Layers list keys in physical order (left to right, top to bottom) and are placed
/// on the key matrix by `crate::bsp::iso_110` in the generated code.
#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
pub struct KeymapConfig {
    layers: keys::Layers,
    encoders: keys::Encoders,
    indicators: indicators::IndicatorConfig,
    keep_awake_interval: u32,
}

impl ToTokens for KeymapConfig {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let layers = keys::layers_to_tokens(&self.layers);
        let encoders = keys::encoders_to_tokens(&self.encoders);
        let indicators = &self.indicators;
        let keep_awake_interval = &self.keep_awake_interval;
        tokens.append_all(quote! {
            crate::keyboard::KeymapConfig {
                layers: &#layers,
                encoders: &#encoders,
                indicators: #indicators,
                keep_awake_interval: #keep_awake_interval,
            }
        })
    }
}

impl KeymapConfig {
    /// Check dimensions that the firmware types require
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.layers.len() == NLAYERS, "Expected {} layers, got {}", NLAYERS, self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            ensure!(layer.len() == NKEYS, "Layer {} has {} keys, expected {}", i, layer.len(), NKEYS);
        }
        ensure!(self.encoders.len() == NLAYERS, "Expected encoders for {} layers, got {}", NLAYERS, self.encoders.len());
        for (i, encoders) in self.encoders.iter().enumerate() {
            ensure!(encoders.len() == NENCODERS, "Layer {} has {} encoders, expected {}", i, encoders.len(), NENCODERS);
        }
        for key in self.layers.iter().flatten().chain(self.encoders.iter().flatten().flat_map(|e| [&e.ccw, &e.cw])) {
            key.validate()?;
        }
        ensure!(self.keep_awake_interval > 0, "keep_awake_interval must not be 0");
        Ok(())
    }

    fn file_tokens(&self) -> TokenStream {
        quote! {
            pub static CONFIG: crate::keyboard::KeymapConfig = #self;
        }
    }

    fn to_string_pretty(&self) -> anyhow::Result<String> {
        let file = self.file_tokens();
        format::pretty_file(file)
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        let code = self.to_string_pretty()?;
        file.write_all(code.as_bytes())?;
        Ok(())
    }

    /// Read configuration from JSON file and validate it
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let config: Self = serde_json::from_reader(&mut reader)?;
        config.validate().context("Invalid keymap")?;
        Ok(config)
    }

    pub fn schema() -> RootSchema {
        schema_for!(Self)
    }

    pub fn schema_to_file(path: &Path) -> anyhow::Result<()> {
        let mut file = File::create(path)?;
        let schema = Self::schema();
        let string = serde_json::to_string_pretty(&schema)?;
        file.write_all(string.as_bytes())?;
        Ok(())
    }
}

/// Implement ToTokens for a simple enum with variants without data.
#[macro_export]
macro_rules! impl_enum_to_tokens {
    ( $( enum $enum:ident: $path:path ),* $(,)? ) => {
        $(
            impl ToTokens for $enum {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    let v = serde_json::to_value(self).unwrap();
                    let s = v.as_str().unwrap();
                    let i = Ident::new(s, Span::call_site());
                    tokens.append_all(quote! { $path::#i });
                }
            }
        )*
    };
}

/// Implement ToTokens for an enum with unit variants and single-field tuple variants
///
/// Each tuple variant names its field so that it can be used in `quote!`, e.g.
/// `enum Foo: crate::Foo { Unit, Tuple(inner) }`.
#[macro_export]
macro_rules! impl_enum_tuple_to_tokens {
    ( $( enum $enum:ident: $path:path { $( $variant:ident $( ( $field:ident ) )? ),* $(,)? } )* ) => {
        $(
            impl ToTokens for $enum {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    tokens.append_all(match self {
                        $(
                            $enum::$variant $( ($field) )? => quote! { $path::$variant $( ( #$field ) )? },
                        )*
                    });
                }
            }
        )*
    };
}

/// Implement ToTokens for a regular struct
///
/// Generates implementations of ToTokens for a list of structs. Will use $path
/// as the name of struct in generated tokens. Each field in struct def has to
/// end with a comma (even the last one).
#[macro_export]
macro_rules! impl_struct_to_tokens {
    ( $( struct $struct:ident: $path:path { $( $field:ident, )* } )* ) => {
        $(
            impl ToTokens for $struct {
                fn to_tokens(&self, tokens: &mut TokenStream) {
                    $( let $field = &self.$field; )*
                    tokens.append_all(quote! {
                        $path { $( $field: #$field, )* }
                    });
                }
            }
        )*
    };
}

#[cfg(test)]
mod tests {
    use crate::format::assert_tokens_eq;

    use super::*;

    pub fn example_json() -> serde_json::Value {
        serde_json::json!({
            "layers": keys::tests::example_json(),
            "encoders": keys::tests::example_encoders_json(),
            "indicators": indicators::tests::example_json(),
            "keep_awake_interval": 60000u32
        })
    }

    pub fn example_config() -> KeymapConfig {
        KeymapConfig {
            layers: keys::tests::example_config(),
            encoders: keys::tests::example_encoders_config(),
            indicators: indicators::tests::example_config(),
            keep_awake_interval: 60000,
        }
    }

    pub fn example_code() -> TokenStream {
        let layers = keys::tests::example_code();
        let encoders = keys::tests::example_encoders_code();
        let indicators = indicators::tests::example_code();
        quote! {
            crate::keyboard::KeymapConfig {
                layers: &#layers,
                encoders: &#encoders,
                indicators: #indicators,
                keep_awake_interval: 60000u32,
            }
        }
    }

    fn full_config() -> KeymapConfig {
        let encoder = keys::Encoder { ccw: keys::Key::Trans, cw: keys::Key::Trans };
        KeymapConfig {
            layers: vec![vec![keys::Key::Trans; NKEYS]; NLAYERS],
            encoders: vec![vec![encoder; NENCODERS]; NLAYERS],
            indicators: indicators::tests::example_config(),
            keep_awake_interval: 1000,
        }
    }

    #[test]
    fn deserialize() -> anyhow::Result<()> {
        let config: KeymapConfig = serde_json::from_value(example_json())?;
        assert_eq!(config, example_config());
        Ok(())
    }

    #[test]
    fn tokenize() {
        let config = example_config();
        assert_tokens_eq(quote! { #config }, example_code())
    }

    #[test]
    fn validate_dimensions() {
        assert!(full_config().validate().is_ok());
        assert!(example_config().validate().is_err());

        let mut config = full_config();
        config.layers[2].pop();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Layer 2 has 109 keys, expected 110");

        let mut config = full_config();
        config.encoders.pop();
        assert!(config.validate().is_err());

        let mut config = full_config();
        config.keep_awake_interval = 0;
        assert!(config.validate().is_err());

        let mut config = full_config();
        config.layers[0][5] = keys::Key::KeyCode(keys::KeyCode("Not A Key".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn generated_file_parses() -> anyhow::Result<()> {
        let code = full_config().to_string_pretty()?;
        assert!(code.starts_with("pub static CONFIG: crate::keyboard::KeymapConfig ="));
        assert!(code.contains("crate::bsp::iso_110("));
        Ok(())
    }

    #[test]
    fn repository_keymap() -> anyhow::Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../keymap.json");
        let config = KeymapConfig::from_file(&path)?;
        assert_eq!(config.keep_awake_interval, 60000);
        Ok(())
    }

    #[test]
    fn schema() -> anyhow::Result<()> {
        let schema = serde_json::to_value(KeymapConfig::schema())?;
        let defs = schema["definitions"].as_object().unwrap();
        for name in ["Key", "CustomAction", "IndicatorConfig", "RGB8"] {
            assert!(defs.contains_key(name), "Missing definition of {}", name);
        }
        Ok(())
    }
}
