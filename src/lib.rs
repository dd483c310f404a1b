#![no_std]

// Use std when running tests, see: https://stackoverflow.com/a/28186509
#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod bsp;
pub mod config;
pub mod host;
pub mod keyboard;
pub mod settings;

/// Build metadata generated by `built`
pub mod build_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub use host::Host;
pub use keyboard::{Keyboard, KeymapConfig};
pub use settings::Settings;
