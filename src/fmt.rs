//! Logging macros
//!
//! Firmware builds log through [`defmt`], host builds through the `log` facade.
//! Without either feature the macros expand to nothing but still evaluate
//! argument references so that no "unused" warnings appear.
#![allow(unused_macros)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("features `defmt` and `log` are mutually exclusive");

macro_rules! logger {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(feature = "log")]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($( &($x) ),*);
        }
    };
}

macro_rules! trace {
    ($($args:tt)*) => { logger!(trace, $($args)*) };
}

macro_rules! debug {
    ($($args:tt)*) => { logger!(debug, $($args)*) };
}

macro_rules! info {
    ($($args:tt)*) => { logger!(info, $($args)*) };
}

macro_rules! warn {
    ($($args:tt)*) => { logger!(warn, $($args)*) };
}

macro_rules! error {
    ($($args:tt)*) => { logger!(error, $($args)*) };
}
