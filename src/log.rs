//! Logging facade.
//!
//! The core logic is linked both into the `no_std` firmware binary (where
//! `defmt`'s RTT logger is available) and into the host `cargo test` binary
//! (where it is not). Rather than call `defmt::info!` etc. directly and
//! force every downstream consumer to provide a global logger, transitions
//! and errors are logged through these macros, which expand to `defmt` calls
//! under the `defmt` feature and to nothing otherwise.

#[cfg(feature = "defmt")]
macro_rules! log_info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}
#[cfg(not(feature = "defmt"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "defmt")]
macro_rules! log_warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}
#[cfg(not(feature = "defmt"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "defmt")]
macro_rules! log_error {
    ($($arg:tt)*) => { defmt::error!($($arg)*) };
}
#[cfg(not(feature = "defmt"))]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

pub(crate) use log_error;
pub(crate) use log_info;
pub(crate) use log_warn;
