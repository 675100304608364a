//! Core logic for a serial-controlled embedded sensor interface module.
//!
//! This crate is the platform-independent heart of the module: the wire
//! protocol codec (`frame`, `parser`, `encoder`), the request dispatcher
//! (`dispatcher`), the tick-driven lifecycle state machine (`lifecycle`), and
//! the parameter store / sensor sampling surface (`params`, `sensor`) they
//! all sit on top of. Everything platform-specific — the real clock, the
//! UART byte sink/source, interrupt wiring — is named only at the trait
//! boundary in `env` and supplied by the `sensor-module` firmware binary
//! (see `src/bin/sensor_module.rs`, built with the `firmware` feature).
//!
//! The crate builds `no_std` in the firmware configuration and falls back to
//! `std` under `cfg(test)` so the whole thing is exercised with plain
//! `cargo test` on the host.
#![cfg_attr(not(test), no_std)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

pub mod controller;
pub mod crc;
pub mod dispatcher;
pub mod encoder;
pub mod env;
pub mod frame;
pub mod lifecycle;
pub mod params;
pub mod parser;
pub mod sensor;

pub use controller::Controller;
pub use env::{ByteSink, ByteSource, Clock, SinkError};
