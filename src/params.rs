//! Validated parameter store: the module's runtime configuration surface.
//!
//! There is no filesystem or persistent storage at this layer (§1 Non-goals);
//! `ParamStore` is compiled-in defaults plus validated in-memory mutation,
//! addressed over the wire by the one-byte parameter IDs below.

use crate::log::log_info;

pub const ID_SAMPLE_RATE: u8 = 0x01;
pub const ID_STATUS_PERIOD_MS: u8 = 0x02;
pub const ID_SENSOR_ENABLE: u8 = 0x03;

const SAMPLE_RATE_DEFAULT: u16 = 100;
const SAMPLE_RATE_RANGE: core::ops::RangeInclusive<u16> = 1..=1000;

const STATUS_PERIOD_DEFAULT: u16 = 1000;
const STATUS_PERIOD_RANGE: core::ops::RangeInclusive<u16> = 100..=5000;

const SENSOR_ENABLE_DEFAULT: bool = true;

/// Fixed-schema parameter store. All fields are mutated only through the
/// validated setters below; a rejected set leaves the field unchanged.
#[derive(Debug, Clone, Copy)]
pub struct ParamStore {
    sample_rate: u16,
    status_period_ms: u16,
    sensor_enable: bool,
}

impl ParamStore {
    pub const fn new() -> Self {
        Self {
            sample_rate: SAMPLE_RATE_DEFAULT,
            status_period_ms: STATUS_PERIOD_DEFAULT,
            sensor_enable: SENSOR_ENABLE_DEFAULT,
        }
    }

    /// Reset every field to its default, discarding any prior configuration.
    pub fn init(&mut self) {
        *self = Self::new();
        log_info!("parameters initialized to defaults");
    }

    pub fn get_sample_rate(&self) -> u16 {
        self.sample_rate
    }

    /// Valid range 1..=1000 Hz. Rejects and leaves `sample_rate` unchanged
    /// otherwise.
    pub fn set_sample_rate(&mut self, rate: u16) -> bool {
        if SAMPLE_RATE_RANGE.contains(&rate) {
            self.sample_rate = rate;
            log_info!("set sample_rate = {}", rate);
            true
        } else {
            log_info!("rejected sample_rate = {}", rate);
            false
        }
    }

    pub fn get_status_period_ms(&self) -> u16 {
        self.status_period_ms
    }

    /// Valid range 100..=5000 ms. Rejects and leaves `status_period_ms`
    /// unchanged otherwise.
    pub fn set_status_period_ms(&mut self, period_ms: u16) -> bool {
        if STATUS_PERIOD_RANGE.contains(&period_ms) {
            self.status_period_ms = period_ms;
            log_info!("set status_period_ms = {}", period_ms);
            true
        } else {
            log_info!("rejected status_period_ms = {}", period_ms);
            false
        }
    }

    pub fn get_sensor_enable(&self) -> bool {
        self.sensor_enable
    }

    /// Always succeeds: there is no invalid boolean.
    pub fn set_sensor_enable(&mut self, enable: bool) -> bool {
        self.sensor_enable = enable;
        log_info!("set sensor_enable = {}", enable);
        true
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}
