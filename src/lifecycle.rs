//! Tick-driven lifecycle state machine: BOOT → INIT → RUN, with ERROR and
//! RECOVERY branches reachable from external triggers.
//!
//! `run_iteration` is the only place uptime advances and the only place
//! state transitions happen; `trigger_error`/`trigger_reset` just request a
//! transition that `run_iteration` (or, for `trigger_error`, the trigger
//! itself) carries out.

use crate::log::{log_error, log_info, log_warn};
use crate::params::ParamStore;
use crate::sensor::SensorSource;

/// `STATE_*` discriminants match the `current state` byte of STATUS_RSP
/// (§6): BOOT=0, INIT=1, RUN=2, ERROR=3, RECOVERY=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    Boot,
    Init,
    Run,
    Error,
    Recovery,
}

impl State {
    pub fn wire_value(self) -> u8 {
        match self {
            State::Boot => 0,
            State::Init => 1,
            State::Run => 2,
            State::Error => 3,
            State::Recovery => 4,
        }
    }
}

/// Generic-error bit of `error_flags`.
pub const ERROR_FLAG_GENERIC: u32 = 0x01;

/// Tick-driven lifecycle controller. Owns uptime and the error-flags
/// bitmask; sequences initialization of the parameter store and sensor
/// source it is handed at construction time.
pub struct Lifecycle {
    state: State,
    uptime_ms: u32,
    error_flags: u32,
    last_tick_ms: u64,
}

impl Lifecycle {
    /// `now_ms` seeds `last_tick_ms` so the first `run_iteration` computes a
    /// sane (non-overflowing) delta.
    pub fn new(now_ms: u64) -> Self {
        log_info!("state machine initialized in BOOT");
        Self {
            state: State::Boot,
            uptime_ms: 0,
            error_flags: 0,
            last_tick_ms: now_ms,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn uptime_ms(&self) -> u32 {
        self.uptime_ms
    }

    pub fn error_flags(&self) -> u32 {
        self.error_flags
    }

    /// Force the ERROR state. No-op if already in ERROR: the generic error
    /// flag is only ever set on the transition into ERROR, not on repeated
    /// calls.
    pub fn trigger_error(&mut self) {
        if self.state != State::Error {
            log_error!("triggering ERROR state");
            self.state = State::Error;
            self.error_flags |= ERROR_FLAG_GENERIC;
        }
    }

    /// Unconditionally request a transition to RECOVERY; the next
    /// `run_iteration` clears `error_flags` and proceeds to INIT then RUN.
    pub fn trigger_reset(&mut self) {
        log_warn!("triggering RESET -> RECOVERY state");
        self.state = State::Recovery;
    }

    /// Advance uptime by the elapsed time since the last call and run one
    /// step of the state machine. `now_ms` must come from the same
    /// monotonic clock on every call.
    pub fn run_iteration(&mut self, now_ms: u64, params: &mut ParamStore, sensor: &mut SensorSource) {
        let delta = now_ms.saturating_sub(self.last_tick_ms);
        self.uptime_ms = self.uptime_ms.saturating_add(delta as u32);
        self.last_tick_ms = now_ms;

        match self.state {
            State::Boot => self.transition_to(State::Init),
            State::Init => {
                params.init();
                sensor.init();
                self.transition_to(State::Run);
            }
            State::Run => {}
            State::Error => {}
            State::Recovery => {
                self.error_flags = 0;
                self.transition_to(State::Init);
            }
        }
    }

    fn transition_to(&mut self, next: State) {
        log_info!("lifecycle transition");
        self.state = next;
    }
}
