//! Request dispatcher: maps a decoded frame to a handler and, where the
//! protocol calls for one, a response frame.
//!
//! This is the one place `ParamStore`, `SensorSource` and `Lifecycle` are
//! all touched from the receive path; `Controller` owns the counters and
//! increments `rx_err_cnt`/`tx_err_cnt` from what's returned here.

use crate::encoder::encode_frame;
use crate::env::{ByteSink, SinkError};
use crate::frame::{error_code, msg_type, Frame, STATUS_PAYLOAD_LEN};
use crate::lifecycle::Lifecycle;
use crate::log::log_warn;
use crate::params::{self, ParamStore};
use crate::sensor::SensorSource;

/// Outcome of dispatching one frame, reported back to `Controller` so it can
/// maintain `rx_err_cnt`.
pub enum DispatchOutcome {
    /// The request needed no reply, or a reply was sent successfully.
    Handled,
    /// The message type is not one this module understands.
    UnknownType,
    /// A reply was owed but the sink failed partway through.
    SinkFailed,
}

/// Dispatch one decoded frame. `now_ms` and `sensor_fault_flags` feed
/// STATUS_RSP; `sink` is where any response frame is written.
pub fn dispatch(
    frame: &Frame,
    params: &mut ParamStore,
    sensor: &mut SensorSource,
    lifecycle: &mut Lifecycle,
    sink: &mut impl ByteSink,
    rx_err_cnt: u32,
    tx_err_cnt: u32,
) -> DispatchOutcome {
    match frame.msg_type {
        msg_type::GET_STATUS => {
            let payload = build_status_payload(lifecycle, sensor, rx_err_cnt, tx_err_cnt);
            reply(sink, msg_type::STATUS_RSP, &payload)
        }
        msg_type::SET_PARAM => handle_set_param(&frame.payload, params, sink),
        msg_type::GET_PARAM => handle_get_param(&frame.payload, params, sink),
        msg_type::RESET_MOD => {
            lifecycle.trigger_reset();
            DispatchOutcome::Handled
        }
        _ => {
            log_warn!("unknown message type");
            DispatchOutcome::UnknownType
        }
    }
}

fn reply(sink: &mut impl ByteSink, msg_type: u8, payload: &[u8]) -> DispatchOutcome {
    match encode_frame(sink, msg_type, payload) {
        Ok(()) => DispatchOutcome::Handled,
        Err(SinkError) => DispatchOutcome::SinkFailed,
    }
}

fn build_status_payload(
    lifecycle: &Lifecycle,
    sensor: &SensorSource,
    rx_err_cnt: u32,
    tx_err_cnt: u32,
) -> [u8; STATUS_PAYLOAD_LEN] {
    let mut p = [0u8; STATUS_PAYLOAD_LEN];
    p[0] = lifecycle.state().wire_value();
    p[1..5].copy_from_slice(&lifecycle.uptime_ms().to_be_bytes());
    p[5..9].copy_from_slice(&lifecycle.error_flags().to_be_bytes());
    p[9..13].copy_from_slice(&rx_err_cnt.to_be_bytes());
    p[13..17].copy_from_slice(&tx_err_cnt.to_be_bytes());
    p[17] = sensor.fault_mode().flags_byte();
    p
}

fn handle_set_param(payload: &[u8], params: &mut ParamStore, sink: &mut impl ByteSink) -> DispatchOutcome {
    let ok = match payload.first() {
        Some(&params::ID_SAMPLE_RATE) if payload.len() == 3 => {
            params.set_sample_rate(u16::from_be_bytes([payload[1], payload[2]]))
        }
        Some(&params::ID_STATUS_PERIOD_MS) if payload.len() == 3 => {
            params.set_status_period_ms(u16::from_be_bytes([payload[1], payload[2]]))
        }
        Some(&params::ID_SENSOR_ENABLE) if payload.len() == 2 => params.set_sensor_enable(payload[1] != 0),
        _ => false,
    };

    if ok {
        reply(sink, msg_type::PARAM_RSP, &[0x00])
    } else {
        reply(sink, msg_type::ERROR_RSP, &[error_code::INVALID_REQUEST])
    }
}

fn handle_get_param(payload: &[u8], params: &ParamStore, sink: &mut impl ByteSink) -> DispatchOutcome {
    // An empty payload (no param_id byte at all) gets no reply, same as an
    // unrecognized id below: the source's `if (len < 1) return;` drops it
    // before it ever reaches the id-matching switch.
    let Some(&id) = payload.first() else {
        return DispatchOutcome::Handled;
    };

    match id {
        params::ID_SAMPLE_RATE => {
            let v = params.get_sample_rate().to_be_bytes();
            reply(sink, msg_type::PARAM_RSP, &[id, v[0], v[1]])
        }
        params::ID_STATUS_PERIOD_MS => {
            let v = params.get_status_period_ms().to_be_bytes();
            reply(sink, msg_type::PARAM_RSP, &[id, v[0], v[1]])
        }
        params::ID_SENSOR_ENABLE => {
            reply(sink, msg_type::PARAM_RSP, &[id, params.get_sensor_enable() as u8])
        }
        // Unknown parameter id: silent drop (§9 open-question decision).
        _ => DispatchOutcome::Handled,
    }
}
