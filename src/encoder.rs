//! Frame encoder: emits a well-formed frame to a polled byte sink.
//!
//! Emit order is strictly header, then payload, then CRC; on a sink failure
//! partway through, the caller is expected to bump `tx_err_cnt` and abandon
//! the frame rather than retry (§4.4) — this module reports the failure,
//! `Controller` owns the counter.

use crate::crc;
use crate::env::{ByteSink, SinkError};
use crate::frame::{MAX_PAYLOAD_LEN, PREAMBLE_0, PREAMBLE_1, VERSION};

/// Write `[0xAA 0x55 VER TYPE LEN_HI LEN_LO payload... CRC_HI CRC_LO]` to
/// `sink`. `payload.len()` must be `<= MAX_PAYLOAD_LEN`; this is upheld by
/// every caller in this crate (payload sizes are fixed by the dispatcher's
/// own response builders).
pub fn encode_frame(sink: &mut impl ByteSink, msg_type: u8, payload: &[u8]) -> Result<(), SinkError> {
    debug_assert!(payload.len() <= MAX_PAYLOAD_LEN);
    let len = payload.len() as u16;
    let header = [VERSION, msg_type, (len >> 8) as u8, len as u8];

    for &b in &[PREAMBLE_0, PREAMBLE_1] {
        sink.write_byte(b)?;
    }
    for &b in &header {
        sink.write_byte(b)?;
    }
    for &b in payload {
        sink.write_byte(b)?;
    }

    let crc = crc::crc16(crc::crc16(crc::INIT, &header), payload);
    sink.write_byte((crc >> 8) as u8)?;
    sink.write_byte(crc as u8)?;
    Ok(())
}
