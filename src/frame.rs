//! Wire frame layout and message type constants.
//!
//! ```text
//! Offset  Bytes  Field
//! 0       1      Preamble 0 = 0xAA
//! 1       1      Preamble 1 = 0x55
//! 2       1      Version    = 0x01
//! 3       1      Type
//! 4       2      Payload length L, big-endian, 0..=64
//! 6       L      Payload
//! 6+L     2      CRC-16/CCITT, big-endian, over bytes [2..6+L)
//! ```

use heapless::Vec;

pub const PREAMBLE_0: u8 = 0xAA;
pub const PREAMBLE_1: u8 = 0x55;
pub const VERSION: u8 = 0x01;

/// Largest payload a frame may carry. Bounds the RX payload buffer and the
/// wire-format LEN field.
pub const MAX_PAYLOAD_LEN: usize = 64;

/// Bytes in a STATUS_RSP payload: state(1) + uptime(4) + error_flags(4) +
/// rx_err_cnt(4) + tx_err_cnt(4) + sensor fault flags(1).
pub const STATUS_PAYLOAD_LEN: usize = 18;

pub mod msg_type {
    pub const GET_STATUS: u8 = 0x01;
    pub const STATUS_RSP: u8 = 0x02;
    pub const SET_PARAM: u8 = 0x03;
    pub const GET_PARAM: u8 = 0x04;
    pub const PARAM_RSP: u8 = 0x05;
    pub const RESET_MOD: u8 = 0x06;
    pub const ERROR_RSP: u8 = 0x07;
}

pub mod error_code {
    /// Invalid request: malformed SET_PARAM payload or out-of-range value.
    pub const INVALID_REQUEST: u8 = 0x01;
}

/// A decoded request or response: the message type and its payload.
/// `version` is not retained since the codec only ever speaks `VERSION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub msg_type: u8,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl Frame {
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, ()> {
        let mut buf = Vec::new();
        buf.extend_from_slice(payload).map_err(|_| ())?;
        Ok(Self {
            msg_type,
            payload: buf,
        })
    }
}
