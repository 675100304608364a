//! Byte-fed frame receive state machine.
//!
//! Fed one octet at a time via `feed_byte`, with no assumption about how
//! bytes are chunked across calls: the tick may run between any two bytes
//! of a frame, and a caller may feed a whole frame in one call or one byte
//! per call with identical results.

use crate::crc;
use crate::frame::{Frame, MAX_PAYLOAD_LEN, PREAMBLE_0, PREAMBLE_1, VERSION};
use crate::log::log_warn;
use heapless::Vec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Sync0,
    Sync1,
    Version,
    Type,
    Len0,
    Len1,
    Payload,
    Crc0,
    Crc1,
}

/// Outcome of feeding one byte to the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// No frame is ready yet; keep feeding bytes.
    Pending,
    /// A frame passed CRC validation and is ready to dispatch.
    Frame(Frame),
    /// The candidate frame failed validation; `rx_err_cnt` has already been
    /// incremented internally and the parser has resynced to `Sync0`.
    Error(ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Declared payload length exceeded `MAX_PAYLOAD_LEN`.
    LengthOverflow,
    /// The trailing CRC did not match the recomputed value.
    CrcMismatch,
}

/// Byte-fed frame parser. Holds exactly the in-progress candidate frame;
/// never blocks and never allocates beyond its fixed payload buffer.
pub struct Parser {
    stage: Stage,
    msg_type: u8,
    declared_len: u16,
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    crc_rx: u16,
    /// Running CRC over header bytes fed so far, used once we reach
    /// `Payload`/`Crc0` so the whole frame is never buffered twice.
    running_crc: u16,
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            stage: Stage::Sync0,
            msg_type: 0,
            declared_len: 0,
            payload: Vec::new(),
            crc_rx: 0,
            running_crc: crc::INIT,
        }
    }

    /// Re-arm the parser for a fresh frame. Does not affect error counters.
    pub fn init(&mut self) {
        *self = Self::new();
    }

    /// Feed one byte. Returns `FeedOutcome::Frame` once a well-formed frame
    /// has been fully received and CRC-validated, `FeedOutcome::Error` for a
    /// validation failure (after which the parser has already resynced),
    /// and `FeedOutcome::Pending` otherwise.
    pub fn feed_byte(&mut self, c: u8) -> FeedOutcome {
        match self.stage {
            Stage::Sync0 => {
                if c == PREAMBLE_0 {
                    self.stage = Stage::Sync1;
                }
                FeedOutcome::Pending
            }
            Stage::Sync1 => {
                self.stage = if c == PREAMBLE_1 { Stage::Version } else { Stage::Sync0 };
                FeedOutcome::Pending
            }
            Stage::Version => {
                // A version mismatch resyncs silently; it does not count as
                // an rx_err_cnt increment (§9 open-question decision).
                self.stage = if c == VERSION { Stage::Type } else { Stage::Sync0 };
                FeedOutcome::Pending
            }
            Stage::Type => {
                self.msg_type = c;
                self.running_crc = crc::crc16(crc::INIT, &[VERSION, self.msg_type]);
                self.stage = Stage::Len0;
                FeedOutcome::Pending
            }
            Stage::Len0 => {
                self.declared_len = (c as u16) << 8;
                self.stage = Stage::Len1;
                FeedOutcome::Pending
            }
            Stage::Len1 => {
                self.declared_len |= c as u16;
                self.running_crc = crc::crc16(self.running_crc, &[(self.declared_len >> 8) as u8, c]);
                if self.declared_len as usize > MAX_PAYLOAD_LEN {
                    log_warn!("frame length overflow");
                    self.init();
                    FeedOutcome::Error(ParseError::LengthOverflow)
                } else if self.declared_len == 0 {
                    self.stage = Stage::Crc0;
                    FeedOutcome::Pending
                } else {
                    self.payload.clear();
                    self.stage = Stage::Payload;
                    FeedOutcome::Pending
                }
            }
            Stage::Payload => {
                // `extend_from_slice`-equivalent single push; capacity is
                // guaranteed by the Len1 bounds check above.
                let _ = self.payload.push(c);
                if self.payload.len() == self.declared_len as usize {
                    self.stage = Stage::Crc0;
                }
                FeedOutcome::Pending
            }
            Stage::Crc0 => {
                self.crc_rx = (c as u16) << 8;
                self.stage = Stage::Crc1;
                FeedOutcome::Pending
            }
            Stage::Crc1 => {
                self.crc_rx |= c as u16;
                let expected = crc::crc16(self.running_crc, &self.payload);
                let outcome = if expected == self.crc_rx {
                    Frame::new(self.msg_type, &self.payload)
                        .map(FeedOutcome::Frame)
                        .unwrap_or(FeedOutcome::Pending)
                } else {
                    log_warn!("CRC mismatch");
                    FeedOutcome::Error(ParseError::CrcMismatch)
                };
                self.init();
                outcome
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
