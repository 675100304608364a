//! Module-wide singleton: bundles the parameter store, sensor source,
//! lifecycle state machine, frame parser and error counters behind one
//! object, so the scheduler glue binary (and every test) deals with exactly
//! one handle instead of several process-global statics.

use crate::dispatcher::{self, DispatchOutcome};
use crate::env::{ByteSink, ByteSource, Clock};
use crate::lifecycle::{Lifecycle, State};
use crate::params::ParamStore;
use crate::parser::{FeedOutcome, Parser};
use crate::sensor::{FaultMode, SensorSource};

/// Size of the scratch buffer `poll_rx` drains the byte source into per
/// call. Unrelated to any protocol limit; just an I/O chunking size.
const RX_POLL_CHUNK: usize = 32;

pub struct Controller {
    params: ParamStore,
    sensor: SensorSource,
    lifecycle: Lifecycle,
    parser: Parser,
    rx_err_cnt: u32,
    tx_err_cnt: u32,
}

impl Controller {
    /// `now_ms` seeds the lifecycle clock; the state machine starts in BOOT
    /// regardless and reaches RUN over its first two `tick` calls.
    pub fn new(now_ms: u64) -> Self {
        Self {
            params: ParamStore::new(),
            sensor: SensorSource::new(),
            lifecycle: Lifecycle::new(now_ms),
            parser: Parser::new(),
            rx_err_cnt: 0,
            tx_err_cnt: 0,
        }
    }

    /// Build a controller seeded from a `Clock`, for call sites that already
    /// hold one (the firmware binary, mainly).
    pub fn new_with_clock(clock: &impl Clock) -> Self {
        Self::new(clock.now_ms())
    }

    /// Drive one step of the lifecycle state machine. Expected to be called
    /// at the design tick rate (1 kHz); correctness does not depend on the
    /// exact rate, only on `now_ms` coming from the same monotonic clock
    /// every call.
    pub fn tick(&mut self, now_ms: u64) {
        self.lifecycle.run_iteration(now_ms, &mut self.params, &mut self.sensor);
    }

    /// Feed one received byte through the parser and, once a frame
    /// completes, the dispatcher. Any reply is written to `sink`.
    pub fn feed_byte(&mut self, byte: u8, sink: &mut impl ByteSink) {
        match self.parser.feed_byte(byte) {
            FeedOutcome::Pending => {}
            FeedOutcome::Error(_) => {
                self.rx_err_cnt += 1;
            }
            FeedOutcome::Frame(frame) => {
                let outcome = dispatcher::dispatch(
                    &frame,
                    &mut self.params,
                    &mut self.sensor,
                    &mut self.lifecycle,
                    sink,
                    self.rx_err_cnt,
                    self.tx_err_cnt,
                );
                match outcome {
                    DispatchOutcome::Handled => {}
                    DispatchOutcome::UnknownType => self.rx_err_cnt += 1,
                    DispatchOutcome::SinkFailed => self.tx_err_cnt += 1,
                }
            }
        }
    }

    /// Drain everything currently available from `source` into the parser.
    /// Convenience wrapper around repeated `feed_byte` calls for callers
    /// driven by a receive-notification rather than a byte-at-a-time ISR.
    pub fn poll_rx(&mut self, source: &mut impl ByteSource, sink: &mut impl ByteSink) {
        let mut buf = [0u8; RX_POLL_CHUNK];
        loop {
            let n = source.poll_bytes(&mut buf);
            if n == 0 {
                break;
            }
            for &b in &buf[..n] {
                self.feed_byte(b, sink);
            }
        }
    }

    pub fn trigger_error(&mut self) {
        self.lifecycle.trigger_error();
    }

    pub fn trigger_reset(&mut self) {
        self.lifecycle.trigger_reset();
    }

    pub fn state(&self) -> State {
        self.lifecycle.state()
    }

    pub fn rx_err_cnt(&self) -> u32 {
        self.rx_err_cnt
    }

    pub fn tx_err_cnt(&self) -> u32 {
        self.tx_err_cnt
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    /// Testability-only hook, forwarded from `SensorSource::inject_fault`.
    pub fn inject_sensor_fault(&mut self, mode: FaultMode) {
        self.sensor.inject_fault(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::test_support::LoopbackTransport;
    use crate::frame::msg_type;

    fn run_to_steady_state(c: &mut Controller) {
        c.tick(1); // BOOT -> INIT
        c.tick(2); // INIT -> RUN
    }

    fn feed_frame(c: &mut Controller, sink: &mut LoopbackTransport, bytes: &[u8]) {
        for &b in bytes {
            c.feed_byte(b, sink);
        }
    }

    #[test]
    fn get_status_round_trip_yields_26_byte_frame() {
        let mut c = Controller::new(0);
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);

        let header = [0x01u8, msg_type::GET_STATUS, 0x00, 0x00];
        let crc = crate::crc::crc16(crate::crc::INIT, &header);
        let frame = [
            0xAA, 0x55, 0x01, msg_type::GET_STATUS, 0x00, 0x00, (crc >> 8) as u8, crc as u8,
        ];
        feed_frame(&mut c, &mut sink, &frame);

        assert_eq!(sink.outbox.len(), 26);
        assert_eq!(sink.outbox[3], msg_type::STATUS_RSP);
        assert_eq!(sink.outbox[6], State::Run.wire_value());
    }

    #[test]
    fn set_param_round_trip_updates_controller_and_replies_ok() {
        let mut c = Controller::new(0);
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);

        let header = [0x01u8, msg_type::SET_PARAM, 0x00, 0x03];
        let payload = [0x01u8, 0x01, 0xF4];
        let crc = crate::crc::crc16(crate::crc::crc16(crate::crc::INIT, &header), &payload);
        let mut frame = heapless::Vec::<u8, 16>::new();
        frame.extend_from_slice(&[0xAA, 0x55]).unwrap();
        frame.extend_from_slice(&header).unwrap();
        frame.extend_from_slice(&payload).unwrap();
        frame.push((crc >> 8) as u8).unwrap();
        frame.push(crc as u8).unwrap();

        feed_frame(&mut c, &mut sink, &frame);

        assert_eq!(c.params().get_sample_rate(), 500);
        assert_eq!(sink.outbox[3], msg_type::PARAM_RSP);
    }

    #[test]
    fn crc_mismatch_bumps_rx_err_cnt_with_no_reply() {
        let mut c = Controller::new(0);
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);

        let frame = [0xAA, 0x55, 0x01, msg_type::SET_PARAM, 0x00, 0x03, 0x01, 0x01, 0xF4, 0xFF, 0xFF];
        feed_frame(&mut c, &mut sink, &frame);

        assert!(sink.outbox.is_empty());
        assert_eq!(c.rx_err_cnt(), 1);
    }

    #[test]
    fn length_overflow_bumps_rx_err_cnt_and_resyncs() {
        let mut c = Controller::new(0);
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);

        feed_frame(&mut c, &mut sink, &[0xAA, 0x55, 0x01, msg_type::SET_PARAM, 0xFF, 0xFF]);
        assert_eq!(c.rx_err_cnt(), 1);

        let header = [0x01u8, msg_type::GET_STATUS, 0x00, 0x00];
        let crc = crate::crc::crc16(crate::crc::INIT, &header);
        let frame = [0xAA, 0x55, 0x01, msg_type::GET_STATUS, 0x00, 0x00, (crc >> 8) as u8, crc as u8];
        feed_frame(&mut c, &mut sink, &frame);
        assert_eq!(sink.outbox[3], msg_type::STATUS_RSP);
    }

    #[test]
    fn get_status_succeeds_while_in_error_state() {
        let mut c = Controller::new(0);
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);
        c.trigger_error();
        assert_eq!(c.state(), State::Error);

        let header = [0x01u8, msg_type::GET_STATUS, 0x00, 0x00];
        let crc = crate::crc::crc16(crate::crc::INIT, &header);
        let frame = [0xAA, 0x55, 0x01, msg_type::GET_STATUS, 0x00, 0x00, (crc >> 8) as u8, crc as u8];
        feed_frame(&mut c, &mut sink, &frame);

        assert_eq!(sink.outbox[3], msg_type::STATUS_RSP);
        assert_eq!(sink.outbox[6], State::Error.wire_value());
    }

    #[test]
    fn poll_rx_drains_a_whole_frame_delivered_in_one_chunk() {
        let mut c = Controller::new(0);
        let mut source = LoopbackTransport::new();
        let mut sink = LoopbackTransport::new();
        run_to_steady_state(&mut c);

        let header = [0x01u8, msg_type::GET_STATUS, 0x00, 0x00];
        let crc = crate::crc::crc16(crate::crc::INIT, &header);
        source.push_inbox(&[0xAA, 0x55, 0x01, msg_type::GET_STATUS, 0x00, 0x00, (crc >> 8) as u8, crc as u8]);

        c.poll_rx(&mut source, &mut sink);
        assert_eq!(sink.outbox[3], msg_type::STATUS_RSP);
    }
}
