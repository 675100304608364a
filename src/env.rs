//! Abstract collaborators the core logic is driven by.
//!
//! Platform bring-up, interrupt wiring, timer hardware and the transport
//! device itself are out of scope for this crate (see the crate-level
//! docs); these traits are the seam a firmware binary implements to supply
//! them, and the seam a test supplies an in-memory fake across.

/// A monotonic millisecond timestamp source.
///
/// Must never go backwards. Wraparound is not modeled: `u64` milliseconds
/// overflows after roughly 580 million years of uptime.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// A non-blocking byte source, e.g. a UART RX FIFO drained from an
/// interrupt or polled from an async task.
pub trait ByteSource {
    /// Copy up to `buf.len()` available bytes into `buf` and return how many
    /// were copied. Returns 0 if nothing is available; never blocks.
    fn poll_bytes(&mut self, buf: &mut [u8]) -> usize;
}

/// A blocking, one-byte-at-a-time sink, e.g. a polled UART TX register.
pub trait ByteSink {
    /// Emit a single byte. An error abandons the in-flight frame; the byte
    /// sink is not expected to support partial-frame retry.
    fn write_byte(&mut self, byte: u8) -> Result<(), SinkError>;
}

/// Opaque transport failure. The abstract sink interface carries no detail
/// of its own (no error codes, no errno) so there is nothing to wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinkError;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use heapless::Vec;

    /// A clock driven by the test, advanced explicitly between ticks.
    pub struct FakeClock {
        pub now_ms: u64,
    }

    impl FakeClock {
        pub fn new() -> Self {
            Self { now_ms: 0 }
        }

        pub fn advance(&mut self, delta_ms: u64) {
            self.now_ms += delta_ms;
        }
    }

    impl Clock for FakeClock {
        fn now_ms(&self) -> u64 {
            self.now_ms
        }
    }

    /// An in-memory transport: bytes pushed into `inbox` are what
    /// `poll_bytes` yields; bytes written via `ByteSink` accumulate in
    /// `outbox`.
    pub struct LoopbackTransport {
        pub inbox: Vec<u8, 512>,
        pub outbox: Vec<u8, 512>,
        pub fail_after: Option<usize>,
    }

    impl LoopbackTransport {
        pub fn new() -> Self {
            Self {
                inbox: Vec::new(),
                outbox: Vec::new(),
                fail_after: None,
            }
        }

        pub fn push_inbox(&mut self, bytes: &[u8]) {
            for &b in bytes {
                self.inbox.push(b).expect("test inbox overflow");
            }
        }
    }

    impl ByteSource for LoopbackTransport {
        fn poll_bytes(&mut self, buf: &mut [u8]) -> usize {
            let n = buf.len().min(self.inbox.len());
            for (i, slot) in buf.iter_mut().take(n).enumerate() {
                *slot = self.inbox[i];
            }
            // Shift the consumed bytes out of the front of the queue.
            let remaining = self.inbox.len() - n;
            for i in 0..remaining {
                self.inbox[i] = self.inbox[i + n];
            }
            self.inbox.truncate(remaining);
            n
        }
    }

    impl ByteSink for LoopbackTransport {
        fn write_byte(&mut self, byte: u8) -> Result<(), SinkError> {
            if let Some(budget) = self.fail_after.as_mut() {
                if *budget == 0 {
                    return Err(SinkError);
                }
                *budget -= 1;
            }
            self.outbox.push(byte).map_err(|_| SinkError)
        }
    }
}
