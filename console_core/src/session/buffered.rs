use core::fmt;

use heapless::{Deque, String};

use console_config::{STREAM_INPUT_CAPACITY, STREAM_OUTPUT_CAPACITY};

use super::{ByteStream, ReadUntil};

/// Fixed-capacity in-memory stream: bytes fed in are read by the console, and
/// everything the console writes is captured.
///
/// # Type Parameters
/// - `IN`: input queue capacity (bytes).
/// - `OUT`: captured output capacity (bytes). Writes past it fail with `fmt::Error`.
pub struct BufferedStream<
    const IN: usize = STREAM_INPUT_CAPACITY,
    const OUT: usize = STREAM_OUTPUT_CAPACITY,
> {
    input: Deque<u8, IN>,
    output: String<OUT>,
}

impl<const IN: usize, const OUT: usize> BufferedStream<IN, OUT> {
    pub fn new() -> Self {
        Self {
            input: Deque::new(),
            output: String::new(),
        }
    }

    /// Queue input bytes. Returns how many were accepted before the queue filled.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &b in bytes {
            if self.input.push_back(b).is_err() {
                log::warn!("input queue full, dropped {} bytes", bytes.len() - accepted);
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Bytes queued and not yet read.
    pub fn pending(&self) -> usize {
        self.input.len()
    }

    /// Everything written since the last [`clear_output`](Self::clear_output).
    pub fn output(&self) -> &str {
        self.output.as_str()
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }
}

impl<const IN: usize, const OUT: usize> Default for BufferedStream<IN, OUT> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const IN: usize, const OUT: usize> ByteStream for BufferedStream<IN, OUT> {
    fn available(&mut self) -> usize {
        self.input.len()
    }

    fn read_bytes_until(&mut self, delimiter: u8, buf: &mut [u8]) -> ReadUntil {
        let mut stored = 0;
        while let Some(&b) = self.input.front() {
            if b == delimiter {
                self.input.pop_front();
                return ReadUntil { stored, delimited: true };
            }
            if stored == buf.len() {
                break;
            }
            buf[stored] = b;
            stored += 1;
            self.input.pop_front();
        }
        ReadUntil { stored, delimited: false }
    }
}

impl<const IN: usize, const OUT: usize> fmt::Write for BufferedStream<IN, OUT> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s).map_err(|_| fmt::Error)
    }
}
