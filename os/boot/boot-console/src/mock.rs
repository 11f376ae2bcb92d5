//! Scripted serial transport for host-side tests.

extern crate alloc;

use crate::Serial;
use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

/// A [`Serial`] whose input is queued up front and whose output is captured.
///
/// Running out of input panics: on hardware the read would block forever,
/// which in a test is always a bug in the script.
#[derive(Debug, Default, Clone)]
pub struct ScriptedSerial {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl ScriptedSerial {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_input(bytes: &[u8]) -> Self {
        let mut serial = Self::new();
        serial.push_input(bytes);
        serial
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Queue `line` followed by a carriage return, like a terminal would.
    pub fn push_line(&mut self, line: &str) {
        self.push_input(line.as_bytes());
        self.input.push_back(b'\r');
    }

    #[must_use]
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Captured output, with invalid UTF-8 replaced.
    #[must_use]
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Serial for ScriptedSerial {
    fn read_byte(&mut self) -> u8 {
        self.input
            .pop_front()
            .unwrap_or_else(|| panic!("scripted serial ran out of input"))
    }

    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_macro_goes_to_output() {
        let mut serial = ScriptedSerial::new();
        write!(serial, "Command '{}' not found\r\n", "foo");
        assert_eq!(serial.output_lossy(), "Command 'foo' not found\r\n");
    }

    #[test]
    fn push_line_appends_carriage_return() {
        let mut serial = ScriptedSerial::new();
        serial.push_line("ls");
        assert_eq!(serial.read_byte(), b'l');
        assert_eq!(serial.read_byte(), b's');
        assert_eq!(serial.read_byte(), b'\r');
        assert_eq!(serial.remaining_input(), 0);
    }
}
