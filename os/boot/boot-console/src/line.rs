use crate::Serial;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7F;

/// Line reader for the serial console.
///
/// Supports:
/// - Echo of every stored byte
/// - CR (0x0D) or LF (0x0A): submit line, echoed as CR LF
/// - Backspace / DEL (0x08 / 0x7F): delete the last stored byte
///
/// A terminal sending CR LF would otherwise produce a spurious empty line;
/// the LF directly following a CR-terminated line is swallowed.
#[derive(Debug, Default)]
pub struct LineEditor {
    after_cr: bool,
}

impl LineEditor {
    #[must_use]
    pub const fn new() -> Self {
        Self { after_cr: false }
    }

    /// Read one line into `buf` and return the stored part.
    ///
    /// Blocks until a terminator arrives. Input beyond `buf.len()` bytes is
    /// neither stored nor echoed.
    pub fn read_line<'b, S: Serial + ?Sized>(
        &mut self,
        serial: &mut S,
        buf: &'b mut [u8],
    ) -> &'b [u8] {
        let mut len = 0;

        loop {
            let byte = serial.read_byte();
            let after_cr = core::mem::replace(&mut self.after_cr, false);

            match byte {
                b'\n' if after_cr && len == 0 => {}
                b'\r' | b'\n' => {
                    self.after_cr = byte == b'\r';
                    serial.write_bytes(b"\r\n");
                    return &buf[..len];
                }
                BACKSPACE | DELETE => {
                    if len > 0 {
                        len -= 1;
                        serial.write_bytes(b"\x08 \x08");
                    }
                }
                _ => {
                    if let Some(slot) = buf.get_mut(len) {
                        *slot = byte;
                        len += 1;
                        serial.write_byte(byte);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedSerial;

    #[test]
    fn reads_and_echoes_a_line() {
        let mut serial = ScriptedSerial::with_input(b"ls\r");
        let mut buf = [0u8; 16];
        let line = LineEditor::new().read_line(&mut serial, &mut buf);
        assert_eq!(line, b"ls");
        assert_eq!(serial.output(), b"ls\r\n");
    }

    #[test]
    fn truncates_at_capacity() {
        let mut serial = ScriptedSerial::with_input(b"abcdef\r");
        let mut buf = [0u8; 4];
        let line = LineEditor::new().read_line(&mut serial, &mut buf);
        assert_eq!(line, b"abcd");
        assert_eq!(serial.output(), b"abcd\r\n");
    }

    #[test]
    fn backspace_erases_last_byte() {
        let mut serial = ScriptedSerial::with_input(b"lx\x7fs\r");
        let mut buf = [0u8; 16];
        let line = LineEditor::new().read_line(&mut serial, &mut buf);
        assert_eq!(line, b"ls");
    }

    #[test]
    fn backspace_on_empty_line_is_ignored() {
        let mut serial = ScriptedSerial::with_input(b"\x08\r");
        let mut buf = [0u8; 16];
        assert_eq!(LineEditor::new().read_line(&mut serial, &mut buf), b"");
        assert_eq!(serial.output(), b"\r\n");
    }

    #[test]
    fn crlf_yields_a_single_line() {
        let mut serial = ScriptedSerial::with_input(b"cat\r\nfile\r\n");
        let mut editor = LineEditor::new();
        let mut buf = [0u8; 16];
        assert_eq!(editor.read_line(&mut serial, &mut buf), b"cat");
        assert_eq!(editor.read_line(&mut serial, &mut buf), b"file");
        assert_eq!(serial.remaining_input(), 1);
    }

    #[test]
    fn bare_lf_terminates_and_empty_lines_survive() {
        let mut serial = ScriptedSerial::with_input(b"a\n\nb\r");
        let mut editor = LineEditor::new();
        let mut buf = [0u8; 16];
        assert_eq!(editor.read_line(&mut serial, &mut buf), b"a");
        assert_eq!(editor.read_line(&mut serial, &mut buf), b"");
        assert_eq!(editor.read_line(&mut serial, &mut buf), b"b");
    }
}
