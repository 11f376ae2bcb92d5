use core::fmt;

/// A blocking, byte-oriented serial transport.
///
/// Implementations never time out: [`read_byte`](Self::read_byte) waits for
/// as long as it takes for the next byte to arrive.
pub trait Serial {
    /// Wait for and return the next received byte.
    fn read_byte(&mut self) -> u8;

    /// Transmit one byte, waiting for room in the transmitter if needed.
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.write_byte(b);
        }
    }

    fn write_str(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Wait until every byte written so far has left the transmitter.
    fn flush(&mut self) {}

    /// Support for `write!(serial, ...)`.
    ///
    /// The transport cannot fail, so neither can this.
    fn write_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = fmt::write(&mut SerialWriter::new(self), args);
    }
}

impl<S: Serial + ?Sized> Serial for &mut S {
    #[inline]
    fn read_byte(&mut self) -> u8 {
        (**self).read_byte()
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) {
        (**self).write_bytes(bytes);
    }

    #[inline]
    fn flush(&mut self) {
        (**self).flush();
    }
}

/// `core::fmt::Write` adapter over a [`Serial`] transport.
pub struct SerialWriter<'a, S: Serial + ?Sized> {
    serial: &'a mut S,
}

impl<'a, S: Serial + ?Sized> SerialWriter<'a, S> {
    #[must_use]
    pub const fn new(serial: &'a mut S) -> Self {
        Self { serial }
    }
}

impl<S: Serial + ?Sized> fmt::Write for SerialWriter<'_, S> {
    #[inline]
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.serial.write_bytes(s.as_bytes());
        Ok(())
    }
}
