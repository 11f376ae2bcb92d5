//! # Serial Console Support
//!
//! The bootloader talks to its operator over a single serial line. This
//! crate models that line as a capability, so that the command shell can be
//! driven by the board's UART on hardware and by an in-memory script in
//! host-side tests.
//!
//! ## Components
//!
//! ### Transport ([`Serial`])
//! Blocking byte receive and transmit. Formatting goes through
//! [`Serial::write_fmt`], so `write!(serial, ...)` works on any transport
//! without an intermediate buffer.
//!
//! ### Line Editing ([`LineEditor`])
//! Reads one line with echo:
//! * **Terminators**: CR or LF; the LF of a CR LF pair is swallowed
//! * **Backspace / DEL**: erases the last stored byte
//! * **Truncation**: bytes beyond the buffer capacity are dropped
//!
//! ### Logger ([`ConsoleLogger`])
//! A `log::Log` implementation forwarding records to a platform-supplied
//! sink function, without allocation:
//! ```text
//! [INFO] bootloader::relocate: copying [0x00080000..0x00084000) to 0x10000000
//! ```
//!
//! ### Scripted Transport (`mock::ScriptedSerial`, feature `mock`)
//! Queued input bytes and captured output for tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boot_console::{LineEditor, Serial};
//!
//! let mut editor = LineEditor::new();
//! let mut buf = [0u8; 64];
//! write!(uart, "user@rpi3:~$ ");
//! let line = editor.read_line(&mut uart, &mut buf);
//! ```

#![cfg_attr(not(any(test, doctest)), no_std)]

mod line;
mod logger;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod serial;

pub use line::LineEditor;
pub use logger::ConsoleLogger;
pub use serial::{Serial, SerialWriter};

/// Line terminator of the console protocol.
pub const CRLF: &str = "\r\n";
