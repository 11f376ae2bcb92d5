use core::fmt;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Destination of formatted log records, e.g. the board UART.
pub type LogSink = fn(fmt::Arguments<'_>);

pub struct ConsoleLogger {
    max_level: LevelFilter,
    sink: LogSink,
}

impl ConsoleLogger {
    #[must_use]
    pub const fn new(max_level: LevelFilter, sink: LogSink) -> Self {
        Self { max_level, sink }
    }

    /// Call this once during early init.
    #[allow(static_mut_refs, clippy::missing_errors_doc)]
    pub fn init(self) -> Result<(), SetLoggerError> {
        // log::set_logger expects a &'static dyn Log; without an allocator
        // the logger lives in a static.
        static mut LOGGER: Option<ConsoleLogger> = None;

        let max_level = self.max_level;
        // SAFETY: single core, called once before anything else logs.
        let logger: &'static ConsoleLogger = unsafe { LOGGER.insert(self) };
        log::set_logger(logger)?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        // Format: "[LEVEL] target: message\r\n"
        (self.sink)(format_args!(
            "[{}] {}: {}\r\n",
            record.level(),
            record.target(),
            record.args()
        ));
    }

    fn flush(&self) {}
}
