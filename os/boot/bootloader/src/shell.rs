//! # Command Shell
//!
//! Prompt, read one line, dispatch, repeat. Arguments are never part of the
//! command line; a command that needs one asks for it at its own prompt.
//!
//! A failed command prints one line naming itself and the reason, then the
//! prompt returns. `relo` and `load` end the loop on success by returning a
//! [`Handoff`].

use crate::commands::Command;
use crate::dtb::{FDT_HEADER_LEN, FdtHeader};
use crate::error::CommandError;
use crate::input::{parse_decimal, parse_hex};
use crate::loader::{self, LoadPlan};
use crate::platform::{Handoff, Platform};
use crate::relocate::RelocationPlan;
use boot_addresses::{MemoryRegion, PhysicalAddress};
use boot_console::{CRLF, LineEditor, Serial};
use boot_info::BootConfig;
use cpio_newc::Archive;

/// Printed once when the shell starts.
pub const BANNER: &str = "Welcome to RPI3-OS\r\n";

/// Upper bound on [`BootConfig::line_capacity`].
pub const MAX_LINE: usize = 256;

pub struct Shell<S, P> {
    serial: S,
    platform: P,
    config: BootConfig,
    editor: LineEditor,
}

impl<S: Serial, P: Platform> Shell<S, P> {
    #[must_use]
    pub const fn new(serial: S, platform: P, config: BootConfig) -> Self {
        Self {
            serial,
            platform,
            config,
            editor: LineEditor::new(),
        }
    }

    #[must_use]
    pub const fn serial(&self) -> &S {
        &self.serial
    }

    #[must_use]
    pub fn into_parts(self) -> (S, P) {
        (self.serial, self.platform)
    }

    /// Greet, then serve commands until one hands off control.
    pub fn run(&mut self) -> Handoff {
        self.serial.write_str(BANNER);
        loop {
            if let Some(handoff) = self.step() {
                return handoff;
            }
        }
    }

    /// Prompt for and execute one command line.
    pub fn step(&mut self) -> Option<Handoff> {
        write!(self.serial, "user@{}:~$ ", self.config.host_name);

        let mut buf = [0u8; MAX_LINE];
        let cap = self.line_capacity();
        let line = self.editor.read_line(&mut self.serial, &mut buf[..cap]);
        if line.is_empty() {
            return None;
        }

        let Some(command) = Command::parse(line) else {
            self.serial.write_str("Command '");
            self.serial.write_bytes(line);
            self.serial.write_str("' not found\r\n");
            return None;
        };

        log::debug!("executing {}", command.name());
        match self.execute(command) {
            Ok(handoff) => handoff,
            Err(e) => {
                report(&mut self.serial, command, None, &e);
                None
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<Option<Handoff>, CommandError> {
        match command {
            Command::Help => self.help(),
            Command::Hello => self.serial.write_str("Hello World!\r\n"),
            Command::Reboot => self.reboot(),
            Command::Cat => self.cat()?,
            Command::Ls => self.ls()?,
            Command::Relo => return self.relocate().map(Some),
            Command::Load => return self.load().map(Some),
            Command::Showmem => self.show_memory()?,
            Command::Dtp => self.device_tree()?,
        }
        Ok(None)
    }

    fn line_capacity(&self) -> usize {
        self.config.line_capacity.clamp(1, MAX_LINE)
    }

    /// Print `prompt` and read the answer into `buf`.
    fn read_arg<'b>(&mut self, prompt: &str, buf: &'b mut [u8]) -> &'b [u8] {
        self.serial.write_str(prompt);
        let cap = self.line_capacity().min(buf.len());
        self.editor.read_line(&mut self.serial, &mut buf[..cap])
    }

    fn help(&mut self) {
        for command in Command::ALL {
            write!(self.serial, "{:<7} : {}\r\n", command.name(), command.help());
        }
    }

    fn reboot(&mut self) {
        self.serial.write_str("Rebooting...\r\n");
        self.serial.flush();
        self.platform.reset(self.config.reboot_ticks);
    }

    fn cat(&mut self) -> Result<(), CommandError> {
        let mut buf = [0u8; MAX_LINE];
        let path = self.read_arg("Please enter file path: ", &mut buf);

        let archive = Archive::new(self.platform.memory(self.config.archive)?);
        match archive.find(path)? {
            Some(entry) if entry.data().is_empty() => {}
            Some(entry) => {
                self.serial.write_bytes(entry.data());
                self.serial.write_str(CRLF);
            }
            None => report(&mut self.serial, Command::Cat, Some(path), &CommandError::NotFound),
        }
        Ok(())
    }

    fn ls(&mut self) -> Result<(), CommandError> {
        let archive = Archive::new(self.platform.memory(self.config.archive)?);
        for name in archive.names() {
            self.serial.write_bytes(name?);
            self.serial.write_str(CRLF);
        }
        Ok(())
    }

    fn show_memory(&mut self) -> Result<(), CommandError> {
        let mut buf = [0u8; MAX_LINE];
        let start = parse_hex(self.read_arg(
            "Please enter start address(hex without '0x'): ",
            &mut buf,
        ))?;
        let len = parse_decimal(self.read_arg("Please enter length: ", &mut buf))?;

        let region = MemoryRegion::new(PhysicalAddress::new(start), len)?;
        self.serial.write_bytes(self.platform.memory(region)?);
        self.serial.write_str(CRLF);
        Ok(())
    }

    fn device_tree(&mut self) -> Result<(), CommandError> {
        let region = MemoryRegion::new(self.config.device_tree, FDT_HEADER_LEN as u64)?;
        let header = FdtHeader::parse(self.platform.memory(region)?)?;
        if header.version < 17 {
            log::warn!("device tree version {} predates v17", header.version);
        }
        write!(self.serial, "{header}");
        Ok(())
    }

    fn relocate(&mut self) -> Result<Handoff, CommandError> {
        let mut buf = [0u8; MAX_LINE];
        let dest = parse_hex(self.read_arg(
            "Please enter relocation address(hex without '0x'): ",
            &mut buf,
        ))?;

        let plan = RelocationPlan::new(&self.platform.image(), PhysicalAddress::new(dest))?;
        for hit in plan.reserved_overlaps(&self.config) {
            log::warn!(
                "relocated {} at {} overlaps the {} at {}",
                hit.footprint,
                plan.target().start(),
                hit.reserved,
                hit.region
            );
        }

        self.serial.write_str("Start relocating...\r\n");
        let entry = plan.execute(&mut self.platform)?;
        self.serial.write_str("Relocation complete!\r\n");
        self.serial.write_str("Prepare to jump to new bootloader...\r\n");
        self.serial.flush();

        Ok(Handoff::Relocated {
            entry,
            device_tree: self.config.device_tree,
        })
    }

    fn load(&mut self) -> Result<Handoff, CommandError> {
        let mut buf = [0u8; MAX_LINE];
        let size = parse_decimal(self.read_arg("Please enter size of kernel8.img: ", &mut buf))?;

        let plan = LoadPlan::new(size, &self.config, &self.platform.image())?;
        let dest = self.platform.memory_mut(plan.target())?;

        self.serial.write_str("You can start sending kernel8.img now...\r\n");
        let checksum = loader::receive(&mut self.serial, dest);
        write!(self.serial, "Checksum: {checksum}\r\n");
        self.serial.write_str("Receiving complete!\r\n");
        log::info!("received {size} bytes into {}", plan.target());

        self.serial.write_str("Prepare to jump to kernel...\r\n");
        self.serial.flush();

        Ok(Handoff::Kernel {
            entry: plan.entry(),
            device_tree: self.config.device_tree,
        })
    }
}

/// `<command>: [<subject>: ]<error>`
fn report<S: Serial + ?Sized>(
    serial: &mut S,
    command: Command,
    subject: Option<&[u8]>,
    error: &CommandError,
) {
    log::debug!("{} failed: {error:?}", command.name());
    write!(serial, "{}: ", command.name());
    if let Some(subject) = subject {
        serial.write_bytes(subject);
        serial.write_str(": ");
    }
    write!(serial, "{error}\r\n");
}
