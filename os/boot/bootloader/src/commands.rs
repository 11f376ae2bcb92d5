/// The closed set of console commands, in `help` order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Help,
    Hello,
    Reboot,
    Cat,
    Ls,
    Relo,
    Load,
    Showmem,
    Dtp,
}

impl Command {
    pub const ALL: [Self; 9] = [
        Self::Help,
        Self::Hello,
        Self::Reboot,
        Self::Cat,
        Self::Ls,
        Self::Relo,
        Self::Load,
        Self::Showmem,
        Self::Dtp,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::Hello => "hello",
            Self::Reboot => "reboot",
            Self::Cat => "cat",
            Self::Ls => "ls",
            Self::Relo => "relo",
            Self::Load => "load",
            Self::Showmem => "showmem",
            Self::Dtp => "dtp",
        }
    }

    #[must_use]
    pub const fn help(self) -> &'static str {
        match self {
            Self::Help => "list all commands",
            Self::Hello => "print hello world",
            Self::Reboot => "reboot",
            Self::Cat => "show file contents",
            Self::Ls => "show all file",
            Self::Relo => "Relocate bootloader",
            Self::Load => "Load image from host to pi, then jump to it",
            Self::Showmem => "show memory contents",
            Self::Dtp => "device tree parse",
        }
    }

    /// Exact, case-sensitive match of the whole line.
    #[must_use]
    pub fn parse(line: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name().as_bytes() == line)
    }
}
