//! Command keywords and their typed arguments
//!
//! Raw text only exists at the edge: a keyword resolves to a `CommandKind`
//! through `COMMAND_TABLE`, and the arguments are checked into a `Command`
//! before any handler runs.

/// Every command the interpreter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Help,
    Clear,
    Status,
    Targets,
    Programs,
    Scan,
    Bruteforce,
    Bypass,
    Decrypt,
    Connect,
    Stealth,
    Buy,
    Upgrade,
    Ls,
    Cat,
}

/// Keyword table entry
#[derive(Debug)]
pub struct CommandSpec {
    pub kind: CommandKind,
    pub keywords: &'static [&'static str], // First one is the canonical name
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMAND_TABLE: &[CommandSpec] = &[
    CommandSpec { kind: CommandKind::Help, keywords: &["help"], usage: "help", summary: "Show this help message" },
    CommandSpec { kind: CommandKind::Scan, keywords: &["scan"], usage: "scan <target>", summary: "Scan a target for vulnerabilities" },
    CommandSpec { kind: CommandKind::Connect, keywords: &["connect"], usage: "connect <target>", summary: "Connect to a target" },
    CommandSpec { kind: CommandKind::Bruteforce, keywords: &["bruteforce"], usage: "bruteforce <target>", summary: "Attempt to crack a connected target's password" },
    CommandSpec { kind: CommandKind::Bypass, keywords: &["bypass", "firewall"], usage: "bypass <target>", summary: "Break through a target's firewall (needs a firewall program)" },
    CommandSpec { kind: CommandKind::Decrypt, keywords: &["decrypt", "crypto"], usage: "decrypt <target>", summary: "Decrypt a target's database (needs a crypto program)" },
    CommandSpec { kind: CommandKind::Ls, keywords: &["ls"], usage: "ls", summary: "List available files" },
    CommandSpec { kind: CommandKind::Cat, keywords: &["cat"], usage: "cat <file>", summary: "View file contents" },
    CommandSpec { kind: CommandKind::Stealth, keywords: &["stealth"], usage: "stealth <on|off>", summary: "Toggle stealth mode" },
    CommandSpec { kind: CommandKind::Status, keywords: &["status", "info"], usage: "status", summary: "Show current status" },
    CommandSpec { kind: CommandKind::Targets, keywords: &["targets", "list"], usage: "targets", summary: "List known targets" },
    CommandSpec { kind: CommandKind::Programs, keywords: &["programs", "shop", "store"], usage: "programs", summary: "List programs in the store" },
    CommandSpec { kind: CommandKind::Buy, keywords: &["buy"], usage: "buy <program>", summary: "Purchase a new program" },
    CommandSpec { kind: CommandKind::Upgrade, keywords: &["upgrade"], usage: "upgrade <program>", summary: "Upgrade a program you own" },
    CommandSpec { kind: CommandKind::Clear, keywords: &["clear", "cls"], usage: "clear", summary: "Clear the terminal" },
];

impl CommandKind {
    /// Resolve an already lowercased keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        COMMAND_TABLE
            .iter()
            .find(|spec| spec.keywords.contains(&keyword))
            .map(|spec| spec.kind)
    }

    pub fn spec(&self) -> &'static CommandSpec {
        COMMAND_TABLE
            .iter()
            .find(|spec| spec.kind == *self)
            .unwrap_or(&COMMAND_TABLE[0])
    }

    pub fn name(&self) -> &'static str {
        self.spec().keywords[0]
    }

    /// Commands that raise the detection meter
    pub fn is_offensive(&self) -> bool {
        matches!(
            self,
            CommandKind::Scan
                | CommandKind::Bruteforce
                | CommandKind::Bypass
                | CommandKind::Decrypt
                | CommandKind::Connect
        )
    }
}

/// A command with its arguments checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Status,
    Targets,
    Programs,
    Scan { target: String },
    Bruteforce { target: String },
    Bypass { target: String },
    Decrypt { target: String },
    Connect { target: String },
    Stealth(bool),
    Buy { program: String },
    Upgrade { program: String },
    Ls,
    Cat { file: String },
}

impl Command {
    /// Check `args` against what `kind` expects
    pub fn parse(kind: CommandKind, args: &[String]) -> Result<Self, CommandError> {
        // Targets and programs may have spaces in their names
        let operand = || -> Result<String, CommandError> {
            let joined = args.join(" ");
            if joined.trim().is_empty() {
                Err(CommandError::Usage(kind.spec().usage))
            } else {
                Ok(joined)
            }
        };

        let command = match kind {
            CommandKind::Help => Command::Help,
            CommandKind::Clear => Command::Clear,
            CommandKind::Status => Command::Status,
            CommandKind::Targets => Command::Targets,
            CommandKind::Programs => Command::Programs,
            CommandKind::Ls => Command::Ls,
            CommandKind::Scan => Command::Scan { target: operand()? },
            CommandKind::Bruteforce => Command::Bruteforce { target: operand()? },
            CommandKind::Bypass => Command::Bypass { target: operand()? },
            CommandKind::Decrypt => Command::Decrypt { target: operand()? },
            CommandKind::Connect => Command::Connect { target: operand()? },
            CommandKind::Buy => Command::Buy { program: operand()? },
            CommandKind::Upgrade => Command::Upgrade { program: operand()? },
            CommandKind::Cat => Command::Cat { file: operand()? },
            CommandKind::Stealth => match args {
                [mode] if mode == "on" => Command::Stealth(true),
                [mode] if mode == "off" => Command::Stealth(false),
                _ => return Err(CommandError::Usage(kind.spec().usage)),
            },
        };
        Ok(command)
    }

    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Help => CommandKind::Help,
            Command::Clear => CommandKind::Clear,
            Command::Status => CommandKind::Status,
            Command::Targets => CommandKind::Targets,
            Command::Programs => CommandKind::Programs,
            Command::Scan { .. } => CommandKind::Scan,
            Command::Bruteforce { .. } => CommandKind::Bruteforce,
            Command::Bypass { .. } => CommandKind::Bypass,
            Command::Decrypt { .. } => CommandKind::Decrypt,
            Command::Connect { .. } => CommandKind::Connect,
            Command::Stealth(_) => CommandKind::Stealth,
            Command::Buy { .. } => CommandKind::Buy,
            Command::Upgrade { .. } => CommandKind::Upgrade,
            Command::Ls => CommandKind::Ls,
            Command::Cat { .. } => CommandKind::Cat,
        }
    }
}

/// Why a command was refused. None of these change the game state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command not recognized: {0}. Type 'help' for available commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("{kind} {name} not found.")]
    NotFound { kind: &'static str, name: String },

    #[error("{0}")]
    Precondition(String),
}
