//! CLI command definitions using clap.
//!
//! One positional mode:
//! - once: a single POST
//! - multiple: a concurrent batch of POSTs
//!
//! The mode is parsed by hand rather than by clap so that an unknown or
//! missing mode produces a warning and the "invalid" exit status.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

/// Volley - POST once or in a concurrent batch, with retry
#[derive(Parser, Debug)]
#[command(name = "volley")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// once | multiple
    pub mode: Option<String>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Resolve the positional mode. `None` when missing or unrecognised.
    pub fn mode(&self) -> Option<Mode> {
        self.mode.as_deref().and_then(|m| m.parse().ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Once,
    Multiple,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "once" => Ok(Mode::Once),
            "multiple" => Ok(Mode::Multiple),
            other => Err(format!("unrecognized mode: {}", other)),
        }
    }
}

/// Exit status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Invalid,
}

impl CommandStatus {
    pub fn code(self) -> u8 {
        match self {
            CommandStatus::Success => 0,
            CommandStatus::Invalid => 2,
        }
    }
}

impl From<CommandStatus> for ExitCode {
    fn from(status: CommandStatus) -> Self {
        ExitCode::from(status.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_once() {
        let cli = Cli::parse_from(["volley", "once"]);
        assert_eq!(cli.mode(), Some(Mode::Once));
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_parse_multiple_with_flags() {
        let cli = Cli::parse_from(["volley", "-v", "--config", "/tmp/volley.yml", "multiple"]);
        assert_eq!(cli.mode(), Some(Mode::Multiple));
        assert!(cli.is_verbose());
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/volley.yml")));
    }

    #[test]
    fn test_unknown_mode_is_not_a_parse_error() {
        let cli = Cli::try_parse_from(["volley", "twice"]).unwrap();
        assert_eq!(cli.mode(), None);
    }

    #[test]
    fn test_missing_mode() {
        let cli = Cli::try_parse_from(["volley"]).unwrap();
        assert_eq!(cli.mode(), None);
    }

    #[test]
    fn test_mode_is_case_sensitive() {
        assert!("Once".parse::<Mode>().is_err());
        assert_eq!("multiple".parse::<Mode>(), Ok(Mode::Multiple));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(CommandStatus::Success.code(), 0);
        assert_eq!(CommandStatus::Invalid.code(), 2);
    }
}
