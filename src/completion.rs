//! Shell completion scripts for procwatch.
//!
//! The hidden `procwatch completions <shell>` command prints a script for
//! bash, zsh, or fish generated from the clap command definition.

use crate::error::{ProcwatchError, Result};
use clap::Command;
use clap_complete::{generate, Shell};

/// Shell names accepted by [`ShellType::from_name`].
pub const SUPPORTED_SHELLS: &[&str] = &["bash", "zsh", "fish"];

/// Supported shell types for completion scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
}

impl ShellType {
    /// Convert to the `clap_complete::Shell` type.
    pub fn to_clap_shell(self) -> Shell {
        match self {
            ShellType::Bash => Shell::Bash,
            ShellType::Zsh => Shell::Zsh,
            ShellType::Fish => Shell::Fish,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShellType::Bash => "bash",
            ShellType::Zsh => "zsh",
            ShellType::Fish => "fish",
        }
    }

    /// Parse a shell name or path such as `zsh` or `/usr/bin/fish`.
    pub fn from_name(name: &str) -> Result<Self> {
        let shell_name = std::path::Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        match shell_name {
            "bash" => Ok(ShellType::Bash),
            "zsh" => Ok(ShellType::Zsh),
            "fish" => Ok(ShellType::Fish),
            _ => Err(ProcwatchError::ShellCompletion(format!(
                "Unsupported shell: '{}'",
                shell_name
            ))),
        }
    }
}

impl std::fmt::Display for ShellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Generate a completion script for `cmd`.
pub fn generate_completion_script(shell: ShellType, cmd: &mut Command) -> String {
    let bin_name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    generate(shell.to_clap_shell(), cmd, bin_name, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print a completion script to stdout.
pub fn print_completion_script(shell: ShellType, cmd: &mut Command) {
    print!("{}", generate_completion_script(shell, cmd));
}
