//! Freeform-mode directive lines.
//!
//! A model reply in freeform mode is prose followed by marker lines:
//! ```text
//! Of course, let me set the mood~
//!
//! LIGHT:wiz:ON:brightness=40:color=255,120,0
//! EXPRESSION:smug
//! ```

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Light,
    Tv,
    Status,
    Expression,
}

impl CommandKind {
    pub const ALL: [CommandKind; 4] = [
        CommandKind::Light,
        CommandKind::Tv,
        CommandKind::Status,
        CommandKind::Expression,
    ];

    /// Case-sensitive line prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            CommandKind::Light => "LIGHT:",
            CommandKind::Tv => "TV:",
            CommandKind::Status => "STATUS:",
            CommandKind::Expression => "EXPRESSION:",
        }
    }

    /// Lowercase name used in dispatch results.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Light => "light",
            CommandKind::Tv => "tv",
            CommandKind::Status => "status",
            CommandKind::Expression => "expression",
        }
    }

    fn for_line(line: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| line.starts_with(kind.prefix()))
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    pub raw_line: String,
}

impl Command {
    pub fn new(kind: CommandKind, raw_line: impl Into<String>) -> Self {
        Self {
            kind,
            raw_line: raw_line.into(),
        }
    }
}

/// Marker lines in order of appearance.
pub fn extract_commands(raw_text: &str) -> Vec<Command> {
    raw_text
        .lines()
        .filter_map(|line| CommandKind::for_line(line).map(|kind| Command::new(kind, line)))
        .collect()
}

/// The reply with marker lines removed and whitespace collapsed, i.e. the
/// part that gets spoken.
pub fn strip_markers(raw_text: &str) -> String {
    raw_text
        .lines()
        .filter(|line| CommandKind::for_line(line).is_none())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
