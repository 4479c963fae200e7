//! Side-effect collaborators driven by freeform directives.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

// ── Types ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        })
    }
}

/// Hue in degrees (0-360) and saturation in percent (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HueSat {
    pub hue: u16,
    pub saturation: u8,
}

impl HueSat {
    pub fn new(hue: u16, saturation: u8) -> Self {
        Self { hue, saturation }
    }
}

// ── Errors ─────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("unavailable: {0}")]
    Unavailable(String),
}

// ── Collaborator Traits ────────────────────────────────

#[async_trait]
pub trait EnvironmentControl: Send + Sync {
    /// Switch a named light, optionally setting brightness (percent) and color.
    async fn control_light(
        &self,
        name: &str,
        power: PowerState,
        brightness: Option<u8>,
        color: Option<HueSat>,
    ) -> Result<String, ActionError>;

    /// Receives the full `TV:...` line.
    async fn control_tv(&self, raw_line: &str) -> Result<String, ActionError>;

    async fn get_status(&self) -> Result<String, ActionError>;

    fn id(&self) -> &str;
}

#[async_trait]
pub trait AvatarControl: Send + Sync {
    async fn set_expression(&self, tag: &str) -> Result<String, ActionError>;
}
