//! Log-only collaborators. Used when no smart-home backend is configured, and
//! for the avatar (the rendering client gets the expression via the relay).

use async_trait::async_trait;

use crate::actions::interface::{ActionError, AvatarControl, EnvironmentControl, HueSat, PowerState};

#[derive(Debug, Default, Clone)]
pub struct MockEnvironment;

#[async_trait]
impl EnvironmentControl for MockEnvironment {
    async fn control_light(
        &self,
        name: &str,
        power: PowerState,
        brightness: Option<u8>,
        color: Option<HueSat>,
    ) -> Result<String, ActionError> {
        let mut message = format!("Turned {} {} light", power, name);
        if let Some(pct) = brightness {
            message.push_str(&format!(", brightness {}%", pct));
        }
        if let Some(hs) = color {
            message.push_str(&format!(", hue {} saturation {}%", hs.hue, hs.saturation));
        }
        tracing::info!("[Actions/Mock] {}", message);
        Ok(message)
    }

    async fn control_tv(&self, raw_line: &str) -> Result<String, ActionError> {
        tracing::info!("[Actions/Mock] TV command: {}", raw_line);
        Ok(format!("TV command sent: {}", raw_line))
    }

    async fn get_status(&self) -> Result<String, ActionError> {
        Ok("All devices nominal (mock environment)".to_string())
    }

    fn id(&self) -> &str {
        "mock"
    }
}

#[derive(Debug, Default, Clone)]
pub struct LoggingAvatar;

#[async_trait]
impl AvatarControl for LoggingAvatar {
    async fn set_expression(&self, tag: &str) -> Result<String, ActionError> {
        let tag = tag.to_uppercase();
        tracing::info!("[Actions/Avatar] Expression -> {}", tag);
        Ok(format!("Character expression set to {}", tag))
    }
}
