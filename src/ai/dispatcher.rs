//! Command dispatch: one directive in, one human-readable result out.
//!
//! Every command runs behind its own failure boundary. A collaborator error
//! or panic turns into an `Error with command ...` string and never stops the
//! commands after it.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use crate::actions::{ActionError, AvatarControl, EnvironmentControl};
use crate::ai::light::LightDirective;
use crate::ai::markers::{Command, CommandKind};
use crate::utils::panic::panic_message;

pub struct CommandDispatcher {
    environment: Arc<dyn EnvironmentControl>,
    avatar: Arc<dyn AvatarControl>,
}

impl CommandDispatcher {
    pub fn new(environment: Arc<dyn EnvironmentControl>, avatar: Arc<dyn AvatarControl>) -> Self {
        Self { environment, avatar }
    }

    pub async fn dispatch(&self, command: &Command) -> String {
        tracing::debug!("[Dispatch] {}", command.raw_line);

        match AssertUnwindSafe(self.execute(command)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                tracing::warn!("[Dispatch] {} failed: {}", command.kind, e);
                format!("Error with command {}: {}", command.kind, e)
            }
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                tracing::error!("[Dispatch] {} panicked: {}", command.kind, detail);
                format!("Error with command {}: {}", command.kind, detail)
            }
        }
    }

    async fn execute(&self, command: &Command) -> Result<String, ActionError> {
        match command.kind {
            CommandKind::Light => {
                let directive = LightDirective::parse(&command.raw_line);
                directive.log_defaults(&command.raw_line);
                self.environment
                    .control_light(
                        directive.name.value(),
                        *directive.power.value(),
                        directive.brightness.map(|f| f.into_value()),
                        directive.color.map(|f| f.into_value()),
                    )
                    .await
            }
            CommandKind::Tv => self.environment.control_tv(&command.raw_line).await,
            CommandKind::Status => self.environment.get_status().await,
            CommandKind::Expression => match expression_tag(&command.raw_line) {
                Some(tag) => self.avatar.set_expression(tag).await,
                None => Ok(format!(
                    "Error:Invalid EXPRESSION command format: {}",
                    command.raw_line
                )),
            },
        }
    }
}

/// Tag of an `EXPRESSION:<tag>` line; `None` when missing or blank.
pub fn expression_tag(line: &str) -> Option<&str> {
    line.split(':')
        .nth(1)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{HueSat, LoggingAvatar, PowerState};
    use crate::ai::markers::extract_commands;
    use crate::test_support::{EnvCall, RecordingEnvironment};

    fn dispatcher(env: Arc<RecordingEnvironment>) -> CommandDispatcher {
        CommandDispatcher::new(env, Arc::new(LoggingAvatar))
    }

    #[tokio::test]
    async fn light_directive_is_parsed_and_forwarded() {
        let env = Arc::new(RecordingEnvironment::default());
        let result = dispatcher(env.clone())
            .dispatch(&Command::new(
                CommandKind::Light,
                "LIGHT:wiz:ON:brightness=80:color=0,255,0",
            ))
            .await;

        assert_eq!(result, "light wiz on");
        assert_eq!(
            env.calls(),
            vec![EnvCall::Light {
                name: "wiz".to_string(),
                power: PowerState::On,
                brightness: Some(80),
                color: Some(HueSat::new(120, 100)),
            }]
        );
    }

    #[tokio::test]
    async fn bad_brightness_still_dispatches_with_default() {
        let env = Arc::new(RecordingEnvironment::default());
        let result = dispatcher(env.clone())
            .dispatch(&Command::new(CommandKind::Light, "LIGHT:wiz:ON:brightness=abc"))
            .await;

        assert!(!result.starts_with("Error"));
        assert_eq!(
            env.calls(),
            vec![EnvCall::Light {
                name: "wiz".to_string(),
                power: PowerState::On,
                brightness: Some(50),
                color: None,
            }]
        );
    }

    #[tokio::test]
    async fn tv_gets_the_full_line_and_status_ignores_payload() {
        let env = Arc::new(RecordingEnvironment::default());
        let d = dispatcher(env.clone());
        d.dispatch(&Command::new(CommandKind::Tv, "TV:ON")).await;
        d.dispatch(&Command::new(CommandKind::Status, "STATUS:whatever")).await;
        assert_eq!(env.calls(), vec![EnvCall::Tv("TV:ON".to_string()), EnvCall::Status]);
    }

    #[tokio::test]
    async fn expression_goes_to_avatar() {
        let env = Arc::new(RecordingEnvironment::default());
        let result = dispatcher(env)
            .dispatch(&Command::new(CommandKind::Expression, "EXPRESSION:happy"))
            .await;
        assert_eq!(result, "Character expression set to HAPPY");
    }

    #[tokio::test]
    async fn empty_expression_tag_is_a_format_error() {
        let env = Arc::new(RecordingEnvironment::default());
        let result = dispatcher(env)
            .dispatch(&Command::new(CommandKind::Expression, "EXPRESSION:  "))
            .await;
        assert_eq!(result, "Error:Invalid EXPRESSION command format: EXPRESSION:  ");
    }

    #[tokio::test]
    async fn collaborator_error_becomes_result_string() {
        let env = Arc::new(RecordingEnvironment::failing_tv());
        let result = dispatcher(env)
            .dispatch(&Command::new(CommandKind::Tv, "TV:ON"))
            .await;
        assert_eq!(result, "Error with command tv: unavailable: tv offline");
    }

    #[tokio::test]
    async fn panic_is_contained_per_command() {
        let env = Arc::new(RecordingEnvironment::panicking_status());
        let d = dispatcher(env.clone());

        let commands = extract_commands("TV:ON\nSTATUS:check\nEXPRESSION:smug");
        let mut results = Vec::new();
        for command in &commands {
            results.push(d.dispatch(command).await);
        }

        assert_eq!(results.len(), 3);
        assert_eq!(results[0], "tv TV:ON");
        assert_eq!(results[1], "Error with command status: status sensor exploded");
        assert_eq!(results[2], "Character expression set to SMUG");
    }

    #[test]
    fn expression_tag_extraction() {
        assert_eq!(expression_tag("EXPRESSION:smug"), Some("smug"));
        assert_eq!(expression_tag("EXPRESSION: smug "), Some("smug"));
        assert_eq!(expression_tag("EXPRESSION:"), None);
        assert_eq!(expression_tag("EXPRESSION"), None);
    }
}
