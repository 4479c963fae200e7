//! Turn orchestration: prompt the model once, then either parse the
//! structured action or run the freeform directives in order.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use crate::ai::action::{parse_action, CharacterAction};
use crate::ai::dispatcher::{expression_tag, CommandDispatcher};
use crate::ai::markers::{extract_commands, strip_markers, CommandKind};
use crate::ai::model_client::ModelClient;
use crate::llm::ResponseMode;
use crate::utils::panic::panic_message;

pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_DISPATCH_PACING: Duration = Duration::from_millis(2000);

pub const NO_ACTIONS_MESSAGE: &str = "I understand, but I don't see any actions to take.";
const RESULT_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Structured(CharacterAction),
    Freeform(FreeformTurn),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreeformTurn {
    /// Dispatch results joined by `" | "`, or the first line when there
    /// were no directives.
    pub summary: String,
    /// Marker-free prose, for speech.
    pub reply: String,
    /// Tag of the last `EXPRESSION:` directive.
    pub expression: Option<String>,
}

impl FreeformTurn {
    fn failed(detail: &str) -> Self {
        let summary = format!("Error processing request: {}", detail);
        Self {
            reply: summary.clone(),
            summary,
            expression: None,
        }
    }
}

pub struct TurnOrchestrator {
    client: ModelClient,
    dispatcher: CommandDispatcher,
    turn_timeout: Duration,
    dispatch_pacing: Duration,
}

impl TurnOrchestrator {
    pub fn new(client: ModelClient, dispatcher: CommandDispatcher) -> Self {
        Self {
            client,
            dispatcher,
            turn_timeout: DEFAULT_TURN_TIMEOUT,
            dispatch_pacing: DEFAULT_DISPATCH_PACING,
        }
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    pub fn with_dispatch_pacing(mut self, pacing: Duration) -> Self {
        self.dispatch_pacing = pacing;
        self
    }

    pub fn mode(&self) -> ResponseMode {
        self.client.mode()
    }

    /// One full turn. Never panics; any failure becomes a visible outcome.
    pub async fn run_turn(&self, user_text: &str) -> TurnOutcome {
        match AssertUnwindSafe(self.run_turn_inner(user_text))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                tracing::error!("[Turn] Turn panicked: {}", detail);
                match self.mode() {
                    ResponseMode::Structured => {
                        TurnOutcome::Structured(CharacterAction::internal_error(&detail))
                    }
                    ResponseMode::Freeform => TurnOutcome::Freeform(FreeformTurn::failed(&detail)),
                }
            }
        }
    }

    async fn run_turn_inner(&self, user_text: &str) -> TurnOutcome {
        tracing::info!("[Turn] User: {}", user_text);
        let raw = self.request_model(user_text).await;

        match self.mode() {
            ResponseMode::Structured => {
                let action = parse_action(raw.as_deref());
                tracing::info!(
                    "[Turn] Action: expression={} gesture={}",
                    action.expression,
                    action.gesture
                );
                TurnOutcome::Structured(action)
            }
            ResponseMode::Freeform => {
                TurnOutcome::Freeform(self.process_commands(raw.as_deref().unwrap_or("")).await)
            }
        }
    }

    async fn request_model(&self, user_text: &str) -> Option<String> {
        match tokio::time::timeout(self.turn_timeout, self.client.send_prompt(user_text)).await {
            Ok(raw) => raw,
            Err(_) => {
                tracing::error!(
                    "[Turn] Model call exceeded {}s, abandoning",
                    self.turn_timeout.as_secs_f32()
                );
                None
            }
        }
    }

    /// Run the directives in `raw` in order, pacing between them.
    pub async fn process_commands(&self, raw: &str) -> FreeformTurn {
        let commands = extract_commands(raw);
        let reply = strip_markers(raw);

        if commands.is_empty() {
            let first_line = raw.split('\n').next().unwrap_or("").trim();
            let summary = if first_line.is_empty() {
                NO_ACTIONS_MESSAGE.to_string()
            } else {
                first_line.to_string()
            };
            return FreeformTurn {
                summary,
                reply,
                expression: None,
            };
        }

        let expression = commands
            .iter()
            .rev()
            .filter(|c| c.kind == CommandKind::Expression)
            .find_map(|c| expression_tag(&c.raw_line))
            .map(str::to_string);

        let mut results = Vec::with_capacity(commands.len());
        for (i, command) in commands.iter().enumerate() {
            if i > 0 && !self.dispatch_pacing.is_zero() {
                tokio::time::sleep(self.dispatch_pacing).await;
            }
            results.push(self.dispatcher.dispatch(command).await);
        }

        FreeformTurn {
            summary: results.join(RESULT_SEPARATOR),
            reply,
            expression,
        }
    }
}
