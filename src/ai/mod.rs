pub mod action;
pub mod dispatcher;
pub mod light;
pub mod markers;
pub mod model_client;
pub mod orchestrator;
pub mod prompts;

pub use action::{parse_action, CharacterAction};
pub use dispatcher::CommandDispatcher;
pub use light::rgb_to_hsl;
pub use markers::{extract_commands, strip_markers, Command, CommandKind};
pub use model_client::ModelClient;
pub use orchestrator::{FreeformTurn, TurnOrchestrator, TurnOutcome};
pub use prompts::PromptContext;
