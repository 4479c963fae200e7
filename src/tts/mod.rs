pub mod config;
pub mod interface;
pub mod local_gpt_sovits;

pub use config::{load_config, TtsConfig};
pub use interface::{TtsError, TtsProvider};
pub use local_gpt_sovits::GptSovitsProvider;
