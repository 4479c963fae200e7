pub mod config;
pub mod interface;
pub mod openai;
pub mod service;

pub use config::{load_config, SttConfig};
pub use interface::{SttEngine, SttError};
pub use service::SttService;
