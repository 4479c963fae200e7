pub mod config;
pub mod home_assistant;
pub mod interface;
pub mod mock;

pub use config::{build_environment, EnvironmentConfig};
pub use interface::{ActionError, AvatarControl, EnvironmentControl, HueSat, PowerState};
pub use mock::{LoggingAvatar, MockEnvironment};
