pub mod config;
pub mod protocol;
pub mod server;
pub mod session;

pub use config::{load_config, RelayConfig};
pub use protocol::{InboundEvent, OutboundMessage};
pub use server::{routes, serve, RelayError};
pub use session::RelaySession;

#[cfg(test)]
mod tests;
