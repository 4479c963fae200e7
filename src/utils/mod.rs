pub mod http;
pub mod panic;
