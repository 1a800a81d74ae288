//! Command implementations.

mod config;
mod decode;
mod generate;
mod providers;

pub use config::execute_config_command;
pub use decode::execute_decode_command;
pub use generate::execute_generate_command;
pub use providers::execute_providers_command;
