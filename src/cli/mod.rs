pub mod commands;
pub mod handlers;

pub use commands::{CliArgs, Commands, GenerateArgs, OutputFormatArg, WeighArgs};
pub use handlers::{emit, handle_generate, handle_weigh};
