pub mod actions;
pub mod cli;
pub mod gemini;
pub mod github;
pub mod http;
pub mod load_config;

pub use cli::{run, Cli, Commands};
