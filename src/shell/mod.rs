mod executor;
mod parser;
mod readline;
#[allow(clippy::module_inception)]
mod shell;
mod signals;

pub use shell::Shell;

/// 诊断信息的前缀
pub const SHELL_NAME: &str = env!("CARGO_PKG_NAME");
