use log::debug;
use std::io::Write;
use std::process;

use crate::shell::Shell;
use crate::utils::config::Config;
use crate::utils::log::init_logger;

mod shell;
mod utils;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new();
    init_logger(&config);
    debug!("配置加载成功 {}", config.config_dir.display());

    let code = Shell::new(&config).run()?;
    std::io::stdout().flush()?;
    process::exit(code)
}
