use log::{debug, error, info, warn};
use std::error::Error;
use std::io::Write;

use crate::shell::executor::{Executor, ExitStatus};
use crate::shell::parser::{ParseError, Parser};
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::shell::signals;
use crate::shell::SHELL_NAME;
use crate::utils::config::Config;
use crate::utils::path;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    config: &'a Config,
    theme: Theme,
    readline: ReadlineManager<'a>,
    executor: Executor,
    /// 最近一条命令的退出码，读到输入结尾时作为进程退出码
    last_status: i32,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            theme: Theme::load_theme(&config.theme),
            readline: ReadlineManager::new(config),
            executor: Executor::new(config.max_path_len),
            last_status: 0,
        }
    }

    /// 运行交互循环，返回解释器的退出码
    pub fn run(&mut self) -> Result<i32, Box<dyn Error>> {
        debug!("初始化 {}...", SHELL_NAME);

        if self.readline.is_interactive() {
            // 忽略 Ctrl-C 等，由前台命令处理
            signals::ignore_shell_signals();
            self.readline.load_history()?;

            println!(
                "{}",
                (self.theme.success_style)(self.theme.get_message("welcome"))
            );
            println!(
                "{}",
                (self.theme.warning_style)(self.theme.get_message("help"))
            );
        }
        debug!("{} 准备就绪...", SHELL_NAME);

        self.run_loop()?;
        self.readline.save_history()?;

        debug!("退出 {}，退出码 {}", SHELL_NAME, self.last_status);
        Ok(self.last_status)
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            std::io::stdout().flush()?;
            let prompt = self.theme.prompt(&path::current_dir());

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    let status = match self.handle_input(&line)? {
                        Some(status) => status,
                        None => continue,
                    };
                    // exit 的退出码为 0
                    self.last_status = status.code();
                    if status.is_terminate() {
                        debug!("退出 {}...", SHELL_NAME);
                        if self.readline.is_interactive() {
                            println!(
                                "{}",
                                (self.theme.success_style)(self.theme.get_message("exit"))
                            );
                        }
                        break;
                    }
                }
                Err(err) => match err {
                    ReadlineError::Eof => {
                        debug!("接收到 EOF，退出 {}...", SHELL_NAME);
                        if self.readline.is_interactive() {
                            println!(
                                "\n{}",
                                (self.theme.warning_style)(self.theme.get_message("eof_signal"))
                            );
                        }
                        break;
                    }
                    ReadlineError::Interrupted => {
                        warn!("接收到中断信号...");
                        println!(
                            "\n{}",
                            (self.theme.warning_style)(self.theme.get_message("interrupt_signal"))
                        );
                    }
                    ReadlineError::Io(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                        // 这一行已被读走，跳过它继续
                        info!("跳过无效输入: {}", e);
                        eprintln!("{}: {}", SHELL_NAME, e);
                        self.last_status = ExitStatus::FAILURE.code();
                    }
                    err => {
                        error!("发生错误: {}", err);
                        eprintln!(
                            "{}: {}",
                            (self.theme.error_style)(self.theme.get_message("error")),
                            err
                        );
                        break;
                    }
                },
            }
        }
        Ok(())
    }

    /// 空行返回 None
    fn handle_input(&mut self, line: &str) -> Result<Option<ExitStatus>, Box<dyn Error>> {
        if line.trim().is_empty() {
            return Ok(None);
        }

        self.readline.add_history(line.to_string())?;
        let mut parser = Parser::new(line);
        let tree = match parser.parse_command() {
            Ok(tree) => tree,
            Err(ParseError::Empty) => return Ok(None),
            Err(e) => {
                info!("解析失败: {}: {}", line, e);
                eprintln!(
                    "{}: {}: {}",
                    SHELL_NAME,
                    (self.theme.error_style)(self.theme.get_message("parse_error")),
                    e
                );
                return Ok(Some(ExitStatus::FAILURE));
            }
        };

        // 命令树只在本次迭代内存在，执行完即释放
        let status = self.executor.execute(&tree);
        debug!("命令 `{}` 结束: {}", tree, status);
        self.report(status);
        Ok(Some(status))
    }

    fn report(&self, status: ExitStatus) {
        if !self.config.feedback || !self.readline.is_interactive() || status.is_terminate() {
            return;
        }
        if status.success() {
            println!(
                "{}",
                (self.theme.success_style)(self.theme.get_message("success_symbol"))
            );
        } else {
            eprintln!(
                "{} {}",
                (self.theme.error_style)(self.theme.get_message("error_symbol")),
                (self.theme.error_style)(format!(
                    "{} {}",
                    self.theme.get_message("command_error"),
                    status
                ))
            );
        }
    }
}
