use log::{debug, error, info, warn};
use nix::unistd::{fork, pipe, ForkResult};
use std::ffi::CString;
use std::io::{self, Write};
use std::os::fd::{OwnedFd, RawFd};
use std::process;

use super::builtin::{self, BuiltinKind, ProcessDir};
use super::redirect;
use super::status::{ExitStatus, EXIT_FAILURE};
use super::wait;
use crate::shell::parser::ast::{CommandTree, CompoundCommand, Operator, SimpleCommand};
use crate::shell::signals;
use crate::shell::SHELL_NAME;

pub struct Executor {
    max_path_len: usize,
}

impl Executor {
    pub fn new(max_path_len: usize) -> Self {
        Self { max_path_len }
    }

    pub fn execute(&self, tree: &CommandTree) -> ExitStatus {
        debug!("执行命令: {}", tree);
        match tree {
            CommandTree::Simple(command) => self.execute_simple_command(command),
            CommandTree::Compound(command) => self.execute_complex_command(command),
        }
    }

    /// 前台执行一条简单命令；内建命令在当前进程内完成，不创建子进程
    pub fn execute_simple_command(&self, command: &SimpleCommand) -> ExitStatus {
        match BuiltinKind::classify(command) {
            BuiltinKind::Cd => {
                match builtin::execute_cd(&command.args, self.max_path_len, &mut ProcessDir) {
                    Ok(()) => ExitStatus::SUCCESS,
                    Err(e) => {
                        info!("cd 失败: {}", e);
                        eprintln!("{}: cd: {}", SHELL_NAME, e);
                        ExitStatus::FAILURE
                    }
                }
            }
            BuiltinKind::Exit => {
                debug!("收到 exit");
                ExitStatus::Terminate
            }
            BuiltinKind::None => {
                flush_stdio();
                // SAFETY: 解释器是单线程的，子进程只做重定向和 exec
                match unsafe { fork() } {
                    Err(e) => {
                        error!("fork 失败: {}", e);
                        eprintln!("{}: fork: {}", SHELL_NAME, e.desc());
                        ExitStatus::FAILURE
                    }
                    Ok(ForkResult::Child) => exec_external(command),
                    Ok(ForkResult::Parent { child }) => {
                        debug!("子进程 {} 执行: {}", child, command);
                        wait::wait_child(child)
                    }
                }
            }
        }
    }

    /// 执行由管道连接的复合命令，结果为最右侧一段的退出码
    pub fn execute_complex_command(&self, command: &CompoundCommand) -> ExitStatus {
        match command.operator {
            Operator::Pipe => self.execute_pipe(command),
        }
    }

    fn execute_pipe(&self, command: &CompoundCommand) -> ExitStatus {
        let (read_end, write_end) = match pipe() {
            Ok(ends) => ends,
            Err(e) => {
                error!("pipe 失败: {}", e);
                eprintln!("{}: pipe: {}", SHELL_NAME, e.desc());
                return ExitStatus::FAILURE;
            }
        };

        flush_stdio();
        // 左侧：标准输出接到写端
        // SAFETY: 同上，子进程只做描述符操作后递归或 exec
        let left = match unsafe { fork() } {
            Err(e) => {
                error!("fork 失败: {}", e);
                eprintln!("{}: fork: {}", SHELL_NAME, e.desc());
                return ExitStatus::FAILURE;
            }
            Ok(ForkResult::Child) => {
                drop(read_end);
                self.enter_stage(write_end, libc::STDOUT_FILENO, &command.left)
            }
            Ok(ForkResult::Parent { child }) => child,
        };

        // 右侧：标准输入接到读端
        let right = match unsafe { fork() } {
            Err(e) => {
                error!("fork 失败: {}", e);
                eprintln!("{}: fork: {}", SHELL_NAME, e.desc());
                drop(read_end);
                drop(write_end);
                wait::reap_all(left);
                return ExitStatus::FAILURE;
            }
            Ok(ForkResult::Child) => {
                drop(write_end);
                self.enter_stage(read_end, libc::STDIN_FILENO, &command.right)
            }
            Ok(ForkResult::Parent { child }) => child,
        };
        debug!("管道: 左 {} 右 {}", left, right);

        // 必须先关闭两端再等待，否则读端永远等不到 EOF
        drop(read_end);
        drop(write_end);
        wait::reap_all(right)
    }

    /// 管道中一段的子进程：接好管道一端后执行子树，不会返回
    fn enter_stage(&self, fd: OwnedFd, target: RawFd, tree: &CommandTree) -> ! {
        if let Err(e) = redirect::redirect_fd(fd, target) {
            error!("dup2 失败: {}", e);
            eprintln!("{}: dup2: {}", SHELL_NAME, e.desc());
            process::exit(EXIT_FAILURE);
        }
        self.run_stage(tree)
    }

    fn run_stage(&self, tree: &CommandTree) -> ! {
        match tree {
            CommandTree::Simple(command) => {
                let kind = BuiltinKind::classify(command);
                if kind != BuiltinKind::None {
                    // 管道中不执行内建命令
                    info!("管道中忽略内建命令: {}", command);
                    eprintln!(
                        "{}: {}: builtin not supported in a pipeline",
                        SHELL_NAME,
                        kind.name()
                    );
                    process::exit(EXIT_FAILURE);
                }
                exec_external(command)
            }
            CommandTree::Compound(command) => {
                let status = self.execute_complex_command(command);
                process::exit(status.code())
            }
        }
    }
}

/// fork 前清空缓冲，避免子进程重复输出
fn flush_stdio() {
    if let Err(e) = io::stdout().flush() {
        warn!("刷新 stdout 失败: {}", e);
    }
    if let Err(e) = io::stderr().flush() {
        warn!("刷新 stderr 失败: {}", e);
    }
}

/// 子进程中：恢复信号、应用重定向、替换程序映像。失败时以失败状态退出
fn exec_external(command: &SimpleCommand) -> ! {
    signals::restore_default_signals();

    if let Err(e) = redirect::apply_redirections(command) {
        eprintln!("{}: {}", SHELL_NAME, e);
        process::exit(EXIT_FAILURE);
    }

    let args = match command
        .args
        .iter()
        .map(|arg| CString::new(arg.as_bytes()))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(args) if !args.is_empty() => args,
        _ => {
            eprintln!("{}: invalid command: {}", SHELL_NAME, command);
            process::exit(EXIT_FAILURE);
        }
    };

    let program = &command.args[0];
    let err = match nix::unistd::execvp(&args[0], &args) {
        Err(e) => e,
        Ok(never) => match never {},
    };
    eprintln!("{}: {}: {}", SHELL_NAME, program, err.desc());
    process::exit(EXIT_FAILURE)
}
