use std::fmt;
use std::path::{Path, PathBuf};

use log::debug;
use nix::unistd;

use crate::shell::parser::ast::SimpleCommand;
use crate::utils::path::is_relative;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    None,
    Cd,
    Exit,
}

impl BuiltinKind {
    /// 只看第一个参数，区分大小写
    pub fn classify(command: &SimpleCommand) -> Self {
        match command.program() {
            Some("cd") => BuiltinKind::Cd,
            Some("exit") => BuiltinKind::Exit,
            _ => BuiltinKind::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BuiltinKind::None => "",
            BuiltinKind::Cd => "cd",
            BuiltinKind::Exit => "exit",
        }
    }
}

/// 进程的当前工作目录。`cd` 改变的是操作系统层面的进程状态，
/// 子进程在 fork 时继承各自的副本。
pub trait WorkingDir {
    fn current(&self) -> nix::Result<PathBuf>;
    fn change(&mut self, path: &Path) -> nix::Result<()>;
}

pub struct ProcessDir;

impl WorkingDir for ProcessDir {
    fn current(&self) -> nix::Result<PathBuf> {
        unistd::getcwd()
    }

    fn change(&mut self, path: &Path) -> nix::Result<()> {
        unistd::chdir(path)
    }
}

#[derive(Debug, PartialEq)]
pub enum CdError {
    Usage,
    TooLong { len: usize, max: usize },
    Os { path: String, errno: nix::Error },
}

impl fmt::Display for CdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdError::Usage => write!(f, "usage: cd <path>"),
            CdError::TooLong { len, max } => {
                write!(f, "path too long ({} >= {})", len, max)
            }
            CdError::Os { path, errno } => write!(f, "{}: {}", path, errno.desc()),
        }
    }
}

impl std::error::Error for CdError {}

/// `cd <path>`，相对路径按 `cwd + '/' + path` 计算长度
pub fn execute_cd(
    args: &[String],
    max_path_len: usize,
    dir: &mut impl WorkingDir,
) -> Result<(), CdError> {
    let path = match args {
        [cd, path] if cd == "cd" => path,
        _ => return Err(CdError::Usage),
    };

    let len = if is_relative(path) {
        let cwd = dir.current().map_err(|errno| CdError::Os {
            path: ".".to_string(),
            errno,
        })?;
        cwd.as_os_str().len() + 1 + path.len()
    } else {
        path.len()
    };
    if len >= max_path_len {
        return Err(CdError::TooLong {
            len,
            max: max_path_len,
        });
    }

    debug!("切换工作目录: {}", path);
    dir.change(Path::new(path)).map_err(|errno| CdError::Os {
        path: path.clone(),
        errno,
    })
}
