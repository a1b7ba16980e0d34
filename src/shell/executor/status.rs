use std::fmt;

pub const EXIT_SUCCESS: i32 = libc::EXIT_SUCCESS;
pub const EXIT_FAILURE: i32 = libc::EXIT_FAILURE;

/// 命令执行结果，沿递归调用逐层返回给交互循环
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Code(i32),
    /// `exit` 内建命令请求结束解释器
    Terminate,
}

impl ExitStatus {
    pub const SUCCESS: ExitStatus = ExitStatus::Code(EXIT_SUCCESS);
    pub const FAILURE: ExitStatus = ExitStatus::Code(EXIT_FAILURE);

    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Code(code) => *code,
            ExitStatus::Terminate => EXIT_SUCCESS,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Code(EXIT_SUCCESS))
    }

    pub fn is_terminate(&self) -> bool {
        matches!(self, ExitStatus::Terminate)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Code(code) => write!(f, "{}", code),
            ExitStatus::Terminate => write!(f, "exit"),
        }
    }
}
