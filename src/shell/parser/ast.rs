use std::fmt;
use std::path::{Path, PathBuf};

use super::lexer::RedirectOp;

/// 一行输入解析出的命令树：要么是简单命令，要么是由运算符连接的两棵子树
#[derive(Debug, Clone, PartialEq)]
pub enum CommandTree {
    Simple(SimpleCommand),
    Compound(CompoundCommand),
}

/// 单个程序调用，`args[0]` 为程序名
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleCommand {
    pub args: Vec<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub error: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Pipe,
}

/// `a | b | c` 按右递归表示为 `a | (b | c)`
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundCommand {
    pub operator: Operator,
    pub left: Box<CommandTree>,
    pub right: Box<CommandTree>,
}

impl SimpleCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    /// 已配置的重定向，按输入、输出、错误的顺序
    pub fn redirections(&self) -> impl Iterator<Item = (RedirectOp, &Path)> {
        [
            (RedirectOp::Input, &self.input),
            (RedirectOp::Output, &self.output),
            (RedirectOp::Error, &self.error),
        ]
        .into_iter()
        .filter_map(|(op, path)| path.as_deref().map(|path| (op, path)))
    }
}

impl CompoundCommand {
    pub fn pipe(left: CommandTree, right: CommandTree) -> Self {
        Self {
            operator: Operator::Pipe,
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Pipe => write!(f, "|"),
        }
    }
}

impl fmt::Display for SimpleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell_words::join(&self.args))?;
        for (op, path) in self.redirections() {
            write!(
                f,
                " {} {}",
                op.symbol(),
                shell_words::quote(&path.to_string_lossy())
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandTree::Simple(cmd) => write!(f, "{}", cmd),
            CommandTree::Compound(cmd) => write!(f, "{} {} {}", cmd.left, cmd.operator, cmd.right),
        }
    }
}
