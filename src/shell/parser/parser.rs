use std::fmt;
use std::path::PathBuf;

use super::ast::{CommandTree, CompoundCommand, SimpleCommand};
use super::lexer::{Lexer, RedirectOp, Token};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 空行
    Empty,
    ExpectedCommand,
    ExpectedFilename(RedirectOp),
    DuplicateRedirection(RedirectOp),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::ExpectedCommand => write!(f, "expected command name"),
            ParseError::ExpectedFilename(op) => {
                write!(f, "expected filename after '{}'", op.symbol())
            }
            ParseError::DuplicateRedirection(op) => {
                write!(f, "duplicate '{}' redirection", op.symbol())
            }
        }
    }
}

impl std::error::Error for ParseError {}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token();
        Parser {
            lexer,
            current_token,
        }
    }

    fn next_token(&mut self) {
        self.current_token = self.lexer.next_token();
    }

    /// 解析整行输入
    pub fn parse_command(&mut self) -> Result<CommandTree, ParseError> {
        if self.current_token == Token::EOF {
            return Err(ParseError::Empty);
        }
        self.parse_pipeline()
    }

    // pipeline := simple ('|' pipeline)?
    fn parse_pipeline(&mut self) -> Result<CommandTree, ParseError> {
        let left = CommandTree::Simple(self.parse_simple_command()?);

        if self.current_token == Token::Pipe {
            self.next_token();
            let right = self.parse_pipeline()?;
            return Ok(CommandTree::Compound(CompoundCommand::pipe(left, right)));
        }

        Ok(left)
    }

    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let mut command = SimpleCommand::default();

        // 解析参数和重定向，重定向可以出现在任意位置
        loop {
            match &self.current_token {
                Token::EOF | Token::Pipe => break,
                Token::Redirect(op) => {
                    let op = *op;
                    let filename = self.parse_redirection(op)?;
                    let slot = match op {
                        RedirectOp::Input => &mut command.input,
                        RedirectOp::Output => &mut command.output,
                        RedirectOp::Error => &mut command.error,
                    };
                    if slot.is_some() {
                        return Err(ParseError::DuplicateRedirection(op));
                    }
                    *slot = Some(filename);
                }
                Token::Word(word) => {
                    command.args.push(word.clone());
                    self.next_token();
                }
            }
        }

        if command.args.is_empty() {
            return Err(ParseError::ExpectedCommand);
        }
        Ok(command)
    }

    fn parse_redirection(&mut self, operator: RedirectOp) -> Result<PathBuf, ParseError> {
        self.next_token(); // 跳过重定向操作符

        match &self.current_token {
            Token::Word(filename) if !filename.is_empty() => {
                let path = PathBuf::from(filename);
                self.next_token();
                Ok(path)
            }
            _ => Err(ParseError::ExpectedFilename(operator)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<CommandTree, ParseError> {
        Parser::new(input).parse_command()
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_simple_command() {
        match parse("ls -l").unwrap() {
            CommandTree::Simple(cmd) => {
                assert_eq!(cmd.args, vec!["ls", "-l"]);
                assert!(cmd.input.is_none());
                assert!(cmd.output.is_none());
                assert!(cmd.error.is_none());
            }
            _ => panic!("Expected simple command"),
        }
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_pipeline() {
        match parse("ls -l | grep foo").unwrap() {
            CommandTree::Compound(cmd) => {
                assert_eq!(*cmd.left, CommandTree::Simple(SimpleCommand::new(["ls", "-l"])));
                assert_eq!(*cmd.right, CommandTree::Simple(SimpleCommand::new(["grep", "foo"])));
            }
            _ => panic!("Expected pipeline"),
        }
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_pipeline_is_right_recursive() {
        match parse("a | b | c").unwrap() {
            CommandTree::Compound(outer) => {
                assert_eq!(*outer.left, CommandTree::Simple(SimpleCommand::new(["a"])));
                match *outer.right {
                    CommandTree::Compound(inner) => {
                        assert_eq!(*inner.left, CommandTree::Simple(SimpleCommand::new(["b"])));
                        assert_eq!(*inner.right, CommandTree::Simple(SimpleCommand::new(["c"])));
                    }
                    _ => panic!("Expected nested pipeline"),
                }
            }
            _ => panic!("Expected pipeline"),
        }
    }

    #[allow(clippy::unwrap_used)]
    #[test]
    fn test_redirection() {
        match parse("sort < in.txt > out.txt 2> err.txt -r").unwrap() {
            CommandTree::Simple(cmd) => {
                assert_eq!(cmd.args, vec!["sort", "-r"]);
                assert_eq!(cmd.input, Some(PathBuf::from("in.txt")));
                assert_eq!(cmd.output, Some(PathBuf::from("out.txt")));
                assert_eq!(cmd.error, Some(PathBuf::from("err.txt")));
            }
            _ => panic!("Expected command with redirection"),
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("ls |"), Err(ParseError::ExpectedCommand));
        assert_eq!(parse("| ls"), Err(ParseError::ExpectedCommand));
        assert_eq!(parse("> out.txt"), Err(ParseError::ExpectedCommand));
        assert_eq!(
            parse("ls >"),
            Err(ParseError::ExpectedFilename(RedirectOp::Output))
        );
        assert_eq!(
            parse("cat < a < b"),
            Err(ParseError::DuplicateRedirection(RedirectOp::Input))
        );
    }

    #[test]
    fn test_errors_compare_by_operator() {
        fn same<T: Eq>(a: T, b: T) -> bool {
            a == b
        }
        assert!(same(
            ParseError::ExpectedFilename(RedirectOp::Error),
            ParseError::ExpectedFilename(RedirectOp::Error)
        ));
        assert!(!same(
            ParseError::DuplicateRedirection(RedirectOp::Input),
            ParseError::DuplicateRedirection(RedirectOp::Output)
        ));
    }
}
