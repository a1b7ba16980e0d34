use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(String),
    Pipe,
    Redirect(RedirectOp),
    EOF,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectOp {
    Input,  // <
    Output, // >
    Error,  // 2>
}

impl RedirectOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            RedirectOp::Input => "<",
            RedirectOp::Output => ">",
            RedirectOp::Error => "2>",
        }
    }
}

pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.chars().peekable(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        match self.peek_char() {
            None => Token::EOF,
            Some(c) => match c {
                '|' => {
                    self.read_char();
                    Token::Pipe
                }
                '<' => {
                    self.read_char();
                    Token::Redirect(RedirectOp::Input)
                }
                '>' => {
                    self.read_char();
                    Token::Redirect(RedirectOp::Output)
                }
                _ => self.read_word(),
            },
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.read_char();
        }
    }

    // 引号可以出现在单词中间，如 a"b c"d 读作一个单词
    fn read_word(&mut self) -> Token {
        let mut word = String::new();
        let mut quoted = false;

        while let Some(c) = self.peek_char() {
            if c.is_whitespace() || "<>|".contains(c) {
                break;
            }
            match c {
                '"' | '\'' => {
                    quoted = true;
                    self.read_quoted(&mut word);
                }
                '\\' => {
                    self.read_char();
                    if let Some(escaped) = self.read_char() {
                        word.push(escaped);
                    }
                    quoted = true;
                }
                _ => word.push(self.read_char().unwrap_or_default()),
            }
        }

        // 未加引号的 2 紧跟 > 表示标准错误重定向
        if !quoted && word == "2" && self.peek_char() == Some('>') {
            self.read_char();
            return Token::Redirect(RedirectOp::Error);
        }

        Token::Word(word)
    }

    fn read_quoted(&mut self, string: &mut String) {
        let quote = self.read_char().unwrap_or_default();
        let mut escaped = false;

        while let Some(c) = self.read_char() {
            match (escaped, c) {
                (true, _) => {
                    string.push(c);
                    escaped = false;
                }
                (false, '\\') if quote == '"' => escaped = true,
                (false, c) if c == quote => break,
                (false, c) => string.push(c),
            }
        }
    }
}
