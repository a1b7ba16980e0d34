pub mod ast;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use lexer::RedirectOp;
pub use parser::{ParseError, Parser};
