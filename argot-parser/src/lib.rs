//! Tokenizer and typed parsers for command line arguments.
#![deny(missing_docs)]

pub mod args;
pub mod error;
pub mod from_arg;
pub mod lexer;
pub mod parser;

pub use args::{ParsedArguments, Warning, WarningKind};
pub use error::Error;
pub use from_arg::{Format, FromArg};
pub use lexer::{Token, Tokens};
pub use parser::{Failures, Key, Parser, parsers};
