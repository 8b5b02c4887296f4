//! Collect arguments from a token stream into an immutable look-up store.

use core::fmt;
use std::ffi::OsString;

use crate::lexer::{IntoTokens, Token};

/// Defines the syntactic irregularities that the tokenizer may report. They never stop
/// processing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum WarningKind {
    /// A terminator was read while no key was open.
    #[error("terminator with no open key to close")]
    UnmatchedTerminator,

    /// A value was read while no key was open.
    #[error("value encountered with no key to attach to")]
    OrphanValue,

    /// The argument is not valid Unicode. It has been read with replacement characters.
    #[error("argument is not valid unicode")]
    InvalidUnicode,
}

/// A warning tied to the 1-based position of the offending token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Warning {
    /// Position of the token in the command line, starting at 1.
    pub position: usize,

    /// What went wrong.
    pub kind: WarningKind,
}

impl Warning {
    /// Human readable description of the warning.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "argument {}: {}", self.position, self.kind)
    }
}

/// Defines the result of tokenization. This is a key-value store, a flag multiset and a list of
/// warnings, all fixed once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    values: Vec<(String, Vec<String>)>,
    flags: Vec<char>,
    warnings: Vec<Warning>,
}

/// Tokenizer state.
enum State {
    NoOpenKey,
    OpenKey(usize),
}

impl ParsedArguments {
    /// Tokenize the given command line. This never fails: irregular input only produces
    /// warnings.
    pub fn parse<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        Self::from_tokens(argv.as_slice())
    }

    /// Tokenize the arguments of the current process, without the program name.
    pub fn from_env() -> Self {
        Self::parse_os(std::env::args_os().skip(1))
    }

    /// Tokenize platform strings. Arguments that are not valid Unicode are converted lossily
    /// and reported as warnings.
    pub fn parse_os<I>(argv: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut invalid = Vec::new();

        let argv: Vec<String> = argv
            .into_iter()
            .enumerate()
            .map(|(i, arg)| {
                arg.into_string().unwrap_or_else(|arg| {
                    invalid.push(i + 1);
                    arg.to_string_lossy().into_owned()
                })
            })
            .collect();

        let mut out = Self::from_tokens(argv.as_slice());

        for position in invalid {
            out.warn(position, WarningKind::InvalidUnicode);
        }

        // Keep warnings ordered by position.
        out.warnings.sort_by_key(|x| x.position);
        out
    }

    /// Collect the arguments from a positional token stream.
    pub fn from_tokens<'a>(tokens: impl IntoTokens<'a>) -> Self {
        let mut out = Self::default();
        let mut state = State::NoOpenKey;

        for (position, token) in tokens.into_tokens() {
            state = match (token, state) {
                (Token::Terminator, State::OpenKey(_)) => State::NoOpenKey,

                (Token::Terminator, State::NoOpenKey) => {
                    out.warn(position, WarningKind::UnmatchedTerminator);
                    State::NoOpenKey
                }

                (Token::Flag(c), _) => {
                    out.flags.push(c);
                    State::NoOpenKey
                }

                (Token::Key(name), _) => State::OpenKey(out.open(name)),

                (Token::Value(value), State::OpenKey(index)) => {
                    // The index always comes from `open`.
                    if let Some((_, values)) = out.values.get_mut(index) {
                        values.push(value.to_owned());
                    }
                    State::OpenKey(index)
                }

                (Token::Value(_), State::NoOpenKey) => {
                    out.warn(position, WarningKind::OrphanValue);
                    State::NoOpenKey
                }
            };
        }

        out
    }

    /// Find or insert the key and return its index.
    fn open(&mut self, name: &str) -> usize {
        if let Some(index) = self.values.iter().position(|(key, _)| key == name) {
            return index;
        }

        self.values.push((name.to_owned(), Vec::new()));
        self.values.len() - 1
    }

    fn warn(&mut self, position: usize, kind: WarningKind) {
        let warning = Warning { position, kind };
        log::debug!("{warning}");
        self.warnings.push(warning);
    }

    /// Get the values of the given key, or `None` if the key has never been mentioned. A key
    /// mentioned without values yields an empty slice.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }

    /// Check if the key has been mentioned at least once, whatever its values.
    #[inline(always)]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }

    /// Iterate over the mentioned keys, in order of first mention.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }

    /// Check if the flag has been set at least once.
    #[inline(always)]
    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }

    /// Count how many times the flag has been set.
    pub fn flag_count(&self, flag: char) -> usize {
        self.flags.iter().filter(|&&c| c == flag).count()
    }

    /// All flags, in order of appearance, repetitions included.
    pub fn flags(&self) -> &[char] {
        &self.flags
    }

    /// All warnings, in order of appearance.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Forward the warnings to the logger.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            log::warn!("{warning}");
        }
    }
}
