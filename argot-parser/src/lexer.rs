//! A lexer for classifying tokens from a command line.

/// Defines a `Token` that has been read from the command line. Keys and flags only store the
/// identifier, not the hyphens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token<'a> {
    /// Terminator (i.e. `--`), closes the open key if any.
    Terminator,

    /// A single character flag (e.g. -v).
    Flag(char),

    /// A key opener (e.g. --verbose).
    Key(&'a str),

    /// Value (i.e. everything that is not a terminator, a flag or a key).
    Value(&'a str),
}

impl<'a> Token<'a> {
    /// Classify the given input string.
    pub fn classify(input: &'a str) -> Self {
        if Self::is_terminator(input) {
            return Token::Terminator;
        }

        if let Some(c) = Self::flag_char(input) {
            return Token::Flag(c);
        }

        if Self::is_key(input) {
            let (_, name) = input.split_at(2);
            return Token::Key(name);
        }

        Token::Value(input)
    }

    /// Evaluate if the token string is a terminator.
    #[inline(always)]
    pub fn is_terminator(input: &str) -> bool {
        input == "--"
    }

    /// Evaluate if the token string is a flag.
    #[inline(always)]
    pub fn is_flag(input: &str) -> bool {
        Self::flag_char(input).is_some()
    }

    /// Evaluate if the token string opens a key.
    #[inline(always)]
    pub fn is_key(input: &str) -> bool {
        input.starts_with("--") && input.len() > 2
    }

    /// Extract the flag character if the input is a single dash followed by exactly one
    /// character.
    fn flag_char(input: &str) -> Option<char> {
        let mut chars = input.strip_prefix('-')?.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) if c != '-' => Some(c),
            _ => None,
        }
    }
}

/// Defines an iterator over classified tokens, along with their 1-based position in the command
/// line.
#[derive(Clone, Debug)]
pub struct Tokens<'a, S = &'a str> {
    argv: &'a [S],
    cursor: usize,
}

impl<'a, S: AsRef<str>> Tokens<'a, S> {
    /// Create a new lexer from the command line input.
    pub fn new(argv: &'a [S]) -> Self {
        Tokens { argv, cursor: 0 }
    }

    /// Number of tokens that have not been read yet.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.argv.len() - self.cursor
    }
}

impl<'a, S: AsRef<str>> Iterator for Tokens<'a, S> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let arg = self.argv.get(self.cursor)?;
        self.cursor += 1;

        Some((self.cursor, Token::classify(arg.as_ref())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl<S: AsRef<str>> ExactSizeIterator for Tokens<'_, S> {}

/// Conversion into a positional token stream.
pub trait IntoTokens<'a> {
    /// Token stream type.
    type Iter: Iterator<Item = (usize, Token<'a>)>;

    /// Convert into a token stream.
    fn into_tokens(self) -> Self::Iter;
}

impl<'a, S: AsRef<str>> IntoTokens<'a> for Tokens<'a, S> {
    type Iter = Self;

    fn into_tokens(self) -> Self::Iter {
        self
    }
}

impl<'a, S: AsRef<str>> IntoTokens<'a> for &'a [S] {
    type Iter = Tokens<'a, S>;

    fn into_tokens(self) -> Self::Iter {
        Tokens::new(self)
    }
}

impl<'a, S: AsRef<str>, const N: usize> IntoTokens<'a> for &'a [S; N] {
    type Iter = Tokens<'a, S>;

    fn into_tokens(self) -> Self::Iter {
        Tokens::new(self.as_slice())
    }
}
