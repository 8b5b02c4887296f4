//! Typed parsers for extracting values from parsed arguments.
//!
//! A parser receives the values of a key (or `None` if the key has never been mentioned) along
//! with the presence of the flag aliasing the key, and returns a typed value or `None`. Parsers
//! are stateless and compose like functions.

use core::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::args::ParsedArguments;
use crate::error::Error;
use crate::from_arg::{Format, FromArg};

/// Defines a parser over the values of a single key.
pub trait Parser<'a> {
    /// Parsed value type.
    type Output;

    /// Parse the values of a key. Absence of a result is not an error.
    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<Self::Output>;

    /// Transform the parsed value.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { parser: self, f }
    }

    /// Transform the parsed value with a fallible function.
    fn and_then<F, U>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Option<U>,
    {
        AndThen { parser: self, f }
    }

    /// Fall back to another parser when this one finds nothing.
    fn or<P>(self, other: P) -> Or<Self, P>
    where
        Self: Sized,
        P: Parser<'a, Output = Self::Output>,
    {
        Or {
            first: self,
            second: other,
        }
    }

    /// Fall back to a constant when this parser finds nothing. The resulting parser always
    /// yields a value.
    fn or_value(self, value: Self::Output) -> OrValue<Self, Self::Output>
    where
        Self: Sized,
        Self::Output: Clone,
    {
        OrValue {
            parser: self,
            value,
        }
    }
}

impl<'a, F, T> Parser<'a> for F
where
    F: Fn(Option<&'a [String]>, bool) -> Option<T>,
{
    type Output = T;

    #[inline(always)]
    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<T> {
        self(values, flag)
    }
}

/// Returns the values unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Raw;

impl<'a> Parser<'a> for Raw {
    type Output = &'a [String];

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        values
    }
}

/// Returns the first value that is not empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstNonEmpty;

impl<'a> Parser<'a> for FirstNonEmpty {
    type Output = &'a str;

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        first_non_empty_of(values)
    }
}

#[inline(always)]
fn first_non_empty_of(values: Option<&[String]>) -> Option<&str> {
    values?.iter().map(String::as_str).find(|x| !x.is_empty())
}

/// Returns `true` if the key has been mentioned or its flag alias is set. Never absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct Flag;

impl<'a> Parser<'a> for Flag {
    type Output = bool;

    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<Self::Output> {
        Some(values.is_some() || flag)
    }
}

/// Returns the first value that parses as `T`.
#[derive(Clone, Copy, Debug)]
pub struct Value<T> {
    format: Format,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Value<T> {
    /// Create a parser with the default format.
    pub const fn new() -> Self {
        Self::with_format(Format::DEFAULT)
    }

    /// Create a parser that hands the given format to [`FromArg::from_arg`].
    pub const fn with_format(format: Format) -> Self {
        Value {
            format,
            _ty: PhantomData,
        }
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: FromArg> Parser<'a> for Value<T> {
    type Output = T;

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        values?.iter().find_map(|x| T::from_arg(x, &self.format))
    }
}

/// Defines what [`Values`] does with the values that cannot be parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Failures {
    /// Leave them out.
    #[default]
    Skip,

    /// Yield `None` in their place, so that items match the values one to one.
    Keep,
}

/// Returns a lazy iterator over the values parsed as `T`.
#[derive(Clone, Copy, Debug)]
pub struct Values<T> {
    format: Format,
    failures: Failures,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Values<T> {
    /// Create a parser with the default format.
    pub const fn new(failures: Failures) -> Self {
        Self::with_format(failures, Format::DEFAULT)
    }

    /// Create a parser that hands the given format to [`FromArg::from_arg`].
    pub const fn with_format(failures: Failures, format: Format) -> Self {
        Values {
            format,
            failures,
            _ty: PhantomData,
        }
    }
}

impl<'a, T: FromArg> Parser<'a> for Values<T> {
    type Output = ParseAll<'a, T>;

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        Some(ParseAll {
            values: values?.iter(),
            format: self.format,
            failures: self.failures,
            _ty: PhantomData,
        })
    }
}

/// Lazy iterator returned by [`Values`]. Items are `None` only with [`Failures::Keep`].
#[derive(Clone, Debug)]
pub struct ParseAll<'a, T> {
    values: core::slice::Iter<'a, String>,
    format: Format,
    failures: Failures,
    _ty: PhantomData<fn() -> T>,
}

impl<T: FromArg> Iterator for ParseAll<'_, T> {
    type Item = Option<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let parsed = T::from_arg(self.values.next()?, &self.format);

            if parsed.is_some() || self.failures == Failures::Keep {
                return Some(parsed);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (_, upper) = self.values.size_hint();

        match self.failures {
            Failures::Skip => (0, upper),
            Failures::Keep => self.values.size_hint(),
        }
    }
}

/// Returns the absolute path of the first non-empty value as a directory, creating it if it does
/// not exist. Filesystem errors are logged and result in `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FolderPath;

impl<'a> Parser<'a> for FolderPath {
    type Output = PathBuf;

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        let path = first_non_empty_of(values)?;

        resolve_folder(Path::new(path))
            .inspect_err(|err| log::warn!("cannot resolve folder `{path}`: {err}"))
            .ok()
    }
}

fn resolve_folder(path: &Path) -> std::io::Result<PathBuf> {
    let path = std::path::absolute(path)?;

    if !path.is_dir() {
        log::debug!("creating folder `{}`", path.display());
        std::fs::create_dir_all(&path)?;
    }

    dunce::canonicalize(&path)
}

/// Returns the absolute path of the first non-empty value if it names an existing file. Nothing
/// is created.
#[derive(Clone, Copy, Debug, Default)]
pub struct FilePath;

impl<'a> Parser<'a> for FilePath {
    type Output = PathBuf;

    fn parse(&self, values: Option<&'a [String]>, _: bool) -> Option<Self::Output> {
        let path = first_non_empty_of(values)?;

        match std::path::absolute(path) {
            Ok(path) if path.is_file() => dunce::canonicalize(&path)
                .inspect_err(|err| log::warn!("cannot resolve file `{}`: {err}", path.display()))
                .ok(),
            Ok(_) => None,
            Err(err) => {
                log::warn!("cannot resolve file `{path}`: {err}");
                None
            }
        }
    }
}

/// See [`Parser::map`].
#[derive(Clone, Copy, Debug)]
pub struct Map<P, F> {
    parser: P,
    f: F,
}

impl<'a, P, F, U> Parser<'a> for Map<P, F>
where
    P: Parser<'a>,
    F: Fn(P::Output) -> U,
{
    type Output = U;

    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<U> {
        self.parser.parse(values, flag).map(&self.f)
    }
}

/// See [`Parser::and_then`].
#[derive(Clone, Copy, Debug)]
pub struct AndThen<P, F> {
    parser: P,
    f: F,
}

impl<'a, P, F, U> Parser<'a> for AndThen<P, F>
where
    P: Parser<'a>,
    F: Fn(P::Output) -> Option<U>,
{
    type Output = U;

    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<U> {
        self.parser.parse(values, flag).and_then(&self.f)
    }
}

/// See [`Parser::or`].
#[derive(Clone, Copy, Debug)]
pub struct Or<P, Q> {
    first: P,
    second: Q,
}

impl<'a, P, Q> Parser<'a> for Or<P, Q>
where
    P: Parser<'a>,
    Q: Parser<'a, Output = P::Output>,
{
    type Output = P::Output;

    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<Self::Output> {
        self.first
            .parse(values, flag)
            .or_else(|| self.second.parse(values, flag))
    }
}

/// See [`Parser::or_value`].
#[derive(Clone, Copy, Debug)]
pub struct OrValue<P, T> {
    parser: P,
    value: T,
}

impl<'a, P, T> Parser<'a> for OrValue<P, T>
where
    P: Parser<'a, Output = T>,
    T: Clone,
{
    type Output = T;

    fn parse(&self, values: Option<&'a [String]>, flag: bool) -> Option<T> {
        self.parser
            .parse(values, flag)
            .or_else(|| Some(self.value.clone()))
    }
}

/// Shorthands for the predefined parsers.
pub mod parsers {
    use super::*;

    /// See [`Raw`].
    pub const fn raw() -> Raw {
        Raw
    }

    /// See [`FirstNonEmpty`].
    pub const fn first_non_empty() -> FirstNonEmpty {
        FirstNonEmpty
    }

    /// See [`Flag`].
    pub const fn flag() -> Flag {
        Flag
    }

    /// See [`Value`].
    pub const fn value<T: FromArg>() -> Value<T> {
        Value::new()
    }

    /// See [`Values`].
    pub const fn values<T: FromArg>(failures: Failures) -> Values<T> {
        Values::new(failures)
    }

    /// See [`FolderPath`].
    pub const fn folder_path() -> FolderPath {
        FolderPath
    }

    /// See [`FilePath`].
    pub const fn file_path() -> FilePath {
        FilePath
    }
}

/// Identifies an argument by its key and the single character flag aliasing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key<'k> {
    name: &'k str,
    alias: Option<char>,
}

impl<'k> Key<'k> {
    /// Create a key whose alias is the lowercased first character of its name.
    pub fn new(name: &'k str) -> Self {
        Key {
            name,
            alias: name.chars().next().and_then(|c| c.to_lowercase().next()),
        }
    }

    /// Override the alias.
    pub fn alias(self, alias: char) -> Self {
        Key {
            alias: Some(alias),
            ..self
        }
    }

    /// Name of the key, without hyphens.
    pub fn name(&self) -> &'k str {
        self.name
    }

    /// Flag character aliasing the key, if any.
    pub fn flag(&self) -> Option<char> {
        self.alias
    }
}

impl<'k> From<&'k str> for Key<'k> {
    fn from(name: &'k str) -> Self {
        Key::new(name)
    }
}

/// Entry points. Aliases are not checked for collisions across keys: two keys with the same
/// first letter share their default flag, so give one of them an explicit alias.
impl ParsedArguments {
    /// Apply the parser to the values and the flag alias of the key.
    pub fn try_get<'a, 'k, P>(&'a self, key: impl Into<Key<'k>>, parser: P) -> Option<P::Output>
    where
        P: Parser<'a>,
    {
        let key = key.into();
        let flag = key.flag().is_some_and(|c| self.has_flag(c));

        parser.parse(self.values(key.name()), flag)
    }

    /// Apply the parser, and fail with a default message if nothing is found.
    pub fn get<'a, 'k, P>(&'a self, key: impl Into<Key<'k>>, parser: P) -> Result<P::Output, Error>
    where
        P: Parser<'a>,
    {
        let key = key.into();
        self.try_get(key, parser)
            .ok_or_else(|| Error::missing(key.name()))
    }

    /// Apply the parser, and fail with the given message if nothing is found.
    pub fn get_with_message<'a, 'k, P>(
        &'a self,
        key: impl Into<Key<'k>>,
        parser: P,
        message: impl Into<String>,
    ) -> Result<P::Output, Error>
    where
        P: Parser<'a>,
    {
        let key = key.into();
        self.try_get(key, parser)
            .ok_or_else(|| Error::missing_with(key.name(), message))
    }

    /// Check if the key has been mentioned or if its default alias is set.
    pub fn get_flag(&self, key: &str) -> bool {
        self.try_get(key, Flag).unwrap_or_default()
    }

    /// Check if the key has been mentioned or if the given alias is set.
    pub fn get_flag_with_alias(&self, key: &str, alias: char) -> bool {
        self.try_get(Key::new(key).alias(alias), Flag)
            .unwrap_or_default()
    }
}
