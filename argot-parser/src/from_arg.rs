//! Types that can parse themselves from an argument value.

use std::borrow::Cow;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

/// Format hint given to [`FromArg`] implementations, mostly used for numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Format {
    /// Decimal separator.
    pub decimal: char,

    /// Digit group separator, removed before parsing if any.
    pub grouping: Option<char>,
}

impl Format {
    /// The default format: `.` as decimal separator and no digit grouping.
    pub const DEFAULT: Format = Format {
        decimal: '.',
        grouping: None,
    };

    /// Create a format with the given decimal separator.
    pub const fn with_decimal(decimal: char) -> Self {
        Format {
            decimal,
            grouping: None,
        }
    }

    /// Set the digit group separator.
    pub const fn grouping(self, grouping: char) -> Self {
        Format {
            grouping: Some(grouping),
            ..self
        }
    }

    /// Rewrite a number according to this format, so that it can be handled by
    /// [`str::parse`]. Returns `None` if the input holds a `.` that is neither the decimal nor the
    /// grouping separator.
    pub fn normalize<'a>(&self, input: &'a str) -> Option<Cow<'a, str>> {
        if *self == Self::DEFAULT {
            return Some(Cow::Borrowed(input));
        }

        let mut normalized = String::with_capacity(input.len());

        for c in input.chars() {
            if Some(c) == self.grouping {
                continue;
            }

            match c {
                c if c == self.decimal => normalized.push('.'),
                '.' => return None,
                c => normalized.push(c),
            }
        }

        Some(Cow::Owned(normalized))
    }
}

impl Default for Format {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Defines the capability of a type to attempt parsing itself from a string.
///
/// Implement this trait on your own types to make them usable with
/// [`Value`](crate::parser::Value) and [`Values`](crate::parser::Values) parsers.
///
/// The implementations of this crate ignore leading and trailing whitespace.
pub trait FromArg: Sized {
    /// Try to parse the input, or return `None` if it is not valid.
    fn from_arg(input: &str, format: &Format) -> Option<Self>;
}

macro_rules! make_from_arg_number_impl {
    ($($target:ty),* $(,)?) => {
        $(
            impl FromArg for $target {
                fn from_arg(input: &str, format: &Format) -> Option<Self> {
                    format.normalize(input.trim())?.parse().ok()
                }
            }
        )*
    };
}

macro_rules! make_from_arg_str_impl {
    ($($target:ty),* $(,)?) => {
        $(
            impl FromArg for $target {
                fn from_arg(input: &str, _: &Format) -> Option<Self> {
                    input.trim().parse().ok()
                }
            }
        )*
    };
}

make_from_arg_number_impl!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);

make_from_arg_str_impl!(char, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

impl FromArg for bool {
    fn from_arg(input: &str, _: &Format) -> Option<Self> {
        let input = input.trim();

        if input.eq_ignore_ascii_case("true") {
            Some(true)
        } else if input.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FromArg for String {
    fn from_arg(input: &str, _: &Format) -> Option<Self> {
        Some(input.trim().to_owned())
    }
}

impl FromArg for PathBuf {
    fn from_arg(input: &str, _: &Format) -> Option<Self> {
        let input = input.trim();

        if input.is_empty() {
            return None;
        }

        Some(PathBuf::from(input))
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn it_should_parse_numbers() {
        assert_that!(u32::from_arg("42", &Format::DEFAULT), eq(Some(42)));
        assert_that!(i8::from_arg(" -7 ", &Format::DEFAULT), eq(Some(-7)));
        assert_that!(u8::from_arg("256", &Format::DEFAULT), none());
        assert_that!(f64::from_arg("2.5", &Format::DEFAULT), eq(Some(2.5)));
    }

    #[test]
    fn it_should_parse_numbers_with_format() {
        let format = Format::with_decimal(',').grouping('.');

        assert_that!(f64::from_arg("1.234,5", &format), eq(Some(1234.5)));
        assert_that!(u32::from_arg("1.000.000", &format), eq(Some(1_000_000)));
        assert_that!(f64::from_arg("1.234,5", &Format::DEFAULT), none());
    }

    #[test]
    fn it_should_reject_dot_with_other_decimal_separator() {
        let format = Format::with_decimal(',');

        assert_that!(f64::from_arg("1.5", &format), none());
        assert_that!(u32::from_arg("1.000", &format), none());
        assert_that!(f64::from_arg("1,5", &format), eq(Some(1.5)));
        assert_that!(format.normalize("1.5").is_none(), eq(true));

        let format = Format::with_decimal(',').grouping(' ');
        assert_that!(f64::from_arg("1 000,5", &format), eq(Some(1000.5)));
        assert_that!(f64::from_arg("1 000.5", &format), none());
    }

    #[test]
    fn it_should_parse_bool_ignoring_case() {
        assert_that!(bool::from_arg("TRUE", &Format::DEFAULT), eq(Some(true)));
        assert_that!(bool::from_arg("False", &Format::DEFAULT), eq(Some(false)));
        assert_that!(bool::from_arg("yes", &Format::DEFAULT), none());
    }

    #[test]
    fn it_should_parse_addresses() {
        assert_that!(
            IpAddr::from_arg("127.0.0.1", &Format::DEFAULT),
            eq(Some(IpAddr::V4(Ipv4Addr::LOCALHOST)))
        );
        assert_that!(SocketAddr::from_arg("localhost", &Format::DEFAULT), none());
    }

    #[test]
    fn it_should_ignore_surrounding_whitespace() {
        let format = Format::DEFAULT;

        assert_that!(char::from_arg(" x ", &format), eq(Some('x')));
        assert_that!(bool::from_arg(" true\n", &format), eq(Some(true)));
        assert_that!(u16::from_arg("\t80 ", &format), eq(Some(80)));
        assert_that!(
            Ipv4Addr::from_arg(" 10.0.0.1 ", &format),
            eq(Some(Ipv4Addr::new(10, 0, 0, 1)))
        );
        assert_that!(
            SocketAddr::from_arg(" 127.0.0.1:80", &format),
            eq(Some(SocketAddr::from(([127, 0, 0, 1], 80))))
        );
        assert_that!(String::from_arg("  argot ", &format), eq(&Some(String::from("argot"))));
        assert_that!(PathBuf::from_arg(" a/b ", &format), eq(&Some(PathBuf::from("a/b"))));
        assert_that!(PathBuf::from_arg("   ", &format), eq(&None));
    }

    #[test]
    fn it_should_reject_empty_path() {
        assert_that!(PathBuf::from_arg("", &Format::DEFAULT), eq(&None));
        assert_that!(
            PathBuf::from_arg("a/b", &Format::DEFAULT),
            eq(&Some(PathBuf::from("a/b")))
        );
    }
}
