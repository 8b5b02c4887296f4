//! argot, a tokenizer and typed parser combinators for command line arguments.
//!
//! ```
//! use argot::{Bindings, ParsedArguments};
//! use argot::parsers::{first_non_empty, value};
//!
//! let args = ParsedArguments::parse(["-v", "--port", "8080", "--name", "", "argot"]);
//!
//! assert_eq!(args.try_get("port", value::<u16>()), Some(8080));
//! assert_eq!(args.try_get("name", first_non_empty()), Some("argot"));
//! assert!(args.get_flag("verbose"));
//!
//! let mut port = 0u16;
//! Bindings::new()
//!     .required("port", value::<u16>(), |x| port = x)
//!     .apply(&args)?;
//! assert_eq!(port, 8080);
//! # Ok::<(), argot::Error>(())
//! ```
#![deny(missing_docs)]

pub use argot_parser as parser;

pub use parser::{
    Failures, Format, FromArg, Key, ParsedArguments, Parser, Warning, WarningKind, parsers,
};

pub mod bindings;

pub use bindings::Bindings;

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// An error comes from the parsing of arguments.
    #[error(transparent)]
    Parser(#[from] parser::Error),
}

#[cfg(test)]
mod tests {
    use googletest::prelude::{assert_that, eq};

    use crate::parsers::*;
    use crate::{Failures, ParsedArguments};

    #[test]
    fn it_should_read_example_command_line() {
        let argv = &[
            "--",
            "-f",
            "--arg1",
            "69",
            "--arg2",
            "42",
            "--exampleList",
            "a",
            "b",
            "c",
            "d",
        ];
        let args = ParsedArguments::parse(argv.iter().copied());

        assert_that!(args.get_flag("force"), eq(true));
        assert_that!(args.try_get("arg1", value::<u32>()), eq(Some(69)));
        assert_that!(args.try_get("arg2", value::<i64>()), eq(Some(42)));

        let list: Option<Vec<_>> = args
            .try_get("exampleList", values::<String>(Failures::Skip))
            .map(|x| x.flatten().collect());
        assert_that!(
            list,
            eq(&Some(vec![
                String::from("a"),
                String::from("b"),
                String::from("c"),
                String::from("d"),
            ]))
        );

        assert_that!(args.warnings().len(), eq(1));
        assert_that!(args.warnings()[0].position, eq(1));
    }

    #[test]
    fn it_should_distinguish_empty_key_from_missing_key() {
        let args = ParsedArguments::parse(["--key"]);

        assert_that!(args.try_get("key", raw()).map(<[String]>::len), eq(Some(0)));
        assert_that!(args.try_get("key", first_non_empty()), eq(None));
        assert_that!(args.try_get("other", raw()).is_none(), eq(true));
        assert_that!(args.get_flag("key"), eq(true));
    }

    #[test]
    fn it_should_read_arguments_from_threads() {
        let args = ParsedArguments::parse(["--n", "1", "2", "3"]);

        let sums: Vec<u32> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        args.try_get("n", values::<u32>(Failures::Skip))
                            .map(|x| x.flatten().sum())
                            .unwrap_or_default()
                    })
                })
                .collect();

            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_that!(sums, eq(&vec![6, 6, 6, 6]));
    }
}
