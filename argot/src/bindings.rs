//! Explicit registration table binding program settings to arguments.

use core::fmt;

use crate::Error;
use crate::parser::{Key, ParsedArguments, Parser, parsers};

type Binder<'b> = Box<dyn FnMut(&ParsedArguments) -> Result<(), Error> + 'b>;

struct Entry<'b> {
    key: String,
    binder: Binder<'b>,
}

/// An ordered table of keys, each bound to a parser and a setter. Setters typically write into
/// local variables or a settings struct borrowed for the lifetime `'b`.
#[derive(Default)]
pub struct Bindings<'b> {
    entries: Vec<Entry<'b>>,
}

impl<'b> Bindings<'b> {
    /// Create an empty table.
    pub fn new() -> Self {
        Bindings {
            entries: Vec::new(),
        }
    }

    /// Bind an optional argument. The setter only runs if the parser finds a value.
    pub fn optional<T, P, S>(self, key: &str, parser: P, mut setter: S) -> Self
    where
        P: for<'a> Parser<'a, Output = T> + Clone + 'b,
        S: FnMut(T) + 'b,
    {
        let name = key.to_owned();

        self.push(key, move |args| {
            if let Some(value) = args.try_get(name.as_str(), parser.clone()) {
                setter(value);
            }
            Ok(())
        })
    }

    /// Bind a required argument. Applying the table fails with a default message if the parser
    /// finds nothing.
    pub fn required<T, P, S>(self, key: &str, parser: P, mut setter: S) -> Self
    where
        P: for<'a> Parser<'a, Output = T> + Clone + 'b,
        S: FnMut(T) + 'b,
    {
        let name = key.to_owned();

        self.push(key, move |args| {
            setter(args.get(name.as_str(), parser.clone())?);
            Ok(())
        })
    }

    /// Bind a required argument, failing with the given message if the parser finds nothing.
    pub fn required_with_message<T, P, S>(
        self,
        key: &str,
        parser: P,
        message: impl Into<String>,
        mut setter: S,
    ) -> Self
    where
        P: for<'a> Parser<'a, Output = T> + Clone + 'b,
        S: FnMut(T) + 'b,
    {
        let name = key.to_owned();
        let message = message.into();

        self.push(key, move |args| {
            let value = args.get_with_message(name.as_str(), parser.clone(), message.as_str())?;
            setter(value);
            Ok(())
        })
    }

    /// Bind a boolean switch, set from the key or its flag alias.
    pub fn flag<S>(self, key: &str, alias: Option<char>, mut setter: S) -> Self
    where
        S: FnMut(bool) + 'b,
    {
        let name = key.to_owned();

        self.push(key, move |args| {
            let key = match alias {
                Some(c) => Key::new(&name).alias(c),
                None => Key::new(&name),
            };

            setter(args.try_get(key, parsers::flag()).unwrap_or_default());
            Ok(())
        })
    }

    fn push<F>(mut self, key: &str, binder: F) -> Self
    where
        F: FnMut(&ParsedArguments) -> Result<(), Error> + 'b,
    {
        self.entries.push(Entry {
            key: key.to_owned(),
            binder: Box::new(binder),
        });
        self
    }

    /// Registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|x| x.key.as_str())
    }

    /// Keys mentioned on the command line that no entry is bound to.
    pub fn unknown_keys<'a>(&self, args: &'a ParsedArguments) -> Vec<&'a str> {
        args.keys()
            .filter(|key| !self.entries.iter().any(|x| x.key == *key))
            .collect()
    }

    /// Run every entry in registration order. Stops at the first required argument that is
    /// missing.
    pub fn apply(&mut self, args: &ParsedArguments) -> Result<(), Error> {
        for key in self.unknown_keys(args) {
            log::warn!("unknown argument `--{key}`");
        }

        for entry in &mut self.entries {
            log::trace!("binding `--{}`", entry.key);
            (entry.binder)(args)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Bindings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use googletest::prelude::*;

    use crate::parser::parsers::*;

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Settings {
        port: u16,
        name: String,
        verbose: bool,
        ratio: Option<f64>,
    }

    #[test]
    fn it_should_bind_settings() {
        let args = ParsedArguments::parse(["--port", "8080", "--name", "argot", "-v"]);
        let mut settings = Settings::default();

        let res = Bindings::new()
            .required("port", value::<u16>(), |x| settings.port = x)
            .required("name", value::<String>(), |x| settings.name = x)
            .flag("verbose", None, |x| settings.verbose = x)
            .optional("ratio", value::<f64>(), |x| settings.ratio = Some(x))
            .apply(&args);

        assert_that!(res, eq(&Ok(())));
        assert_that!(
            settings,
            eq(&Settings {
                port: 8080,
                name: String::from("argot"),
                verbose: true,
                ratio: None,
            })
        );
    }

    #[test]
    fn it_should_fail_on_missing_required() {
        let args = ParsedArguments::parse(["--port", "http"]);
        let mut port = 0u16;

        let mut bindings = Bindings::new().required_with_message(
            "port",
            value::<u16>(),
            "port must be a number",
            |x| port = x,
        );

        let err = bindings.apply(&args).unwrap_err();
        assert_that!(err.to_string(), eq("port must be a number"));

        drop(bindings);
        assert_that!(port, eq(0));
    }

    #[test]
    fn it_should_stop_at_first_missing_required() {
        let args = ParsedArguments::parse(["--b", "2"]);
        let seen = RefCell::new(Vec::new());

        let res = Bindings::new()
            .required("a", value::<u8>(), |x| seen.borrow_mut().push(x))
            .required("b", value::<u8>(), |x| seen.borrow_mut().push(x))
            .apply(&args);

        assert_that!(
            res,
            eq(&Err(Error::Parser(crate::parser::Error::missing("a"))))
        );
        assert_that!(seen.borrow().is_empty(), eq(true));
    }

    #[test]
    fn it_should_bind_flag_with_alias() {
        let args = ParsedArguments::parse(["-q"]);
        let mut verbose = true;
        let mut quiet = false;

        Bindings::new()
            .flag("verbose", None, |x| verbose = x)
            .flag("silent", Some('q'), |x| quiet = x)
            .apply(&args)
            .unwrap();

        assert_that!(verbose, eq(false));
        assert_that!(quiet, eq(true));
    }

    #[test]
    fn it_should_bind_folder() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        let args = ParsedArguments::parse(["--output".to_string(), out.display().to_string()]);
        let mut output = PathBuf::new();

        Bindings::new()
            .optional("output", folder_path(), |x| output = x)
            .apply(&args)
            .unwrap();

        assert_that!(out.is_dir(), eq(true));
        assert_that!(output.is_absolute(), eq(true));
        assert_that!(output.ends_with("out"), eq(true));
    }

    #[test]
    fn it_should_list_unknown_keys() {
        let args = ParsedArguments::parse(["--port", "1", "--colour", "red", "--debug"]);

        let bindings = Bindings::new()
            .optional("port", value::<u16>(), |_| {})
            .flag("debug", None, |_| {});

        assert_that!(bindings.unknown_keys(&args), eq(&vec!["colour"]));
        assert_that!(
            bindings.keys().collect::<Vec<_>>(),
            eq(&vec!["port", "debug"])
        );
    }
}
