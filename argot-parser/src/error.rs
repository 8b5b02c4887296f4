//! Errors raised when reading arguments.

/// Defines the possible errors that may occur when reading arguments. Parsers report failures as
/// absence, so only the required accessors produce errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// A required argument resolved to nothing: it is either missing or none of its values could
    /// be parsed.
    #[error("{message}")]
    MissingArgument {
        /// Name of the key, without hyphens.
        key: String,

        /// Either the default message or the one given by the caller.
        message: String,
    },
}

impl Error {
    /// Create a missing argument error with the default message.
    pub fn missing(key: &str) -> Self {
        Error::MissingArgument {
            key: key.to_owned(),
            message: format!("required argument `--{key}` is missing"),
        }
    }

    /// Create a missing argument error with a custom message.
    pub fn missing_with(key: &str, message: impl Into<String>) -> Self {
        Error::MissingArgument {
            key: key.to_owned(),
            message: message.into(),
        }
    }
}
