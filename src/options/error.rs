//! Errors raised while applying processing directives

use thiserror::Error;

/// Error produced by a validator, handler, or the dispatcher.
///
/// Every variant aborts parsing. Recursive preset usage is not represented
/// here because it is only ever logged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionError {
    /// Too many or too few arguments for a directive
    #[error("Invalid {option} arguments: {args:?}")]
    InvalidArguments {
        option: &'static str,
        args: Vec<String>,
    },

    /// A single token failed its validator
    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown processing option: {0}")]
    UnknownOption(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid image format: {0}")]
    UnknownFormat(String),

    /// A gravity type that the directive does not accept
    #[error("{option} doesn't support {gravity} gravity")]
    UnsupportedGravity {
        option: &'static str,
        gravity: &'static str,
    },

    /// The source part of the path could not be decoded
    #[error("{0}")]
    InvalidSource(String),

    /// `expires` timestamp is in the past
    #[error("Expired URL")]
    Expired,
}

impl OptionError {
    pub fn invalid_args(option: &'static str, args: &[String]) -> Self {
        OptionError::InvalidArguments {
            option,
            args: args.to_vec(),
        }
    }

    pub fn invalid_value(field: &'static str, value: impl Into<String>) -> Self {
        OptionError::InvalidValue {
            field,
            value: value.into(),
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, OptionError::Expired)
    }
}
