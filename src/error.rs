use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("Bond coefficient error{}: {message}", fmt_type(.bond_type))]
    Configuration {
        bond_type: Option<usize>,
        message: String,
    },

    #[error("Bond coefficients for type {0} are not set")]
    UnconfiguredType(usize),

    #[error("Invalid bond restart data: expected {expected}, found {found}")]
    RestartFormat { expected: String, found: String },

    #[error("All bond coeffs are not set for style '{style}' (missing types {missing:?})")]
    FatalStartup { style: String, missing: Vec<usize> },

    #[error("Unknown bond style '{0}'")]
    UnknownStyle(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config(bond_type: Option<usize>, message: impl Into<String>) -> Self {
        Error::Configuration {
            bond_type,
            message: message.into(),
        }
    }

    pub(crate) fn restart(expected: impl ToString, found: impl ToString) -> Self {
        Error::RestartFormat {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

fn fmt_type(bond_type: &Option<usize>) -> String {
    match bond_type {
        Some(t) => format!(" for type {}", t),
        None => String::new(),
    }
}
