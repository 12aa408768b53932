use std::path::PathBuf;

/// Failure of one direction of a [`PartialIso`](crate::PartialIso).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsoError {
    /// The raw value has no interpretation as the target type.
    #[error("cannot interpret '{value}' as {target}")]
    Conversion { value: String, target: String },
    /// The value was not built by the case this iso owns.
    #[error("value does not belong to this case")]
    Rejected,
}

impl IsoError {
    pub fn conversion(value: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Conversion {
            value: value.into(),
            target: target.into(),
        }
    }
}

pub type IsoResult<T> = Result<T, IsoError>;

/// Why a parser did not accept the token stream.
///
/// Every variant is recoverable inside the combinator algebra: alternation
/// moves on to the next candidate and the top level reports "no match".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected '{expected}', found {}", found.as_deref().unwrap_or("end of input"))]
    UnexpectedToken {
        expected: String,
        found: Option<String>,
    },
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("missing argument: {0}")]
    Missing(String),
    #[error("missing value for {0}")]
    MissingValue(String),
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: IsoError,
    },
    #[error("unconsumed arguments: {0}")]
    Unconsumed(String),
    #[error("no alternative matched")]
    NoMatch,
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Failure to load a [`TemplateConfig`](crate::TemplateConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read template config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid template config: {0}")]
    Json(#[from] serde_json::Error),
}
