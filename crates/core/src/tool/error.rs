use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display};

/// The kind of error that occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No tool is registered under the requested name.
    UnknownTool,
    /// The arguments are not valid JSON, or don't fit the tool's input.
    MalformedArguments,
    /// The tool itself failed, or its output could not be serialized.
    ExecutionError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnknownTool => write!(f, "Unknown tool"),
            ErrorKind::MalformedArguments => write!(f, "Malformed arguments"),
            ErrorKind::ExecutionError => write!(f, "Execution error"),
        }
    }
}

/// Describes a tool call error.
///
/// When a tool fails, the error it returned is kept as the [`source`] of
/// this error, untouched.
///
/// [`source`]: StdError::source
pub struct Error {
    kind: ErrorKind,
    reason: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    #[inline]
    fn with_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            reason: None,
            source: None,
        }
    }

    /// Creates a new error with the `UnknownTool` kind.
    #[inline]
    pub fn unknown_tool() -> Self {
        Self::with_kind(ErrorKind::UnknownTool)
    }

    /// Creates a new error with the `MalformedArguments` kind.
    #[inline]
    pub fn malformed_arguments() -> Self {
        Self::with_kind(ErrorKind::MalformedArguments)
    }

    /// Creates a new error with the `ExecutionError` kind.
    #[inline]
    pub fn execution_error() -> Self {
        Self::with_kind(ErrorKind::ExecutionError)
    }

    /// Attaches a reason to the error.
    #[inline]
    pub fn with_reason<S: Into<String>>(mut self, reason: S) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the underlying error.
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        self.source = Some(source.into());
        self
    }

    /// Returns the kind of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the reason for the error.
    #[inline]
    pub fn reason(&self) -> Cow<'_, str> {
        match (&self.reason, &self.source) {
            (Some(reason), _) => Cow::Borrowed(reason),
            (None, Some(source)) => Cow::Owned(format!("{source}")),
            (None, None) => Cow::Owned(format!("{}", self.kind)),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("reason", &self.reason)
            .field("source", &self.source)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}
