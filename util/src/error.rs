//! Error types shared by the hashkit containers.
use std::fmt;

/// Result type returned by fallible container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All kinds of errors reported by hashkit containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The requested key or index is not present.
    NotFound,
    /// The container was constructed with invalid parameters.
    ConfigInvalid,
    /// Allocating storage for the container failed.
    OutOfMemory,
    /// The container was used in a way its contract does not allow.
    UsageViolation,
}

impl ErrorKind {
    /// Returns the name of this error kind.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NotFound",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::OutOfMemory => "OutOfMemory",
            ErrorKind::UsageViolation => "UsageViolation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.into_static())
    }
}

/// Error returned by all fallible hashkit operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            source: None,
        }
    }

    /// Shorthand for an [`ErrorKind::NotFound`] error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Shorthand for an [`ErrorKind::ConfigInvalid`] error.
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Shorthand for an [`ErrorKind::UsageViolation`] error.
    pub fn usage_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UsageViolation, message)
    }

    /// Converts a failed reservation into an [`ErrorKind::OutOfMemory`] error.
    pub fn out_of_memory(requested: usize, source: std::collections::TryReserveError) -> Self {
        Self::new(ErrorKind::OutOfMemory, "failed to allocate container storage")
            .with_context("requested", requested)
            .set_source(source)
    }

    /// Adds a key-value pair of context to the error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Sets the underlying cause of this error.
    ///
    /// # Panics
    ///
    /// Panics if a source was already set.
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context attached to this error.
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Returns `true` for [`ErrorKind::NotFound`] errors.
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            return f
                .debug_struct("Error")
                .field("kind", &self.kind)
                .field("message", &self.message)
                .field("context", &self.context)
                .field("source", &self.source)
                .finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        for (k, v) in self.context.iter() {
            write!(f, "\n   {k}: {v}")?;
        }
        if let Some(source) = &self.source {
            write!(f, "\nSource: {source:#}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}: {v}")?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}
