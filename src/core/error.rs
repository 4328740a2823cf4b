use std::fmt;

/// Tagged error kinds surfaced to callers, per the retrieval core's error
/// handling design: every failure carries a `kind`, a short human message,
/// and optional field-specific `details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: empty name, importance out of range, dangling
    /// relation endpoint, duplicate entity under strict-create semantics.
    Validation,
    /// A configured graph or query limit was breached.
    LimitExceeded,
    /// Entity/relation absent where the operation required it to exist.
    NotFound,
    /// The underlying `GraphStore` failed I/O.
    StorageUnavailable,
    /// The embedder failed after exhausting its retry budget.
    EmbedderUnavailable,
    /// Two vectors compared with mismatched dimension.
    VectorDimension,
    /// The mutex's bounded waiter queue was full.
    MutexQueueFull,
    /// A mutex acquire timed out before reaching the head of the queue.
    MutexTimeout,
    /// Query depth/term/length limits exceeded.
    QueryTooComplex,
    /// Every layer selected for a hybrid search failed.
    RetrievalUnavailable,
    /// Malformed query syntax (boolean expression, field query, etc).
    Parse,
    /// Internal invariant violation; should not be reachable in practice.
    Internal,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub kind: ErrorKind,
    pub context: String,
    pub details: Vec<String>,
}

impl Error {
    pub fn new(kind: ErrorKind, context: impl Into<String>) -> Self {
        Error {
            kind,
            context: context.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn validation(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Validation, context)
    }

    pub fn not_found(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::NotFound, context)
    }

    pub fn limit_exceeded(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::LimitExceeded, context)
    }

    pub fn storage_unavailable(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::StorageUnavailable, context)
    }

    pub fn embedder_unavailable(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::EmbedderUnavailable, context)
    }

    pub fn vector_dimension(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::VectorDimension, context)
    }

    pub fn mutex_queue_full(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::MutexQueueFull, context)
    }

    pub fn mutex_timeout(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::MutexTimeout, context)
    }

    pub fn query_too_complex(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::QueryTooComplex, context)
    }

    pub fn retrieval_unavailable(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::RetrievalUnavailable, context)
    }

    pub fn parse(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Parse, context)
    }

    pub fn internal(context: impl Into<String>) -> Self {
        Error::new(ErrorKind::Internal, context)
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.context)?;
        if !self.details.is_empty() {
            write!(f, " ({})", self.details.join("; "))?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::new(ErrorKind::StorageUnavailable, err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::new(ErrorKind::Parse, err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::Parse, err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
