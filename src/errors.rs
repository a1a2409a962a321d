use thiserror::Error;

/// Errors raised by the session collaborator.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session factory is not initialized")]
    NotInitialized,

    #[error("Failed to acquire session: {0}")]
    Acquisition(String),

    #[error("No proxy registered for mapper: {0}")]
    UnknownMapper(String),

    #[error("Session is already closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum MapperError {
    #[error("Callable carries no provenance metadata")]
    UnintrospectableCallable,

    #[error("Cannot resolve mapper class for declaration {declaration} (signature: {})", signature.as_deref().unwrap_or("<none>"))]
    MapperClassNotResolvable {
        declaration: String,
        signature: Option<String>,
    },

    #[error("Declaration {declaration} specializes the mapper interface more than once: {}", candidates.join(", "))]
    AmbiguousMapperDeclaration {
        declaration: String,
        candidates: Vec<String>,
    },

    #[error("Invalid method signature {signature:?}: {reason}")]
    InvalidSignature { signature: String, reason: String },

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Declaration already registered: {0}")]
    DuplicateDeclaration(String),

    #[error("{operation} for {callable} failed: {source}")]
    Session {
        operation: &'static str,
        callable: String,
        #[source]
        source: SessionError,
    },

    #[error("Proxy for {declaration} is not a {expected}")]
    ProxyTypeMismatch {
        declaration: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Query(#[from] anyhow::Error),
}

impl MapperError {
    pub(crate) fn invalid_signature(signature: &str, reason: impl Into<String>) -> Self {
        MapperError::InvalidSignature {
            signature: signature.to_string(),
            reason: reason.into(),
        }
    }
}
