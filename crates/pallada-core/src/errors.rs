use thiserror::Error;

use crate::model::EntityType;

/// Result type alias using TimetableError
pub type Result<T> = std::result::Result<T, TimetableError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and CLI exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Resolution / validation
    InvalidInput,
    NotFound,
    DuplicateEntity,

    // Source parsing
    /// The portal page no longer carries a required structural anchor
    MalformedSource,

    // Snapshots
    /// A stored snapshot exists but cannot be decoded
    SnapshotCorrupt,

    // Integration/IO
    Io,
    Serialization,
    /// The fetch collaborator failed (network, HTTP status, missing proxy page)
    Fetch,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::DuplicateEntity => "ERR_DUPLICATE_ENTITY",
            ExErrorKind::MalformedSource => "ERR_MALFORMED_SOURCE",
            ExErrorKind::SnapshotCorrupt => "ERR_SNAPSHOT_CORRUPT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Fetch => "ERR_FETCH",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus free-form context
/// for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
            source: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (entity id, snapshot key or URL)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Add candidate names (near misses for NotFound)
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get candidate names, if any (populated on NotFound from the resolver)
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for the timetable core (index, parser, model)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimetableError {
    /// Query resolved to no entity above the similarity threshold
    #[error("No entity matches query: {query}")]
    EntityNotFound {
        query: String,
        best_candidate: Option<String>,
    },

    /// Two catalog entries share the same type and id
    #[error("Duplicate {entity_type} id in catalog: {id}")]
    DuplicateEntity { entity_type: EntityType, id: u32 },

    /// Catalog entry has an unknown type tag or is otherwise unusable
    #[error("Invalid catalog entry: {reason}")]
    InvalidCatalogEntry { reason: String },

    /// Required structural anchor missing from the portal page
    #[error("Malformed source document: {reason}")]
    MalformedSource { reason: String },

    /// JSON encode/decode failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<TimetableError> for ExError {
    fn from(err: TimetableError) -> Self {
        match err {
            TimetableError::EntityNotFound {
                query,
                best_candidate,
            } => {
                let ex = ExError::new(ExErrorKind::NotFound)
                    .with_op("resolve")
                    .with_message(format!("No entity matches query '{}'", query));
                match best_candidate {
                    Some(name) => ex.with_candidates(vec![name]),
                    None => ex,
                }
            }

            TimetableError::DuplicateEntity { entity_type, id } => {
                ExError::new(ExErrorKind::DuplicateEntity)
                    .with_op("build_index")
                    .with_entity_id(format!("{}/{}", entity_type, id))
                    .with_message("Entity id appears more than once in the catalog")
            }

            TimetableError::InvalidCatalogEntry { reason } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("build_index")
                    .with_message(reason)
            }

            TimetableError::MalformedSource { reason } => {
                ExError::new(ExErrorKind::MalformedSource)
                    .with_op("build_schedule")
                    .with_message(reason)
            }

            TimetableError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to TimetableError
impl From<serde_json::Error> for TimetableError {
    fn from(err: serde_json::Error) -> Self {
        TimetableError::Serialization {
            message: err.to_string(),
        }
    }
}
