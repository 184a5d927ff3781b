use thiserror::Error;

/// Result type alias using VistaError
pub type Result<T> = std::result::Result<T, VistaError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code and to the HTTP-equivalent status
/// the pipelines report it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Client input
    InvalidInput,
    InvalidField,
    InvalidFilter,
    InvalidSort,
    InvalidPage,

    // Lookup
    EmptyPage,
    NotFound,

    // Configuration
    InvalidRelation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidField => "ERR_INVALID_FIELD",
            ExErrorKind::InvalidFilter => "ERR_INVALID_FILTER",
            ExErrorKind::InvalidSort => "ERR_INVALID_SORT",
            ExErrorKind::InvalidPage => "ERR_INVALID_PAGE",
            ExErrorKind::EmptyPage => "ERR_EMPTY_PAGE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidRelation => "ERR_INVALID_RELATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP-equivalent status for this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidInput
            | ExErrorKind::InvalidField
            | ExErrorKind::InvalidFilter
            | ExErrorKind::InvalidSort
            | ExErrorKind::InvalidPage => 400,
            ExErrorKind::EmptyPage | ExErrorKind::NotFound => 404,
            ExErrorKind::InvalidRelation
            | ExErrorKind::Io
            | ExErrorKind::Serialization
            | ExErrorKind::Persistence
            | ExErrorKind::Internal => 500,
        }
    }
}

/// Canonical structured error type
///
/// Crate boundaries (repository, serializer, pipelines) speak `ExError`;
/// the richer `VistaError` enum converts into it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the offending field path
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
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

    /// Get the HTTP-equivalent status
    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the offending field path, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
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
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// A requested field path that does not exist in the spec tree.
///
/// `field` is fully qualified: each recursive level of the projector
/// prepends its own prefix as the error propagates outward.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("<FieldKeyError: {field}>")]
pub struct FieldKeyError {
    pub field: String,
}

impl FieldKeyError {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Rewrite the path as `prefix.field`.
    pub fn qualify(mut self, prefix: &str) -> Self {
        self.field = format!("{}.{}", prefix, self.field);
        self
    }
}

/// Error taxonomy for vista operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VistaError {
    /// Client asked for a field path the spec tree does not define
    #[error(transparent)]
    FieldKey(#[from] FieldKeyError),

    /// A lookup failed for a reason other than an unknown field path
    #[error("Invalid field: {key}")]
    KeyLookup { key: String },

    /// Page number is past the end of the result set (or below 1)
    #[error("Page {page} is out of range (1..={num_pages})")]
    EmptyPage { page: i64, num_pages: usize },

    /// Page parameter is not an integer
    #[error("Invalid page number: {raw}")]
    InvalidPage { raw: String },

    /// Filter parameter names a column the entity does not have
    #[error("Unknown filter column {column} on {entity}")]
    UnknownFilter { entity: String, column: String },

    /// Sort key names a column the entity does not have
    #[error("Unknown sort column {column} on {entity}")]
    UnknownSort { entity: String, column: String },

    /// Relation name not declared on the entity
    #[error("Unknown relation {relation} on {entity}")]
    UnknownRelation { entity: String, relation: String },

    /// Entity not registered
    #[error("Unknown entity: {entity}")]
    UnknownEntity { entity: String },

    /// No row with the given primary key
    #[error("{entity} not found: {pk}")]
    NotFound { entity: String, pk: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<VistaError> for ExError {
    fn from(err: VistaError) -> Self {
        match err {
            VistaError::FieldKey(FieldKeyError { field }) => {
                ExError::new(ExErrorKind::InvalidField)
                    .with_message(format!(
                        "Error: You've asked for a field ({}) that is invalid. Check the docs for this model.",
                        field
                    ))
                    .with_field(field)
            }

            VistaError::KeyLookup { key } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!("Error: Invalid field: {}", key)),

            VistaError::EmptyPage { page, .. } => ExError::new(ExErrorKind::EmptyPage)
                .with_field("page")
                .with_entity_id(page.to_string())
                .with_message("No such page (heh, literally - its out of bounds)"),

            VistaError::InvalidPage { raw } => ExError::new(ExErrorKind::InvalidPage)
                .with_field("page")
                .with_message(format!("Error: page must be an integer, got {:?}", raw)),

            VistaError::UnknownFilter { entity, column } => {
                ExError::new(ExErrorKind::InvalidFilter)
                    .with_field(column.clone())
                    .with_message(format!("Error: Cannot filter {} by {}", entity, column))
            }

            VistaError::UnknownSort { entity, column } => ExError::new(ExErrorKind::InvalidSort)
                .with_field(column.clone())
                .with_message(format!("Error: Cannot sort {} by {}", entity, column)),

            VistaError::UnknownRelation { entity, relation } => {
                ExError::new(ExErrorKind::InvalidRelation)
                    .with_field(relation.clone())
                    .with_message(format!("{} has no relation named {}", entity, relation))
            }

            VistaError::UnknownEntity { entity } => ExError::new(ExErrorKind::Internal)
                .with_entity_id(entity)
                .with_message("Entity is not registered"),

            VistaError::NotFound { entity, pk } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(pk)
                .with_message(format!("No {} matches the given query.", entity)),

            VistaError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            VistaError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}
