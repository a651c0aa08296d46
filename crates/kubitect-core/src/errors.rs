use kubitect_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::value::Kind;

/// Result type alias using KubitectError
pub type Result<T> = std::result::Result<T, KubitectError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable by scripts wrapping the CLI
/// and by tests asserting on failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Comparison
    TypeMismatch,

    // Input
    InvalidInput,
    UnknownAction,

    // Policy
    PolicyBlocked,
    ConfirmationDeclined,
    Ui,

    // Integration/IO
    Io,
    Serialization,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::UnknownAction => "ERR_UNKNOWN_ACTION",
            ExErrorKind::PolicyBlocked => "ERR_POLICY_BLOCKED",
            ExErrorKind::ConfirmationDeclined => "ERR_CONFIRMATION_DECLINED",
            ExErrorKind::Ui => "ERR_UI",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Domain errors ([`CmpError`], [`PolicyError`], [`KubitectError`]) convert
/// into this shape at the boundary so logging and the CLI see one format.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add configuration path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
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

/// Errors raised while comparing two values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CmpError {
    /// Two present values of different kinds met at the same path
    #[error("type mismatch at '{path}': {left} != {right}")]
    TypeMismatch {
        path: String,
        left: Kind,
        right: Kind,
    },

    /// Two structs of different types met at the same path
    #[error("type mismatch at '{path}': struct {left} != struct {right}")]
    StructMismatch {
        path: String,
        left: String,
        right: String,
    },
}

/// Outcome of the policy check when the apply must not continue
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// At least one blocking event was triggered
    #[error("Configuration file contains errors.")]
    Blocked { messages: Vec<String> },

    /// The user (or the scripted UI) refused to continue
    #[error("User aborted...")]
    Declined,

    /// The UI collaborator failed to obtain an answer
    #[error("ask: {reason}")]
    Ui { reason: String },
}

/// Crate-level error taxonomy
#[derive(Error, Debug)]
pub enum KubitectError {
    #[error(transparent)]
    Compare(#[from] CmpError),

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error("Unknown apply action: {action}")]
    UnknownAction { action: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lifecycle executor reported a failure after approval
    #[error("{stage} failed: {reason}")]
    Executor { stage: String, reason: String },
}

impl KubitectError {
    /// Canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            KubitectError::Compare(_) => ExErrorKind::TypeMismatch,
            KubitectError::Policy(PolicyError::Blocked { .. }) => ExErrorKind::PolicyBlocked,
            KubitectError::Policy(PolicyError::Declined) => ExErrorKind::ConfirmationDeclined,
            KubitectError::Policy(PolicyError::Ui { .. }) => ExErrorKind::Ui,
            KubitectError::UnknownAction { .. } => ExErrorKind::UnknownAction,
            KubitectError::InvalidInput { .. } => ExErrorKind::InvalidInput,
            KubitectError::Io { .. } => ExErrorKind::Io,
            KubitectError::Yaml(_) | KubitectError::Json(_) => ExErrorKind::Serialization,
            KubitectError::Executor { .. } => ExErrorKind::ExternalService,
        }
    }
}

impl From<CmpError> for ExError {
    fn from(err: CmpError) -> Self {
        match &err {
            CmpError::TypeMismatch { path, .. } | CmpError::StructMismatch { path, .. } => {
                ExError::new(ExErrorKind::TypeMismatch)
                    .with_op("compare")
                    .with_path(path.clone())
                    .with_message(err.to_string())
            }
        }
    }
}

impl From<PolicyError> for ExError {
    fn from(err: PolicyError) -> Self {
        match &err {
            PolicyError::Blocked { messages } => ExError::new(ExErrorKind::PolicyBlocked)
                .with_op("enforce")
                .with_message(format!("{} ({} blocking event(s))", err, messages.len())),
            PolicyError::Declined => ExError::new(ExErrorKind::ConfirmationDeclined)
                .with_op("enforce")
                .with_message(err.to_string()),
            PolicyError::Ui { .. } => ExError::new(ExErrorKind::Ui)
                .with_op("ask")
                .with_message(err.to_string()),
        }
    }
}

impl From<KubitectError> for ExError {
    fn from(err: KubitectError) -> Self {
        match err {
            KubitectError::Compare(e) => e.into(),
            KubitectError::Policy(e) => e.into(),
            KubitectError::UnknownAction { action } => ExError::new(ExErrorKind::UnknownAction)
                .with_message(format!("Unknown apply action: {}", action)),
            KubitectError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            KubitectError::Io { path, source } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(source.to_string()),
            KubitectError::Yaml(e) => ExError::new(ExErrorKind::Serialization)
                .with_op("load_config")
                .with_message(e.to_string()),
            KubitectError::Json(e) => {
                ExError::new(ExErrorKind::Serialization).with_message(e.to_string())
            }
            KubitectError::Executor { stage, reason } => {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op(stage)
                    .with_message(reason)
            }
        }
    }
}

/// Borrowing conversion for logging an error that is still propagated
impl From<&KubitectError> for ExError {
    fn from(err: &KubitectError) -> Self {
        ExError::new(err.kind()).with_message(err.to_string())
    }
}
