use voicestack_core::error::CoreError;
use voicestack_db::StoreError;

/// Error type for engine operations.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Validators never produce these; they return structured results.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `voicestack_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from `voicestack_db`.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Submission was attempted while `can_submit` reports blockers.
    #[error("Onboarding cannot be submitted: {}", .reasons.join("; "))]
    SubmissionBlocked { reasons: Vec<String> },

    /// A generated payload failed its structural self-check.
    #[error("Provisioning payload is invalid: {}", .errors.join("; "))]
    InvalidPayload { errors: Vec<String> },
}

/// Convenience alias for engine return values.
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// HTTP-equivalent status for the caller's transport layer.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Core(core) => match core {
                CoreError::NotFound { .. } => 404,
                CoreError::Validation(_) => 422,
                CoreError::Conflict(_) => 409,
                CoreError::Forbidden(_) => 403,
                CoreError::Internal(_) => 500,
            },
            EngineError::Store(store) => match store {
                StoreError::NotFound { .. } => 404,
                StoreError::Conflict(_) => 409,
                StoreError::InvalidPatch(_) => 422,
                StoreError::Serialization(_) => 500,
            },
            EngineError::SubmissionBlocked { .. } => 409,
            EngineError::InvalidPayload { .. } => 422,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self.status_code() {
            404 => "NOT_FOUND",
            409 => "CONFLICT",
            422 => "VALIDATION_ERROR",
            403 => "FORBIDDEN",
            _ => "INTERNAL_ERROR",
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        EngineError::Core(CoreError::not_found(entity, id))
    }
}
