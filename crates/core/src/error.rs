//! Domain error taxonomy shared by every crate in the workspace.

/// Domain-level errors.
///
/// Storage and remote-client crates convert their own failures into these
/// variants; the API layer maps them onto HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    /// A hard dependency (configuration store, engagement storage) could not
    /// be reached or answered with an error.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
