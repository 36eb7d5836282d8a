use thiserror::Error;

/// Failure reported by the persistence collaborator. The analytics functions
/// themselves cannot fail.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
