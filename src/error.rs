use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Error, Debug)]
pub enum BotError {
    /// Bad or missing request fields. Rejected at the boundary before
    /// any state mutation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Setup-level faults, e.g. a correlation token exceeding the
    /// provider's payload ceiling. Never user-facing in normal
    /// operation.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The payment platform call failed or timed out.
    #[error("payment provider error: {0}")]
    Provider(String),
    /// The reading oracle failed or returned unparseable content.
    #[error("oracle error: {0}")]
    Oracle(String),
    /// Status query for a user with no pending entry.
    #[error("not found: {0}")]
    NotFound(String),
}
