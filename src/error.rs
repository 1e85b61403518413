// Error taxonomy shared by the lifecycle manager, clan handler and HTTP layer.

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Account not found: {0}")]
    NotFound(String),
    #[error("Bot already running for account {0}")]
    AlreadyRunning(String),
    #[error("Bot not running for account {0}")]
    NotRunning(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Store write or read failure. Retried by running loops, surfaced to direct callers.
    #[error("Store error: {0}")]
    TransientIo(#[from] sqlx::Error),
}

pub type PanelResult<T> = Result<T, PanelError>;
