//! Error types for the agenda crate.

/// Top-level error type for the schedule store and reminder scanner.
#[derive(Debug, thiserror::Error)]
pub enum AgendaError {
    /// Snapshot persistence error (read, parse, or write).
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Reminder scanner error.
    #[error("scanner error: {0}")]
    Scanner(String),

    /// Channel configuration rejected at construction.
    #[error("channel config error: {0}")]
    ChannelConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AgendaError>;
