use thiserror::Error;

/// Errors raised while attaching observers to OS surfaces
#[derive(Error, Debug)]
pub enum ObserverError {
    /// The OS surface refused the registration
    #[error("{surface} is unavailable: {reason}")]
    Unavailable {
        surface: &'static str,
        reason: String,
    },
}

/// Result type for observer operations
pub type Result<T> = std::result::Result<T, ObserverError>;
