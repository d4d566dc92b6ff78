use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Event routing error: {0}")]
    Events(#[from] bridge_events::EventError),

    #[error("Observer error: {0}")]
    Observer(#[from] bridge_observers::ObserverError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument for {method}: {reason}")]
    InvalidArgument { method: String, reason: String },
}

impl BridgeError {
    /// Stable code reported to the host when a request is rejected
    pub fn code(&self) -> &'static str {
        match self {
            BridgeError::Events(_) => "EVENT_ERROR",
            BridgeError::Observer(_) => "OBSERVER_ERROR",
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            BridgeError::InvalidArgument { .. } => "INVALID_ARGUMENT",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
