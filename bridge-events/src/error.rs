use thiserror::Error;

/// Errors that can occur while parsing, counting or routing events
///
/// None of these are surfaced to the host as failures. The registry and
/// router log them at the boundary and carry on.
#[derive(Error, Debug)]
pub enum EventError {
    /// Event name is not part of the catalog
    #[error("Unknown event type: {0}")]
    UnknownEvent(String),

    /// No host is attached to receive the event
    #[error("Host boundary is not attached, dropping {event}")]
    BoundaryDetached { event: String },

    /// Payload could not be converted for delivery
    #[error("Failed to serialize payload for {event}: {source}")]
    Payload {
        event: String,
        #[source]
        source: serde_json::Error,
    },

    /// The receiving side of a channel sink has gone away
    #[error("Event channel has been closed")]
    ChannelClosed,
}

/// Result type for event routing operations
pub type Result<T> = std::result::Result<T, EventError>;
