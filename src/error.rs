use reqwest::StatusCode;

use thiserror::Error;

pub type DeliveryResult<T> = Result<T, DeliveryError>;

/// Reason shown when a delivery failure carries nothing worth showing
pub const FALLBACK_FAILURE_REASON: &str = "Failed to send message. Please try again later.";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Relay client used before init with a public key")]
    NotInitialized,

    #[error("Relay rejected the message ({status}): {text}")]
    Rejected { status: StatusCode, text: String },

    #[error("Failed to reach the relay: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DeliveryError {
    /// The single top-level message a rendering layer shows for this failure.
    ///
    /// Relay and transport details stay in the logs, never in front of the user.
    pub fn user_message(&self) -> String {
        FALLBACK_FAILURE_REASON.into()
    }
}
