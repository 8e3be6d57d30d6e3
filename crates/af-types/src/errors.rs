//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Invalid account state: missing login fields: {0}")]
    InvalidAccountState(String),

    #[error("Channel send failed: {0}")]
    ChannelSendFailed(String),

    #[error("Capability fetch failed: {0}")]
    CapabilityFetchFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BrokerResult<T> = Result<T, BrokerError>;

impl From<BrokerError> for String {
    fn from(err: BrokerError) -> String {
        err.to_string()
    }
}
