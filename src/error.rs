use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BookingError>;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("room {0} not found")]
    RoomNotFound(u32),
    #[error("booking {0} not found")]
    BookingNotFound(u32),
    #[error("payment {0} not found")]
    PaymentNotFound(u32),
    #[error("check-out date must be after check-in date")]
    InvalidDateRange,
    #[error("check-in date cannot be in the past")]
    PastCheckIn,
    #[error("room {0} is not available for the selected dates")]
    RoomUnavailable(u32),
    #[error("{action} is not allowed from status {status}")]
    InvalidTransition { status: String, action: String },
    #[error("conflicting concurrent update, retry the request")]
    ConcurrencyConflict,
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Storage(#[from] rocksdb::Error),
    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl BookingError {
    pub fn invalid_transition(status: impl fmt::Display, action: impl fmt::Display) -> Self {
        Self::InvalidTransition {
            status: status.to_string(),
            action: action.to_string(),
        }
    }
}
