//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid availability rule: {0}")]
    InvalidRule(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
