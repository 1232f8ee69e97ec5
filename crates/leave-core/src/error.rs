use leave_domain::LeaveType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Leave duration of {days} days exceeds the maximum of {max} consecutive days")]
    DurationExceeded { days: u32, max: u32 },
    #[error("Insufficient {leave_type} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        leave_type: LeaveType,
        requested: u32,
        available: u32,
    },
    #[error("Invalid restricted holiday: {0}")]
    InvalidRestrictedHoliday(String),
    #[error("You can only select up to {cap} restricted holidays")]
    SelectionCapExceeded { cap: usize },
    #[error("Leave request not found: {0}")]
    RequestNotFound(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Short heading used when the error is surfaced as a notification.
    pub fn title(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "Validation Error",
            CoreError::DurationExceeded { .. } => "Leave Duration Error",
            CoreError::InsufficientBalance { .. } => "Leave Balance Error",
            CoreError::InvalidRestrictedHoliday(_) => "Restricted Holiday Error",
            CoreError::SelectionCapExceeded { .. } => "Selection Failed",
            CoreError::RequestNotFound(_) | CoreError::InvalidTransition(_) => "Request Error",
            CoreError::Storage(_) | CoreError::Serde(_) | CoreError::Io(_) => "Storage Error",
        }
    }

    pub(crate) fn insufficient(leave_type: LeaveType, requested: u32, available: u32) -> Self {
        CoreError::InsufficientBalance {
            leave_type,
            requested,
            available,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
