use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Degenerate geometry: zero-length {what}")]
    DegenerateGeometry { what: &'static str },

    #[error("Invalid schedule at index {index} (time {time}): {reason}")]
    InvalidSchedule {
        index: usize,
        time: f64,
        reason: &'static str,
    },

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Whether the failure came from simulation inputs rather than file handling
    pub fn is_input_error(&self) -> bool {
        match self {
            SimError::DegenerateGeometry { .. } => true,
            SimError::InvalidSchedule { .. } => true,
            SimError::InvalidParameter { .. } => true,
            SimError::Io(_) => false,
            SimError::Json(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
