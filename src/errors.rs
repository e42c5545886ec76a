use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Tile / hand-notation parse failure.
    Parse { input: String, message: String },
    /// Action submitted outside `legal_actions`; the engine state is unchanged.
    IllegalAction { seat: u8, message: String },
    /// Engine driven while in a state that cannot accept the request.
    InvalidState { message: String },
    /// Fatal initialization failure (shanten table, wall import, seed decode).
    Init { message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Parse { input, message } => {
                write!(f, "Parse error on '{}': {}", input, message)
            }
            EngineError::IllegalAction { seat, message } => {
                write!(f, "Illegal action by seat {}: {}", seat, message)
            }
            EngineError::InvalidState { message } => {
                write!(f, "Invalid state: {}", message)
            }
            EngineError::Init { message } => {
                write!(f, "Initialization error: {}", message)
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type EngineResult<T> = Result<T, EngineError>;
