//! Error types shared by parsing, engine options and book loading.
//!
//! Recoverable failures surface as `ChessError`. Broken internal invariants
//! are not recoverable and go through `internal_fault`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("invalid position description: {0}")]
    InvalidFen(String),

    #[error("move text '{0}' does not match any legal move")]
    IllegalMove(String),

    #[error("move text '{0}' matches more than one legal move")]
    AmbiguousMove(String),

    #[error("invalid square text '{0}'")]
    InvalidSquare(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidOptionValue { name: String, value: String },

    #[error("opening book image length {0} is not a multiple of the record size")]
    InvalidBookImage(usize),

    #[error("no move available to take back")]
    NothingToTakeBack,
}

pub type ChessResult<T> = Result<T, ChessError>;

/// Report a broken engine invariant and stop.
///
/// Reaching this means the engine state can no longer be trusted; there is no
/// recovery path.
#[cold]
#[track_caller]
pub fn internal_fault(what: &str) -> ! {
    tracing::error!(fault = what, "internal engine fault");
    panic!("internal engine fault: {what}");
}

#[cfg(test)]
mod tests {
    use super::{internal_fault, ChessError};

    #[test]
    fn error_messages_name_the_offending_input() {
        let err = ChessError::InvalidOptionValue {
            name: "Depth".to_owned(),
            value: "99".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid value '99' for option 'Depth'");
        assert!(ChessError::IllegalMove("Ke9".to_owned())
            .to_string()
            .contains("Ke9"));
    }

    #[test]
    #[should_panic(expected = "internal engine fault: undo log overflow")]
    fn internal_fault_panics_with_diagnostic() {
        internal_fault("undo log overflow");
    }
}
