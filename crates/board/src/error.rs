use thiserror::Error;

/// Invalid local requests. These are logged and ignored by callers; they
/// never surface to the user and never abort a frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no checkers at space {0}")]
    EmptySpace(usize),
    #[error("space {0} is out of range")]
    OutOfRange(usize),
}
