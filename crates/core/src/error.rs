use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown difficulty level: {0}")]
    UnknownDifficulty(String),

    #[error("Unknown question type: {0}")]
    UnknownQuestionType(String),

    #[error("Unknown difficulty authority: {0}")]
    UnknownAuthority(String),
}
