use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("html parse error: {0}")]
    Parse(String),

    #[error("no body element found")]
    NoBody,
}
