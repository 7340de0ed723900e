use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("relay rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("relay unavailable: {0}")]
    Unavailable(String),
}
