use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt ledger file: {0}")]
    Corrupt(String),

    #[error("no article with id {0}")]
    ArticleNotFound(u32),

    #[error("{count} articles share id {id}, expected exactly one")]
    DuplicateId { id: u32, count: usize },

    #[error("no headlines found in the fetched page")]
    EmptyExtraction,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("external error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
