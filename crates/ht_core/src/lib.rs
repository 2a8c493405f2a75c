pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::Error;
pub use types::{Article, Headline, ReadFilter};

pub type Result<T> = std::result::Result<T, Error>;
