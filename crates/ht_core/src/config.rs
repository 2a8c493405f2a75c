use std::path::PathBuf;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_DATA_FILE: &str = "data/articles.xml";
pub const DEFAULT_PAGE_URL: &str =
    "https://www.deloitte.com/pl/pl/pages/technology/topics/blog-agile.html";
pub const DEFAULT_LINK_ORIGIN: &str = "https://www2.deloitte.com";

/// Runtime configuration, built once in the binary and handed down
/// explicitly instead of living in process-wide globals.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backing file for the article ledger.
    pub data_file: PathBuf,
    /// Page the headlines are read from.
    pub page_url: Url,
    /// Origin that relative article links resolve against.
    pub link_origin: Url,
}

impl AppConfig {
    pub fn new(data_file: Option<PathBuf>, page_url: Option<Url>) -> Result<Self> {
        let page_url = match page_url {
            Some(url) => url,
            None => parse_url(DEFAULT_PAGE_URL)?,
        };
        Ok(Self {
            data_file: data_file.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE)),
            page_url,
            link_origin: parse_url(DEFAULT_LINK_ORIGIN)?,
        })
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))
}
