use serde::{Deserialize, Serialize};

/// One tracked headline as persisted in the ledger.
///
/// The id is assigned by the store and never supplied by callers; the title
/// is the sole de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u32,
    pub title: String,
    pub link: String,
    pub read: bool,
}

/// A scraped (title, link) candidate, in page display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub link: String,
}

impl Headline {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// Projection filter for listing articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadFilter {
    All,
    Read,
    Unread,
}

impl ReadFilter {
    pub fn matches(self, article: &Article) -> bool {
        match self {
            ReadFilter::All => true,
            ReadFilter::Read => article.read,
            ReadFilter::Unread => !article.read,
        }
    }
}
