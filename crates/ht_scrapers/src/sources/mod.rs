use async_trait::async_trait;
use ht_core::{Headline, Result};
use reqwest::Client;
use url::Url;

use crate::fetch;

mod agile_blog;

pub use agile_blog::AgileBlogSource;

/// A web page whose headline list is tracked in the ledger.
#[async_trait]
pub trait HeadlineSource: Send + Sync {
    /// Source name for logs and operator output.
    fn name(&self) -> &str;

    /// The page the headlines are read from.
    fn page_url(&self) -> &Url;

    /// Pull (title, link) pairs out of the page markup.
    ///
    /// The returned order is the page display order; it decides which
    /// headlines get the lower ids when several are new in one run.
    fn extract(&self, html: &str) -> Result<Vec<Headline>>;

    /// Fetch the tracked page and extract its headlines.
    async fn scrape(&self, client: &Client) -> Result<Vec<Headline>> {
        let html = fetch::fetch_page(client, self.page_url()).await?;
        self.extract(&html)
    }
}
