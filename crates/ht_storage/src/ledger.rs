use ht_core::{Article, Error, Headline, ReadFilter, Result};
use url::Url;

/// The full in-memory collection of tracked articles for one run.
///
/// Insertion order is preserved. Ids are unique and never reused: the next
/// id is always `max(existing) + 1`, so even if the newest article were
/// dropped from the file by hand its id would not be handed out again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    articles: Vec<Article>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_articles(articles: Vec<Article>) -> Self {
        Self { articles }
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn count_all(&self) -> usize {
        self.articles.len()
    }

    pub fn count_read(&self) -> usize {
        self.articles.iter().filter(|a| a.read).count()
    }

    /// Largest id currently in the ledger, 0 when empty.
    pub fn max_id(&self) -> u32 {
        self.articles.iter().map(|a| a.id).max().unwrap_or(0)
    }

    /// Next free id.
    pub fn next_id(&self) -> u32 {
        self.max_id() + 1
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.articles.iter().any(|a| a.title == title)
    }

    /// Reconcile freshly scraped candidates against the ledger.
    ///
    /// Candidates are walked in scrape order, so when several are new in one
    /// run the earlier ones get the lower ids. Each candidate is checked
    /// against the ledger as mutated so far, which means a title duplicated
    /// within the batch is only added once. Links are stored absolute,
    /// resolved against the site origin. Returns how many articles were
    /// genuinely new; the caller is responsible for saving.
    pub fn merge(&mut self, candidates: &[Headline], origin: &Url) -> Result<usize> {
        let mut added = 0;
        for candidate in candidates {
            if self.contains_title(&candidate.title) {
                continue;
            }
            let link = resolve_link(origin, &candidate.link)?;
            self.articles.push(Article {
                id: self.next_id(),
                title: candidate.title.clone(),
                link,
                read: false,
            });
            added += 1;
        }
        Ok(added)
    }

    /// Flip the read flag of the article with the given id.
    ///
    /// Duplicate ids cannot come out of `merge`, but a hand-edited backing
    /// file can carry them, so the lookup counts matches instead of assuming
    /// uniqueness.
    pub fn set_read_state(&mut self, id: u32, read: bool) -> Result<()> {
        let count = self.articles.iter().filter(|a| a.id == id).count();
        match count {
            0 => Err(Error::ArticleNotFound(id)),
            1 => {
                if let Some(article) = self.articles.iter_mut().find(|a| a.id == id) {
                    article.read = read;
                }
                Ok(())
            }
            count => Err(Error::DuplicateId { id, count }),
        }
    }

    /// Read-only projection in ledger order.
    pub fn iter_filtered(&self, filter: ReadFilter) -> impl Iterator<Item = &Article> {
        self.articles.iter().filter(move |a| filter.matches(a))
    }
}

/// Resolve a scraped href against the site origin. Absolute inputs pass
/// through unchanged, relative ones get the origin prefix.
fn resolve_link(origin: &Url, link: &str) -> Result<String> {
    origin
        .join(link)
        .map(|url| url.to_string())
        .map_err(|e| Error::InvalidUrl(format!("{link}: {e}")))
}
