use async_trait::async_trait;
use ht_core::{Error, Headline, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

use super::HeadlineSource;

/// Headline source for the tracked technology blog.
///
/// The page mixes two headline shapes: plain `h2` headings wrapped in a
/// link, and promo cards that keep their heading in an inner `h3`. Both
/// passes run in page order, h2 headings first, matching how the page lays
/// the articles out.
#[derive(Debug, Clone)]
pub struct AgileBlogSource {
    page_url: Url,
}

impl AgileBlogSource {
    pub fn new(page_url: Url) -> Self {
        Self { page_url }
    }
}

#[async_trait]
impl HeadlineSource for AgileBlogSource {
    fn name(&self) -> &str {
        "agile blog"
    }

    fn page_url(&self) -> &Url {
        &self.page_url
    }

    fn extract(&self, html: &str) -> Result<Vec<Headline>> {
        let document = Html::parse_document(html);
        let mut headlines = Vec::new();

        for heading in document.select(&Selector::parse("h2").unwrap()) {
            if let Some(link) = enclosing_href(heading) {
                headlines.push(Headline {
                    title: heading_text(heading),
                    link,
                });
            } else {
                warn!("h2 heading without an enclosing link, skipping");
            }
        }

        let promo = Selector::parse(".standard-promo.perspective-color").unwrap();
        let h3 = Selector::parse("h3").unwrap();
        for card in document.select(&promo) {
            match (enclosing_href(card), card.select(&h3).next()) {
                (Some(link), Some(heading)) => headlines.push(Headline {
                    title: heading_text(heading),
                    link,
                }),
                _ => warn!("promo card without a link or heading, skipping"),
            }
        }

        if headlines.is_empty() {
            return Err(Error::EmptyExtraction);
        }
        Ok(headlines)
    }
}

/// Nearest ancestor `<a href>` of a node, as the raw href text.
fn enclosing_href(element: ElementRef) -> Option<String> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "a")
        .and_then(|a| a.value().attr("href"))
        .map(str::to_string)
}

/// Tag text with no-break spaces normalized and edges trimmed.
fn heading_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .trim()
        .to_string()
}
