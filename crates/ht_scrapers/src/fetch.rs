use ht_core::Result;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Download the tracked page.
///
/// Non-success statuses are turned into errors so callers can tell "the
/// site is down" apart from "the page changed shape".
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String> {
    debug!(%url, "fetching page");
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_page_ok() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .expect(1)
            .mount(&mock)
            .await;

        let url = Url::parse(&mock.uri()).unwrap();
        let html = fetch_page(&Client::new(), &url).await.unwrap();
        assert_eq!(html, "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_http_error() {
        let mock = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock)
            .await;

        let url = Url::parse(&mock.uri()).unwrap();
        let result = fetch_page(&Client::new(), &url).await;
        assert!(matches!(result, Err(ht_core::Error::Http(_))));
    }
}
