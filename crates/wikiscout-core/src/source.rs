//! Article sources - where the corpus comes from

use crate::models::Article;
use crate::normalize::normalize;
use crate::{Error, Result};
use async_trait::async_trait;
use wikiscout_api::{WikiPage, WikipediaClient};

/// Anything that can produce articles for the corpus
#[async_trait]
pub trait ArticleSource {
    /// Fetch a single article by topic title
    async fn fetch_article(&self, title: &str) -> Result<Article>;
}

/// Wrapper around WikipediaClient that implements ArticleSource
pub struct WikipediaSource {
    client: WikipediaClient,
}

impl WikipediaSource {
    pub fn new(client: WikipediaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ArticleSource for WikipediaSource {
    async fn fetch_article(&self, title: &str) -> Result<Article> {
        let page = self
            .client
            .get_article(title)
            .await
            .map_err(|e| Error::FetchError(e.to_string()))?;

        Ok(page_to_article(title, page))
    }
}

/// Convert a wire-format page to our internal Article model.
///
/// The id derives from the requested topic (normalized, spaces as
/// underscores) so reruns stay stable even if Wikipedia retitles the page.
fn page_to_article(topic: &str, page: WikiPage) -> Article {
    let id = normalize(Some(topic)).replace(' ', "_");

    Article {
        id,
        title: page.title,
        url: page.url,
        text: page.extract.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, extract: Option<&str>) -> WikiPage {
        WikiPage {
            title: title.to_string(),
            extract: extract.map(str::to_string),
            url: Some(format!(
                "https://en.wikipedia.org/wiki/{}",
                title.replace(' ', "_")
            )),
            missing: false,
        }
    }

    #[test]
    fn test_id_derives_from_requested_topic() {
        let article = page_to_article(
            "Machine learning",
            page("Machine learning", Some("Raw text")),
        );
        assert_eq!(article.id, "Machine_learning");
        assert_eq!(article.title, "Machine learning");
        assert_eq!(article.text, "Raw text");
    }

    #[test]
    fn test_id_is_normalized_before_underscoring() {
        let article = page_to_article("Bias\u{2013}variance tradeoff", page("Bias-variance tradeoff", None));
        assert_eq!(article.id, "Bias-variance_tradeoff");
    }

    #[test]
    fn test_missing_extract_becomes_empty_text() {
        let article = page_to_article("Stub", page("Stub", None));
        assert_eq!(article.text, "");
    }
}
