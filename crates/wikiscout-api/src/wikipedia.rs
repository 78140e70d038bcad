//! MediaWiki Action API client
//!
//! Uses `action=query` with the TextExtracts extension to pull whole-page
//! plaintext (`explaintext=1`) plus the canonical URL (`inprop=url`). One
//! request per page; `formatversion=2` keeps the response shape sane.

use crate::{ApiError, Result};
use serde::Deserialize;
use tracing::debug;

/// Plaintext article payload returned by the Action API
#[derive(Debug, Clone, Deserialize)]
pub struct WikiPage {
    pub title: String,
    /// Plaintext extract of the whole page
    pub extract: Option<String>,
    /// Canonical page URL
    #[serde(rename = "fullurl")]
    pub url: Option<String>,
    /// Set when the requested title does not exist
    #[serde(default)]
    pub missing: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<QueryBody>,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    pages: Vec<WikiPage>,
}

/// HTTP client for one Wikipedia language edition
pub struct WikipediaClient {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaClient {
    /// Build a client for the given language edition.
    ///
    /// Wikimedia's API etiquette requires a descriptive User-Agent, so the
    /// caller has to supply one.
    pub fn new(language: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            endpoint: format!("https://{}.wikipedia.org/w/api.php", language),
        })
    }

    /// Fetch the plaintext extract and canonical URL for one page
    pub async fn get_article(&self, title: &str) -> Result<WikiPage> {
        debug!("Fetching article: {}", title);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("formatversion", "2"),
                ("prop", "extracts|info"),
                ("explaintext", "1"),
                ("inprop", "url"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: QueryResponse = response.json().await?;
        first_page(parsed, title)
    }
}

/// Pull the single requested page out of a query response
fn first_page(parsed: QueryResponse, title: &str) -> Result<WikiPage> {
    let page = parsed
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| ApiError::BadResponse("no pages in query response".to_string()))?;

    if page.missing {
        return Err(ApiError::PageMissing {
            title: title.to_string(),
        });
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_standard_response() {
        let raw = r#"{
            "batchcomplete": true,
            "query": {
                "pages": [
                    {
                        "pageid": 5323,
                        "ns": 0,
                        "title": "Machine learning",
                        "extract": "Machine learning (ML) is a field of study...",
                        "fullurl": "https://en.wikipedia.org/wiki/Machine_learning"
                    }
                ]
            }
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        let page = first_page(parsed, "Machine learning").unwrap();

        assert_eq!(page.title, "Machine learning");
        assert!(page.extract.unwrap().starts_with("Machine learning"));
        assert_eq!(
            page.url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Machine_learning")
        );
    }

    #[test]
    fn test_missing_page_is_an_error() {
        let raw = r#"{
            "query": {
                "pages": [
                    {"ns": 0, "title": "No Such Page Exists", "missing": true}
                ]
            }
        }"#;

        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        let err = first_page(parsed, "No Such Page Exists").unwrap_err();
        assert!(matches!(err, ApiError::PageMissing { .. }));
    }

    #[test]
    fn test_empty_response_is_bad_response() {
        let parsed: QueryResponse = serde_json::from_str("{}").unwrap();
        let err = first_page(parsed, "Anything").unwrap_err();
        assert!(matches!(err, ApiError::BadResponse(_)));
    }
}
