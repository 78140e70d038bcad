//! Joins chunks back to their parent-article metadata

use crate::chunk::clean_and_split;
use crate::models::{Article, ChunkRecord};
use crate::normalize::normalize;

/// Explode one article into chunk records with stable derived ids.
///
/// Article id, title, and text are normalized before chunking; each chunk is
/// normalized again on its own because split boundaries can reintroduce raw
/// whitespace. Record ids are `<article_id>_<index>` with a zero-based index
/// in document order. The URL passes through verbatim.
pub fn build_records(article: &Article, min_chars: usize) -> Vec<ChunkRecord> {
    let article_id = normalize(Some(&article.id));
    let title = normalize(Some(&article.title));
    let text = normalize(Some(&article.text));

    clean_and_split(&text, min_chars)
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| ChunkRecord {
            id: format!("{}_{}", article_id, index),
            title: title.clone(),
            text: normalize(Some(&chunk)),
            url: article.url.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, title: &str, text: &str) -> Article {
        Article {
            id: id.to_string(),
            title: title.to_string(),
            url: Some("https://en.wikipedia.org/wiki/Foo-Bar".to_string()),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_ids_are_zero_based_and_in_input_order() {
        let text = "Intro line that is long enough to pass the minimum character threshold easily.\n\n\
                    ==History==\nShort.\n\
                    Another sufficiently long paragraph describing history in detail here.";
        let records = build_records(&article("Foo-Bar", "Foo-Bar", text), 40);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "Foo-Bar_0");
        assert_eq!(records[1].id, "Foo-Bar_1");
        assert!(records[0].text.starts_with("Intro line"));
        assert!(records[1].text.starts_with("Another sufficiently"));
    }

    #[test]
    fn test_id_and_title_are_normalized() {
        // En dash in the id and title must not fracture derived ids
        let text = "A paragraph that is definitely long enough to survive the length filter here.";
        let records = build_records(&article("Data\u{2013}Science", "Data\u{2013}Science", text), 40);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "Data-Science_0");
        assert_eq!(records[0].title, "Data-Science");
    }

    #[test]
    fn test_url_passes_through_verbatim() {
        let text = "A paragraph that is definitely long enough to survive the length filter here.";
        let records = build_records(&article("Foo", "Foo", text), 40);
        assert_eq!(
            records[0].url.as_deref(),
            Some("https://en.wikipedia.org/wiki/Foo-Bar")
        );

        let mut no_url = article("Foo", "Foo", text);
        no_url.url = None;
        assert_eq!(build_records(&no_url, 40)[0].url, None);
    }

    #[test]
    fn test_empty_text_yields_no_records() {
        assert!(build_records(&article("Foo", "Foo", ""), 40).is_empty());
    }

    #[test]
    fn test_missing_article_fields_still_produce_records() {
        let art = Article {
            id: String::new(),
            title: String::new(),
            url: None,
            text: "A paragraph that is definitely long enough to survive the length filter here."
                .to_string(),
        };
        let records = build_records(&art, 40);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "_0");
    }
}
