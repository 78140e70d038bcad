//! Article cleaning and paragraph chunking
//!
//! Wikipedia plaintext extracts carry citation markers like `[12]` and
//! section headers like `== History ==`. Both are noise for retrieval, so
//! they are stripped before the text is split into paragraph-sized chunks.

use regex::Regex;

/// Strip citation markers and collapse blank-line runs.
///
/// This is the first cleaning pass; [`clean_and_split`] applies it before
/// doing anything else. Idempotent on already-clean text.
pub fn basic_clean(text: &str) -> String {
    // Citation numbers like [1], [23]
    let citations = Regex::new(r"\[\d+\]").unwrap();
    let text = citations.replace_all(text, "");

    let blank_runs = Regex::new(r"\n{2,}").unwrap();
    let text = blank_runs.replace_all(&text, "\n");

    text.trim().to_string()
}

/// Clean article text and split it into paragraph-sized chunks.
///
/// Candidates shorter than `min_chars` characters after trimming are
/// dropped. Chunks come back fully materialized and in document order; the
/// caller derives the chunk index from that order, so it must stay stable.
///
/// Empty input and all-too-short input both yield an empty Vec - neither is
/// an error.
pub fn clean_and_split(text: &str, min_chars: usize) -> Vec<String> {
    let text = basic_clean(text);

    // Wiki section headers: == History ==, === Subsection ===, ...
    let headers = Regex::new(r"={2,}.*?={2,}").unwrap();
    let text = headers.replace_all(&text, "");

    // Header removal leaves blank lines behind
    let blank_runs = Regex::new(r"\n{2,}").unwrap();
    let text = blank_runs.replace_all(&text, "\n");

    text.split('\n')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty() && chunk.chars().count() >= min_chars)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_INTRO: &str =
        "Intro line that is long enough to pass the minimum character threshold easily.";
    const LONG_HISTORY: &str =
        "Another sufficiently long paragraph describing history in detail here.";

    #[test]
    fn test_citation_markers_stripped_before_length_check() {
        let cleaned = basic_clean("Fact one[1] about ML.");
        assert_eq!(cleaned, "Fact one about ML.");

        // The marker must not count toward the minimum length
        let chunks = clean_and_split("Fact one[1][2][3] about ML.", 19);
        assert!(chunks.is_empty());
        let chunks = clean_and_split("Fact one[1][2][3] about ML.", 18);
        assert_eq!(chunks, vec!["Fact one about ML.".to_string()]);
    }

    #[test]
    fn test_headers_and_short_lines_dropped() {
        let text = format!("{}\n\n==History==\nShort.\n{}", LONG_INTRO, LONG_HISTORY);
        let chunks = clean_and_split(&text, 40);
        assert_eq!(chunks, vec![LONG_INTRO.to_string(), LONG_HISTORY.to_string()]);
    }

    #[test]
    fn test_nested_header_markers() {
        let text = format!("=== Deep subsection ===\n{}", LONG_INTRO);
        let chunks = clean_and_split(&text, 40);
        assert_eq!(chunks, vec![LONG_INTRO.to_string()]);
    }

    #[test]
    fn test_empty_input_yields_empty_result() {
        assert!(clean_and_split("", 125).is_empty());
    }

    #[test]
    fn test_all_too_short_yields_empty_result() {
        assert!(clean_and_split("Tiny.\nAlso tiny.\n", 125).is_empty());
    }

    #[test]
    fn test_zero_min_chars_keeps_every_nonempty_line() {
        let chunks = clean_and_split("one\n\ntwo\n   \nthree", 0);
        assert_eq!(chunks, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_min_length_measured_in_chars_not_bytes() {
        // Ten two-byte characters: passes a min of 10, fails a min of 11
        let text = "éééééééééé";
        assert_eq!(clean_and_split(text, 10).len(), 1);
        assert!(clean_and_split(text, 11).is_empty());
    }

    #[test]
    fn test_chunk_order_is_document_order() {
        let text = format!("{}\n{}", LONG_HISTORY, LONG_INTRO);
        let chunks = clean_and_split(&text, 40);
        assert_eq!(chunks, vec![LONG_HISTORY.to_string(), LONG_INTRO.to_string()]);
    }

    #[test]
    fn test_idempotent_on_clean_text() {
        let text = format!("{}\n\n==History==\nShort.\n{}", LONG_INTRO, LONG_HISTORY);
        let once = clean_and_split(&text, 40);
        let twice = clean_and_split(&once.join("\n"), 40);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_every_chunk_meets_minimum_length() {
        let text = "short\nmedium length line here\nthis one is clearly the longest line of all";
        for min_chars in [0usize, 5, 10, 25, 40, 100] {
            for chunk in clean_and_split(text, min_chars) {
                assert!(chunk.trim().chars().count() >= min_chars);
            }
        }
    }
}
