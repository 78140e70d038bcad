//! Text canonicalization for ids, titles, and article bodies
//!
//! Everything entering the corpus funnels through [`normalize`] so that
//! visually-identical strings compare equal and title-derived ids stay
//! stable across sources.

use unicode_normalization::UnicodeNormalization;

/// Dash and minus code points that fracture title-derived ids across sources.
/// NFKC folds some of these already; the rest are mapped here.
const DASH_VARIANTS: [char; 10] = [
    '\u{2010}', // hyphen
    '\u{2011}', // non-breaking hyphen
    '\u{2012}', // figure dash
    '\u{2013}', // en dash
    '\u{2014}', // em dash
    '\u{2015}', // horizontal bar
    '\u{2212}', // minus sign
    '\u{FE58}', // small em dash
    '\u{FE63}', // small hyphen-minus
    '\u{FF0D}', // fullwidth hyphen-minus
];

/// Canonicalize a raw string to a stable unicode form.
///
/// Applies NFKC, folds every dash/minus variant to the ASCII hyphen, turns
/// non-breaking spaces into ordinary spaces, drops the U+FFFD replacement
/// character, and trims surrounding whitespace. Missing input collapses to
/// an empty string so callers never special-case absent fields.
///
/// Idempotent: `normalize(normalize(x)) == normalize(x)` for all inputs.
pub fn normalize(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return String::new();
    };

    let mut out = String::with_capacity(raw.len());
    for ch in raw.nfkc() {
        match ch {
            '\u{FFFD}' => {} // artifact of encoding-detection failures upstream
            '\u{00A0}' => out.push(' '),
            c if DASH_VARIANTS.contains(&c) => out.push('-'),
            c => out.push(c),
        }
    }

    out.trim().to_string()
}
