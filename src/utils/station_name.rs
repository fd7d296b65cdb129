//! Canonical station identifiers.
//!
//! Both the ingest path and every reader of the store go through
//! [`normalize_station`], so a rule change here is picked up by old data on
//! the next read.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Trailing auxiliary-sensor qualifier, e.g. "Split A"
static QUALIFIER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+A$").expect("qualifier pattern is valid"));

/// "Sv." abbreviation in any letter case
static SAINT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bsv\.\s*").expect("abbreviation pattern is valid"));

/// Letters with no NFKD decomposition but an obvious ASCII form
const ASCII_SUBSTITUTIONS: [(char, char); 2] = [('\u{0111}', 'd'), ('\u{0110}', 'D')];

/// Map a raw station label to its canonical identifier.
///
/// Total and idempotent. Empty or whitespace-only input yields an empty
/// string, which callers must discard themselves.
///
/// Case is folded to one capital per word, so inner capitals are lost
/// ("McDonald" becomes "Mcdonald") and a trailing lowercase " a" counts as
/// the qualifier ("Punta a" becomes "Punta").
pub fn normalize_station(raw: &str) -> String {
    let mut current = normalize_pass(raw);

    // Each pass on ASCII input only removes separators, dots or characters,
    // or fixes letter case, so the fixed point is reached quickly.
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(raw: &str) -> String {
    let name = raw.replace('/', " ");
    let name = QUALIFIER_SUFFIX.replace(&name, "");
    let name = SAINT_PREFIX.replace_all(&name, "Sveti ");
    let name = to_ascii(&name);
    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    canonical_case(&name)
}

/// Compatibility-decompose and keep only ASCII, substituting the few letters
/// that would otherwise vanish.
fn to_ascii(name: &str) -> String {
    name.nfkd()
        .filter_map(|c| {
            if c.is_ascii() {
                Some(c)
            } else {
                ASCII_SUBSTITUTIONS
                    .iter()
                    .find(|(from, _)| *from == c)
                    .map(|(_, to)| *to)
            }
        })
        .collect()
}

/// Upper-case the first letter of every word, lower-case the rest.
fn canonical_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if word_start {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c.to_ascii_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }

    out
}
