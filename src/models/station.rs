use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Raw spellings folded into each canonical identifier.
///
/// Normalization is lossy, so two physical stations can end up under one
/// identifier. This does not prevent that; it keeps enough to spot it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StationAliases {
    aliases: BTreeMap<String, BTreeSet<String>>,
}

impl StationAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `raw` normalized to `canonical`. Returns true when this is
    /// a spelling not seen before for an identifier that already had one.
    pub fn record(&mut self, raw: &str, canonical: &str) -> bool {
        let spellings = self.aliases.entry(canonical.to_string()).or_default();
        let had_other = !spellings.is_empty();
        spellings.insert(raw.trim().to_string()) && had_other
    }

    pub fn spellings(&self, canonical: &str) -> Option<&BTreeSet<String>> {
        self.aliases.get(canonical)
    }

    /// Identifiers that more than one distinct raw label collapsed onto
    pub fn collisions(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.aliases.iter().filter(|(_, spellings)| spellings.len() > 1)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_flags_new_spelling() {
        let mut aliases = StationAliases::new();

        assert!(!aliases.record("Sv. Ana", "Sveti Ana"));
        assert!(!aliases.record("Sv. Ana", "Sveti Ana"));
        assert!(aliases.record("sv. ana A", "Sveti Ana"));
        assert!(!aliases.record("Split", "Split"));

        let collisions: Vec<_> = aliases.collisions().map(|(id, _)| id.as_str()).collect();
        assert_eq!(collisions, vec!["Sveti Ana"]);
        assert_eq!(aliases.spellings("Sveti Ana").map(|s| s.len()), Some(2));
        assert_eq!(aliases.len(), 2);
    }
}
