use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use crate::types::SequenceKey;

/// Interning table mapping external string keys to dense integer ids.
///
/// Ids are assigned in first-seen order starting at 0 and never change for
/// the lifetime of the registry.
#[derive(Debug, Default)]
pub struct StringRegistry {
    ids: HashMap<String, SequenceKey>,
    names: Vec<String>,
}

impl StringRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `name`, interning it on first sight.
    pub fn resolve(&mut self, name: &str) -> SequenceKey {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.names.len() as SequenceKey;
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        id
    }

    /// Returns the id for `name` without interning.
    pub fn lookup(&self, name: &str) -> Option<SequenceKey> {
        self.ids.get(name).copied()
    }

    /// Returns the string behind a previously assigned id.
    pub fn name(&self, key: SequenceKey) -> Option<&str> {
        self.names.get(key as usize).map(String::as_str)
    }

    /// Number of interned keys.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no key has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Describes which manifest keys belong to the corpus and owns the key
/// registry shared by every sequence descriptor.
///
/// [`CorpusDescriptor::full`] admits every line; [`CorpusDescriptor::subset`]
/// admits only the named keys, and excluded lines consume no sequence or
/// chunk ids at all.
#[derive(Debug)]
pub struct CorpusDescriptor {
    registry: RwLock<StringRegistry>,
    included: Option<HashSet<String>>,
}

impl CorpusDescriptor {
    /// Corpus that includes every manifest line.
    pub fn full() -> Self {
        Self {
            registry: RwLock::new(StringRegistry::new()),
            included: None,
        }
    }

    /// Corpus restricted to the given keys.
    pub fn subset<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry: RwLock::new(StringRegistry::new()),
            included: Some(keys.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether a manifest line with this key participates in indexing.
    pub fn is_included(&self, key: &str) -> bool {
        match &self.included {
            Some(keys) => keys.contains(key),
            None => true,
        }
    }

    /// Interns `key` and returns its registry id.
    pub fn resolve(&self, key: &str) -> SequenceKey {
        self.registry
            .write()
            .expect("string registry poisoned")
            .resolve(key)
    }

    /// Returns the id for `key` if it was seen during indexing.
    pub fn lookup(&self, key: &str) -> Option<SequenceKey> {
        self.registry
            .read()
            .expect("string registry poisoned")
            .lookup(key)
    }

    /// Returns the original string for a registry id.
    pub fn key_name(&self, key: SequenceKey) -> Option<String> {
        self.registry
            .read()
            .expect("string registry poisoned")
            .name(key)
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_is_stable_across_repeats() {
        let mut registry = StringRegistry::new();
        let a = registry.resolve("alpha");
        let b = registry.resolve("beta");
        assert_eq!(registry.resolve("alpha"), a);
        assert_eq!(registry.resolve("beta"), b);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn name_reverses_resolve() {
        let mut registry = StringRegistry::new();
        let id = registry.resolve("img_0001");
        assert_eq!(registry.name(id), Some("img_0001"));
        assert_eq!(registry.name(id + 1), None);
    }

    #[test]
    fn full_corpus_includes_everything() {
        let corpus = CorpusDescriptor::full();
        assert!(corpus.is_included("anything"));
    }

    #[test]
    fn subset_filters_by_key() {
        let corpus = CorpusDescriptor::subset(["keep"]);
        assert!(corpus.is_included("keep"));
        assert!(!corpus.is_included("drop"));
    }

    #[test]
    fn lookup_only_sees_resolved_keys() {
        let corpus = CorpusDescriptor::full();
        assert_eq!(corpus.lookup("cat"), None);
        let id = corpus.resolve("cat");
        assert_eq!(corpus.lookup("cat"), Some(id));
        assert_eq!(corpus.key_name(id).as_deref(), Some("cat"));
    }
}
