use std::{collections::BTreeMap, sync::Arc};

use crate::instrument::SoundBank;

/// Name → sound bank lookup.
///
/// Only the loader builds one, so a registry always holds fully decoded
/// banks.
#[derive(Debug, Default)]
pub struct InstrumentRegistry {
    banks: BTreeMap<String, Arc<SoundBank>>,
}

impl InstrumentRegistry {
    pub(crate) fn from_banks(banks: impl IntoIterator<Item = SoundBank>) -> Self {
        Self {
            banks: banks
                .into_iter()
                .map(|bank| (bank.name().to_owned(), Arc::new(bank)))
                .collect(),
        }
    }

    /// The bank registered under `name`, if any. Names are case-sensitive.
    pub fn resolve(&self, name: &str) -> Option<Arc<SoundBank>> {
        self.banks.get(name).cloned()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<SoundBank>> {
        self.banks.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.banks.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<SoundBank>)> {
        self.banks.iter().map(|(name, bank)| (name.as_str(), bank))
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::builtin;

    fn registry() -> InstrumentRegistry {
        InstrumentRegistry::from_banks(
            builtin()
                .iter()
                .map(|d| SoundBank::decode(d).expect("builtin decodes")),
        )
    }

    #[test]
    fn resolves_registered_names() {
        let registry = registry();

        for name in ["Piano", "Guitar", "Marimba", "Xylophone"] {
            let bank = registry.resolve(name).expect("registered");
            assert_eq!(bank.name(), name);
        }
    }

    #[test]
    fn unknown_names_are_absent() {
        let registry = registry();

        assert!(registry.resolve("Trumpet").is_none());
        assert!(registry.resolve("piano").is_none());
        assert!(!registry.contains(""));
    }

    #[test]
    fn names_are_sorted() {
        let registry = registry();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["Guitar", "Marimba", "Piano", "Xylophone"]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn resolve_shares_the_same_bank() {
        let registry = registry();

        let a = registry.resolve("Piano").expect("registered");
        let b = registry.resolve("Piano").expect("registered");
        assert!(Arc::ptr_eq(&a, &b));
    }
}
