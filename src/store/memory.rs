//! In-memory hero store
//!
//! A `BTreeMap` behind a single `std::sync::Mutex`. Every operation takes the
//! lock exactly once, so each one is atomic with respect to all others and
//! `list` always sees a consistent snapshot. The lock is never held across an
//! `.await`; handlers call these methods synchronously.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Hero;

/// Shared name -> `Hero` map
#[derive(Debug, Default)]
pub struct HeroStore {
    heroes: Mutex<BTreeMap<String, Hero>>,
}

impl HeroStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the hero stored under `name`
    pub fn put(&self, name: String, hero: Hero) {
        self.lock().insert(name, hero);
    }

    pub fn get(&self, name: &str) -> Option<Hero> {
        self.lock().get(name).cloned()
    }

    /// Remove the hero under `name`, returning whether it was present
    pub fn delete(&self, name: &str) -> bool {
        self.lock().remove(name).is_some()
    }

    /// Replace the hero under `name` only if one is already stored.
    ///
    /// The existence check and the write happen under the same lock.
    pub fn replace(&self, name: &str, hero: Hero) -> bool {
        let mut heroes = self.lock();
        match heroes.get_mut(name) {
            Some(slot) => {
                *slot = hero;
                true
            }
            None => false,
        }
    }

    /// Snapshot of every stored hero, ordered by name
    pub fn list(&self) -> Vec<Hero> {
        self.lock().values().cloned().collect()
    }

    /// Remove every hero, returning how many were stored
    pub fn clear(&self) -> usize {
        std::mem::take(&mut *self.lock()).len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Each critical section is a single map call, so a poisoned map is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Hero>> {
        self.heroes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn thor() -> Hero {
        Hero::new("Thor", "God of Thunder", "Strength", 5)
    }

    #[test]
    fn test_put_then_get() {
        let store = HeroStore::new();
        store.put("Thor".to_string(), thor());
        assert_eq!(store.get("Thor"), Some(thor()));
        assert_eq!(store.get("Loki"), None);
    }

    #[test]
    fn test_put_replaces_without_merging() {
        let store = HeroStore::new();
        store.put("Thor".to_string(), thor());
        store.put("Thor".to_string(), Hero::new("Thor", "", "Wisdom", 1));

        let hero = store.get("Thor").unwrap();
        assert_eq!(hero.description, "");
        assert_eq!(hero.quality, "Wisdom");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_requires_existing_key() {
        let store = HeroStore::new();
        assert!(!store.replace("Thor", thor()));
        assert_eq!(store.len(), 0);

        store.put("Thor".to_string(), thor());
        let king = Hero::new("Thor", "Asgardian King", "Wisdom", 4);
        assert!(store.replace("Thor", king.clone()));
        assert_eq!(store.get("Thor"), Some(king));
    }

    #[test]
    fn test_delete_reports_presence() {
        let store = HeroStore::new();
        store.put("Thor".to_string(), thor());
        assert!(store.delete("Thor"));
        assert!(!store.delete("Thor"));
        assert!(store.get("Thor").is_none());
    }

    #[test]
    fn test_list_sorted_and_clear() {
        let store = HeroStore::new();
        for name in ["Vision", "Hulk", "Thor"] {
            store.put(name.to_string(), Hero::new(name, "", "", 3));
        }
        store.delete("Hulk");

        let names: Vec<String> = store.list().into_iter().map(|h| h.name).collect();
        assert_eq!(names, vec!["Thor", "Vision"]);

        assert!(!store.is_empty());
        assert_eq!(store.clear(), 2);
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_concurrent_puts() {
        let store = Arc::new(HeroStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let name = format!("hero-{t}-{i}");
                        store.put(name.clone(), Hero::new(&name, "", "", 1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 800);
        assert!(store.get("hero-7-99").is_some());
    }
}
