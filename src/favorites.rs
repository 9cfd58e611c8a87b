//! User-curated favorites, persisted as a JSON array of full anime
//! snapshots. Every mutation writes the whole collection back before
//! returning; there is no batching and no background flush.

use std::path::PathBuf;

use tracing::warn;

use crate::catalog::Anime;
use crate::error::Result;

pub struct Favorites {
    path: PathBuf,
    items: Vec<Anime>,
}

impl Favorites {
    /// Load favorites from disk. A missing or unreadable file yields an
    /// empty collection; startup never fails on favorites.
    pub fn load(path: PathBuf) -> Self {
        let items = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Corrupt favorites file, starting empty");
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        Self { path, items }
    }

    /// Insert a snapshot unless one with the same id exists. Idempotent.
    pub fn add(&mut self, anime: &Anime) -> Result<()> {
        if self.contains(&anime.id) {
            return Ok(());
        }
        self.items.push(anime.clone());
        self.save()
    }

    /// Delete the entry with this id if present. Idempotent.
    pub fn remove(&mut self, id: &str) -> Result<()> {
        let before = self.items.len();
        self.items.retain(|a| a.id != id);
        if self.items.len() == before {
            return Ok(());
        }
        self.save()
    }

    /// Remove if present, add otherwise. Returns whether the anime is a
    /// favorite after the call.
    pub fn toggle(&mut self, anime: &Anime) -> Result<bool> {
        if self.contains(&anime.id) {
            self.remove(&anime.id)?;
            Ok(false)
        } else {
            self.add(anime)?;
            Ok(true)
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|a| a.id == id)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshots in insertion order.
    pub fn items(&self) -> &[Anime] {
        &self.items
    }

    pub fn get(&self, idx: usize) -> Option<&Anime> {
        self.items.get(idx)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anime(id: &str) -> Anime {
        Anime {
            id: id.to_string(),
            title: format!("Show {}", id),
            genres: vec!["Action".to_string()],
            ..Default::default()
        }
    }

    fn temp_store() -> (tempfile::TempDir, Favorites) {
        let dir = tempfile::tempdir().unwrap();
        let store = Favorites::load(dir.path().join("favorites.json"));
        (dir, store)
    }

    fn persisted(store: &Favorites) -> Vec<Anime> {
        let content = std::fs::read_to_string(&store.path).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        std::fs::write(&path, "{ not json ]").unwrap();

        let store = Favorites::load(path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_dir, mut store) = temp_store();
        store.add(&anime("a")).unwrap();
        store.add(&anime("a")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(persisted(&store).len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, mut store) = temp_store();
        store.add(&anime("a")).unwrap();
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_is_an_involution() {
        let (_dir, mut store) = temp_store();
        store.add(&anime("kept")).unwrap();

        assert!(store.toggle(&anime("a")).unwrap());
        assert!(store.contains("a"));
        assert!(!store.toggle(&anime("a")).unwrap());
        assert!(!store.contains("a"));

        assert_eq!(store.items(), persisted(&store).as_slice());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_every_mutation_writes_through() {
        let (_dir, mut store) = temp_store();

        store.add(&anime("a")).unwrap();
        assert_eq!(store.items(), persisted(&store).as_slice());

        store.add(&anime("b")).unwrap();
        assert_eq!(store.items(), persisted(&store).as_slice());

        store.remove("a").unwrap();
        assert_eq!(store.items(), persisted(&store).as_slice());

        store.clear().unwrap();
        assert_eq!(store.items(), persisted(&store).as_slice());
        assert!(persisted(&store).is_empty());
    }

    #[test]
    fn test_insertion_order_preserved_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");

        let mut store = Favorites::load(path.clone());
        store.add(&anime("b")).unwrap();
        store.add(&anime("a")).unwrap();
        store.add(&anime("c")).unwrap();

        let reloaded = Favorites::load(path);
        let ids: Vec<&str> = reloaded.items().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
