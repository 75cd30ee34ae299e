use std::collections::HashSet;

use reel_types::{Movie, MovieId};

use crate::error::StoreError;
use crate::keys;
use crate::local::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Bookmarked movies in insertion order. Ids are unique.
#[derive(Debug, Default)]
pub struct Wishlist {
    movies: Vec<Movie>,
}

impl Wishlist {
    /// Read `movieWishlist`, keeping the first entry for each id.
    #[must_use]
    pub fn load(local: &KeyValueStore) -> Self {
        let Some(raw) = local.get(keys::WISHLIST) else {
            return Self::default();
        };
        let stored: Vec<Movie> = match serde_json::from_str(raw) {
            Ok(movies) => movies,
            Err(e) => {
                tracing::warn!("Ignoring unreadable wishlist: {e}");
                return Self::default();
            }
        };

        let mut seen = HashSet::new();
        let movies: Vec<Movie> = stored
            .into_iter()
            .filter(|movie| seen.insert(movie.id))
            .collect();
        Self { movies }
    }

    pub fn toggle(&mut self, movie: &Movie, local: &mut KeyValueStore) -> Result<Toggle, StoreError> {
        let outcome = if self.contains(movie.id) {
            self.movies.retain(|m| m.id != movie.id);
            Toggle::Removed
        } else {
            self.movies.push(movie.clone());
            Toggle::Added
        };
        local.set_json(keys::WISHLIST, &self.movies)?;
        tracing::debug!(id = %movie.id, ?outcome, "Wishlist toggled");
        Ok(outcome)
    }

    #[must_use]
    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.iter().any(|m| m.id == id)
    }

    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut local = KeyValueStore::in_memory();
        let mut wishlist = Wishlist::default();
        let movie = Movie::new(7, "Seven");

        assert_eq!(wishlist.toggle(&movie, &mut local).unwrap(), Toggle::Added);
        assert!(wishlist.contains(MovieId::new(7)));

        assert_eq!(wishlist.toggle(&movie, &mut local).unwrap(), Toggle::Removed);
        assert!(wishlist.is_empty());
        assert_eq!(local.get(keys::WISHLIST), Some("[]"));
    }

    #[test]
    fn load_preserves_order_and_drops_duplicate_ids() {
        let mut local = KeyValueStore::in_memory();
        local
            .set(
                keys::WISHLIST,
                r#"[{"id":2,"title":"Two"},{"id":1,"title":"One"},{"id":2,"title":"Dup"}]"#,
            )
            .unwrap();

        let wishlist = Wishlist::load(&local);
        let titles: Vec<_> = wishlist.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Two", "One"]);
    }

    #[test]
    fn persisted_wishlist_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut local = KeyValueStore::open(&path).unwrap();
        let mut wishlist = Wishlist::load(&local);
        wishlist.toggle(&Movie::new(1, "A"), &mut local).unwrap();
        wishlist.toggle(&Movie::new(2, "B"), &mut local).unwrap();

        let reloaded = Wishlist::load(&KeyValueStore::open(&path).unwrap());
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains(MovieId::new(2)));
    }

    #[test]
    fn corrupt_wishlist_loads_empty() {
        let mut local = KeyValueStore::in_memory();
        local.set(keys::WISHLIST, "nope").unwrap();
        assert!(Wishlist::load(&local).is_empty());
    }
}
