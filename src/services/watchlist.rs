use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use crate::{db::WatchlistRepository, error::AppResult, models::Movie};

/// One user's in-memory watchlist; `None` until the user's list is first
/// created or restored
type Slot = Arc<Mutex<Option<Vec<Movie>>>>;

/// A single change applied to a watchlist
#[derive(Debug, Clone, PartialEq)]
pub enum WatchlistEdit {
    Add(Movie),
    Remove(Movie),
}

/// Owns every user's watchlist and its persistence
///
/// Each username has its own lock, so operations for different users never
/// wait on each other. Within one user, [`WatchlistStore::apply`] performs
/// the edit and the persist under a single lock acquisition.
pub struct WatchlistStore {
    repository: Arc<dyn WatchlistRepository>,
    slots: RwLock<HashMap<String, Slot>>,
}

impl WatchlistStore {
    pub fn new(repository: Arc<dyn WatchlistRepository>) -> Self {
        Self {
            repository,
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn existing_slot(&self, username: &str) -> Option<Slot> {
        self.slots
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(username)
            .cloned()
    }

    fn slot(&self, username: &str) -> Slot {
        if let Some(slot) = self.existing_slot(username) {
            return slot;
        }

        self.slots
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(username.to_string())
            .or_default()
            .clone()
    }

    /// Returns the user's watchlist, empty if the user has none
    pub async fn get(&self, username: &str) -> Vec<Movie> {
        let Some(slot) = self.existing_slot(username) else {
            return Vec::new();
        };
        let guard = slot.lock().await;
        guard.clone().unwrap_or_default()
    }

    /// Appends `movie`, creating the list if needed; duplicates are allowed
    pub async fn add(&self, username: &str, movie: Movie) {
        let slot = self.slot(username);
        let mut guard = slot.lock().await;
        apply_edit(&mut guard, WatchlistEdit::Add(movie));
    }

    /// Removes the first entry with the same title as `movie`
    pub async fn remove(&self, username: &str, movie: &Movie) {
        let Some(slot) = self.existing_slot(username) else {
            return;
        };
        let mut guard = slot.lock().await;
        apply_edit(&mut guard, WatchlistEdit::Remove(movie.clone()));
    }

    /// Writes the user's current list to the repository
    ///
    /// Does nothing when the user has no in-memory list.
    pub async fn persist(&self, username: &str) -> AppResult<()> {
        let Some(slot) = self.existing_slot(username) else {
            return Ok(());
        };
        let guard = slot.lock().await;
        self.write_locked(username, &guard).await
    }

    /// Applies an optional edit and persists, atomically for this user
    ///
    /// The edit only becomes visible once the write succeeds; on failure the
    /// in-memory list is left as it was.
    pub async fn apply(&self, username: &str, edit: Option<WatchlistEdit>) -> AppResult<()> {
        let Some(edit) = edit else {
            return self.persist(username).await;
        };

        let slot = self.slot(username);
        let mut guard = slot.lock().await;
        let mut next = guard.clone();
        apply_edit(&mut next, edit);
        self.write_locked(username, &next).await?;
        *guard = next;
        Ok(())
    }

    /// Restores the user's list from the repository
    ///
    /// Returns `false` and leaves memory untouched if no record exists.
    pub async fn reload(&self, username: &str) -> AppResult<bool> {
        let restored = match self.existing_slot(username) {
            Some(slot) => {
                let mut guard = slot.lock().await;
                let record = self.repository.read(username).await?;
                record.map(|movies| {
                    let count = movies.len();
                    *guard = Some(movies);
                    count
                })
            }
            // Only users with a stored record get a slot
            None => match self.repository.read(username).await? {
                Some(movies) => {
                    let count = movies.len();
                    let slot = self.slot(username);
                    let mut guard = slot.lock().await;
                    // An apply that raced in already holds the newer list
                    if guard.is_none() {
                        *guard = Some(movies);
                    }
                    Some(count)
                }
                None => None,
            },
        };

        match restored {
            Some(count) => {
                tracing::info!(username = %username, movies = count, "Restored watchlist");
                Ok(true)
            }
            None => {
                tracing::info!(username = %username, "No existing watchlist for user");
                Ok(false)
            }
        }
    }

    async fn write_locked(&self, username: &str, watchlist: &Option<Vec<Movie>>) -> AppResult<()> {
        let Some(movies) = watchlist else {
            return Ok(());
        };
        self.repository.write(username, movies).await.map_err(|e| {
            tracing::error!(username = %username, error = %e, "Failed to persist watchlist");
            e
        })
    }
}

fn apply_edit(watchlist: &mut Option<Vec<Movie>>, edit: WatchlistEdit) {
    match edit {
        WatchlistEdit::Add(movie) => watchlist.get_or_insert_with(Vec::new).push(movie),
        WatchlistEdit::Remove(movie) => {
            if let Some(movies) = watchlist.as_mut() {
                if let Some(pos) = movies.iter().position(|m| m.same_item(&movie)) {
                    movies.remove(pos);
                }
            }
        }
    }
}
