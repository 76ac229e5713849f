use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, WatchlistRecord},
};

/// Durable storage for per-user watchlists
///
/// `read` returns `Ok(None)` when the user has never been persisted; that is
/// an expected condition, not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Replaces the stored watchlist for `username`
    async fn write(&self, username: &str, movies: &[Movie]) -> AppResult<()>;

    /// Reads the stored watchlist for `username`, if any
    async fn read(&self, username: &str) -> AppResult<Option<Vec<Movie>>>;
}

/// Stores each watchlist as `{dir}/{username}_watchlist.json`
#[derive(Debug, Clone)]
pub struct FileWatchlistRepository {
    dir: PathBuf,
}

impl FileWatchlistRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, username: &str) -> AppResult<PathBuf> {
        validate_username(username)?;
        Ok(self.dir.join(format!("{}_watchlist.json", username)))
    }
}

/// Rejects usernames that could escape the watchlist directory
fn validate_username(username: &str) -> AppResult<()> {
    let invalid = username.is_empty()
        || username.contains(['/', '\\', '\0'])
        || username.contains("..");
    if invalid {
        return Err(AppError::InvalidInput(format!(
            "Invalid username: {:?}",
            username
        )));
    }
    Ok(())
}

#[async_trait::async_trait]
impl WatchlistRepository for FileWatchlistRepository {
    async fn write(&self, username: &str, movies: &[Movie]) -> AppResult<()> {
        let path = self.path_for(username)?;

        let record = WatchlistRecord {
            username: username.to_string(),
            saved_at: Utc::now(),
            movies: movies.to_vec(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        tokio::fs::create_dir_all(&self.dir).await?;

        // Write then rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::debug!(
            username = %username,
            movies = movies.len(),
            path = %path.display(),
            "Watchlist written"
        );

        Ok(())
    }

    async fn read(&self, username: &str) -> AppResult<Option<Vec<Movie>>> {
        let path = self.path_for(username)?;

        let json = match tokio::fs::read_to_string(&path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: WatchlistRecord = serde_json::from_str(&json)?;
        Ok(Some(record.movies))
    }
}
