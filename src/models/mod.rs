use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A movie in the catalog
///
/// Titles identify movies; two movies are the same item when their titles
/// match case-insensitively (see [`Movie::key`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub title: String,
    pub director: String,
    pub release_year: i32,
    /// Genres in the order the catalog lists them; never empty
    pub genres: Vec<String>,
    pub rating: f64,
    pub plot: String,
    pub poster_link: String,
}

impl Movie {
    /// Identity key used for every "already have this movie" check
    pub fn key(&self) -> String {
        title_key(&self.title)
    }

    /// Returns true if both values refer to the same catalog item
    pub fn same_item(&self, other: &Movie) -> bool {
        self.key() == other.key()
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }

    /// The genre used to seed graph exploration
    pub fn primary_genre(&self) -> Option<&str> {
        self.genres.first().map(String::as_str)
    }
}

/// Normalizes a title into its identity key
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Raw catalog row as exported from the source dataset
///
/// Every column is optional here; validation happens when the row is turned
/// into a [`Movie`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "Series_Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Director", default)]
    pub director: Option<String>,
    #[serde(rename = "Released_Year", default)]
    pub released_year: Option<serde_json::Value>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "IMDB_Rating", default)]
    pub imdb_rating: Option<serde_json::Value>,
    #[serde(rename = "Overview", default)]
    pub overview: Option<String>,
    #[serde(rename = "Poster_Link", default)]
    pub poster_link: Option<String>,
}

/// Persisted form of one user's watchlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistRecord {
    pub username: String,
    pub saved_at: DateTime<Utc>,
    pub movies: Vec<Movie>,
}

#[cfg(test)]
pub(crate) fn movie(title: &str, genres: &[&str]) -> Movie {
    Movie {
        title: title.to_string(),
        director: "Unknown".to_string(),
        release_year: 2000,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        rating: 7.5,
        plot: String::new(),
        poster_link: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_case_insensitive() {
        let a = movie("The Godfather", &["Crime"]);
        let b = movie("THE GODFATHER", &["Drama"]);
        assert_eq!(a.key(), b.key());
        assert!(a.same_item(&b));
    }

    #[test]
    fn test_primary_genre_is_first_listed() {
        let m = movie("1917", &["Drama", "War"]);
        assert_eq!(m.primary_genre(), Some("Drama"));
        assert!(m.has_genre("War"));
        assert!(!m.has_genre("Comedy"));
    }

    #[test]
    fn test_catalog_row_uses_dataset_columns() {
        let json = r#"{
            "Series_Title": "Heat",
            "Director": "Michael Mann",
            "Released_Year": "1995",
            "Genre": "Action, Crime, Drama",
            "IMDB_Rating": 8.3,
            "Overview": "A group of professional bank robbers...",
            "Poster_Link": "https://example.com/heat.jpg",
            "Runtime": "170 min"
        }"#;
        let row: CatalogRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.title.as_deref(), Some("Heat"));
        assert_eq!(row.genre.as_deref(), Some("Action, Crime, Drama"));
        assert_eq!(row.imdb_rating, Some(serde_json::json!(8.3)));
    }

    #[test]
    fn test_watchlist_record_keeps_movie_fields() {
        let record = WatchlistRecord {
            username: "alice".to_string(),
            saved_at: Utc::now(),
            movies: vec![movie("Heat", &["Action", "Crime"])],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: WatchlistRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.movies, record.movies);
    }
}
