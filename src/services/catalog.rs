use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::models::{title_key, CatalogRow, Movie};

/// Error types for catalog loading
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog file is not a JSON array of rows: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Validated, in-memory movie collection
///
/// Built once at startup and shared read-only afterwards. Each movie's
/// similar-items set (other movies sharing at least one genre) is computed
/// here and never changes.
#[derive(Debug, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    similar: Vec<Vec<usize>>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog from already-validated movies
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut genre_map: HashMap<&str, Vec<usize>> = HashMap::new();
        for (idx, movie) in movies.iter().enumerate() {
            for genre in &movie.genres {
                genre_map.entry(genre.as_str()).or_default().push(idx);
            }
        }

        let similar = movies
            .iter()
            .map(|movie| {
                let key = movie.key();
                let peers: BTreeSet<usize> = movie
                    .genres
                    .iter()
                    .filter_map(|genre| genre_map.get(genre.as_str()))
                    .flatten()
                    .copied()
                    .filter(|&peer| movies[peer].key() != key)
                    .collect();
                peers.into_iter().collect()
            })
            .collect();

        // First occurrence wins on duplicate titles
        let mut by_title = HashMap::new();
        for (idx, movie) in movies.iter().enumerate() {
            by_title.entry(movie.key()).or_insert(idx);
        }

        Self {
            movies,
            similar,
            by_title,
        }
    }

    /// Loads a catalog from a JSON export of the raw dataset
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let rows: Vec<Value> = serde_json::from_str(&raw)?;
        let total = rows.len();

        let movies: Vec<Movie> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<CatalogRow>(row) {
                Ok(row) => validate_row(row),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed catalog row");
                    None
                }
            })
            .collect();

        tracing::info!(
            path = %path.display(),
            rows = total,
            movies = movies.len(),
            skipped = total - movies.len(),
            "Loaded movie catalog"
        );

        Ok(Self::new(movies))
    }

    /// Case-insensitive exact title lookup
    pub fn find(&self, title: &str) -> Option<&Movie> {
        self.by_title
            .get(&title_key(title))
            .map(|&idx| &self.movies[idx])
    }

    /// Movies sharing at least one genre with `movie`, excluding itself
    ///
    /// Returns an empty iterator for movies that are not part of this catalog.
    pub fn similar_to<'a>(&'a self, movie: &Movie) -> impl Iterator<Item = &'a Movie> + 'a {
        let peers: &'a [usize] = self
            .by_title
            .get(&movie.key())
            .map(|&idx| self.similar[idx].as_slice())
            .unwrap_or(&[]);
        peers.iter().map(move |&idx| &self.movies[idx])
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Turns a raw row into a movie, or `None` if the row is malformed
fn validate_row(row: CatalogRow) -> Option<Movie> {
    let title = row.title.filter(|t| !t.trim().is_empty())?;
    let director = row.director?;
    let overview = row.overview?;
    let released_year = row.released_year.filter(|v| !v.is_null())?;
    let imdb_rating = row.imdb_rating.filter(|v| !v.is_null())?;

    let genres: Vec<String> = row
        .genre
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    if genres.is_empty() {
        tracing::warn!(title = %title, "Skipping movie without genres");
        return None;
    }

    let Some(release_year) = parse_year(&released_year) else {
        tracing::warn!(title = %title, value = %released_year, "Invalid year value");
        return None;
    };

    let Some(rating) = parse_rating(&imdb_rating) else {
        tracing::warn!(title = %title, value = %imdb_rating, "Invalid rating value");
        return None;
    };

    Some(Movie {
        title,
        director,
        release_year,
        genres,
        rating,
        plot: overview,
        poster_link: row.poster_link.unwrap_or_default(),
    })
}

fn parse_year(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_rating(value: &Value) -> Option<f64> {
    let rating: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    rating.filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie;
    use serde_json::json;

    fn titles<'a>(movies: impl Iterator<Item = &'a Movie>) -> Vec<String> {
        let mut titles: Vec<String> = movies.map(|m| m.title.clone()).collect();
        titles.sort();
        titles
    }

    #[test]
    fn test_similar_movies_share_a_genre() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War"]),
            movie("B", &["Drama"]),
            movie("C", &["War"]),
            movie("D", &["Comedy"]),
        ]);

        let a = catalog.find("A").unwrap();
        assert_eq!(titles(catalog.similar_to(a)), vec!["B", "C"]);

        let b = catalog.find("B").unwrap();
        assert_eq!(titles(catalog.similar_to(b)), vec!["A"]);

        let d = catalog.find("D").unwrap();
        assert!(catalog.similar_to(d).next().is_none());
    }

    #[test]
    fn test_similar_set_has_no_duplicates_for_multi_genre_overlap() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War"]),
            movie("B", &["Drama", "War"]),
        ]);
        let a = catalog.find("A").unwrap();
        assert_eq!(titles(catalog.similar_to(a)), vec!["B"]);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = Catalog::new(vec![movie("The Dark Knight", &["Action"])]);
        assert!(catalog.find("the dark knight").is_some());
        assert!(catalog.find("THE DARK KNIGHT").is_some());
        assert!(catalog.find("Dark Knight").is_none());
    }

    #[test]
    fn test_validate_row_splits_and_trims_genres() {
        let row = CatalogRow {
            title: Some("1917".to_string()),
            director: Some("Sam Mendes".to_string()),
            released_year: Some(json!("2019")),
            genre: Some("Drama, War".to_string()),
            imdb_rating: Some(json!(8.3)),
            overview: Some("Two soldiers...".to_string()),
            poster_link: None,
        };
        let m = validate_row(row).unwrap();
        assert_eq!(m.genres, vec!["Drama", "War"]);
        assert_eq!(m.release_year, 2019);
        assert_eq!(m.poster_link, "");
    }

    #[test]
    fn test_validate_row_skips_invalid_year() {
        let row = CatalogRow {
            title: Some("Apollo 13".to_string()),
            director: Some("Ron Howard".to_string()),
            released_year: Some(json!("PG")),
            genre: Some("Adventure, Drama".to_string()),
            imdb_rating: Some(json!("7.6")),
            overview: Some("NASA must devise a strategy...".to_string()),
            poster_link: None,
        };
        assert!(validate_row(row).is_none());
    }

    #[test]
    fn test_validate_row_skips_missing_columns() {
        let row = CatalogRow {
            title: Some("Untitled".to_string()),
            ..Default::default()
        };
        assert!(validate_row(row).is_none());
    }

    #[tokio::test]
    async fn test_load_skips_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        let rows = json!([
            {
                "Series_Title": "Heat",
                "Director": "Michael Mann",
                "Released_Year": 1995,
                "Genre": "Action, Crime, Drama",
                "IMDB_Rating": 8.3,
                "Overview": "A group of professional bank robbers..."
            },
            {
                "Series_Title": "Broken",
                "Director": "Nobody",
                "Released_Year": "1995",
                "Genre": "Drama",
                "IMDB_Rating": "n/a",
                "Overview": "Rating is not a number"
            },
            {
                "Series_Title": "No Genre",
                "Director": "Nobody",
                "Released_Year": 2001,
                "IMDB_Rating": 5.0,
                "Overview": "Missing genre column"
            },
            {
                "Series_Title": 1917,
                "Director": "Sam Mendes",
                "Released_Year": 2019,
                "Genre": "Drama, War",
                "IMDB_Rating": 8.3,
                "Overview": "Title column has the wrong type"
            },
            {
                "Series_Title": "Alien",
                "Director": "Ridley Scott",
                "Released_Year": "1979",
                "Genre": "Horror, Sci-Fi",
                "IMDB_Rating": "8.4",
                "Overview": "A commercial crew aboard a spaceship..."
            }
        ]);
        std::fs::write(&path, rows.to_string()).unwrap();

        let catalog = Catalog::load(&path).await.unwrap();
        let titles: Vec<&str> = catalog.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Alien"]);
    }

    #[tokio::test]
    async fn test_load_rejects_non_array_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, r#"{"Series_Title": "Heat"}"#).unwrap();

        let result = Catalog::load(&path).await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Catalog::load(dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
