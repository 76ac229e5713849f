use crate::{models::Movie, services::catalog::Catalog};

/// Resolves user input to a catalog movie
///
/// Matching is exact on the title, ignoring case. Surrounding whitespace in
/// the query is ignored.
pub fn find_movie<'a>(catalog: &'a Catalog, query: &str) -> Option<&'a Movie> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    catalog.find(query)
}
