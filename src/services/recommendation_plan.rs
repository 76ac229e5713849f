use std::collections::HashSet;

use crate::models::Movie;
use crate::services::{catalog::Catalog, category_graph::CategoryGraph};

/// Recommendations derived from one reference movie
///
/// The candidate list is computed when the plan is created. It contains each
/// movie at most once (by title key) and never the reference itself; its
/// order carries no meaning.
#[derive(Debug, Clone)]
pub struct RecommendationPlan<'a> {
    reference: &'a Movie,
    recommendations: Vec<&'a Movie>,
}

impl<'a> RecommendationPlan<'a> {
    /// Creates a plan for `reference` and generates its recommendations
    pub fn new(reference: &'a Movie, catalog: &'a Catalog, graph: &CategoryGraph) -> Self {
        let recommendations = Self::generate(reference, catalog, graph);
        Self {
            reference,
            recommendations,
        }
    }

    /// Walks the genre graph from the reference's first genre only, then keeps
    /// the reference's similar movies that carry any of the related genres
    fn generate(reference: &'a Movie, catalog: &'a Catalog, graph: &CategoryGraph) -> Vec<&'a Movie> {
        let Some(seed) = reference.primary_genre() else {
            return Vec::new();
        };

        let related_genres = graph.bfs(seed);
        let reference_key = reference.key();

        let mut seen: HashSet<String> = HashSet::new();
        let mut recommendations = Vec::new();

        for genre in &related_genres {
            for candidate in catalog.similar_to(reference) {
                if !candidate.has_genre(genre) {
                    continue;
                }
                let key = candidate.key();
                if key == reference_key {
                    continue;
                }
                if seen.insert(key) {
                    recommendations.push(candidate);
                }
            }
        }

        tracing::debug!(
            reference = %reference.title,
            seed_genre = %seed,
            related_genres = related_genres.len(),
            recommendations = recommendations.len(),
            "Generated recommendation plan"
        );

        recommendations
    }

    pub fn reference(&self) -> &'a Movie {
        self.reference
    }

    pub fn recommendations(&self) -> &[&'a Movie] {
        &self.recommendations
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie;

    fn sorted_titles(plan: &RecommendationPlan<'_>) -> Vec<String> {
        let mut titles: Vec<String> = plan
            .recommendations()
            .iter()
            .map(|m| m.title.clone())
            .collect();
        titles.sort();
        titles
    }

    fn plan_for<'a>(title: &str, catalog: &'a Catalog, graph: &CategoryGraph) -> RecommendationPlan<'a> {
        let reference = catalog.find(title).unwrap();
        RecommendationPlan::new(reference, catalog, graph)
    }

    #[test]
    fn test_candidates_come_from_related_genres_only() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War"]),
            movie("B", &["Drama"]),
            movie("C", &["War"]),
            movie("D", &["Comedy"]),
        ]);
        let graph = CategoryGraph::build(&catalog);

        let plan = plan_for("A", &catalog, &graph);
        assert_eq!(plan.reference().title, "A");
        assert_eq!(sorted_titles(&plan), vec!["C"]);
    }

    #[test]
    fn test_only_first_genre_seeds_the_walk() {
        // "War" is first for A, so the related genre is Drama only
        let catalog = Catalog::new(vec![
            movie("A", &["War", "Drama"]),
            movie("B", &["Drama"]),
            movie("C", &["War"]),
        ]);
        let graph = CategoryGraph::build(&catalog);

        let plan = plan_for("A", &catalog, &graph);
        assert_eq!(sorted_titles(&plan), vec!["B"]);
    }

    #[test]
    fn test_never_recommends_reference_itself() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War"]),
            movie("B", &["Drama", "War"]),
            movie("E", &["War", "Drama"]),
        ]);
        let graph = CategoryGraph::build(&catalog);

        for title in ["A", "B", "E"] {
            let plan = plan_for(title, &catalog, &graph);
            assert!(plan.recommendations().iter().all(|m| m.title != title));
        }
    }

    #[test]
    fn test_results_are_unique_by_title() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War", "History"]),
            movie("B", &["War", "History", "Drama"]),
        ]);
        let graph = CategoryGraph::build(&catalog);

        let plan = plan_for("A", &catalog, &graph);
        assert_eq!(sorted_titles(&plan), vec!["B"]);
    }

    #[test]
    fn test_single_unshared_genre_yields_nothing() {
        let catalog = Catalog::new(vec![
            movie("A", &["Drama", "War"]),
            movie("D", &["Comedy"]),
        ]);
        let graph = CategoryGraph::build(&catalog);

        let plan = plan_for("D", &catalog, &graph);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_movie_without_genres_yields_nothing() {
        let catalog = Catalog::new(vec![movie("A", &["Drama"]), movie("B", &["Drama"])]);
        let graph = CategoryGraph::build(&catalog);
        let orphan = movie("Orphan", &[]);

        let plan = RecommendationPlan::new(&orphan, &catalog, &graph);
        assert!(plan.is_empty());
    }
}
