use std::collections::{HashMap, HashSet, VecDeque};

use crate::services::catalog::Catalog;

/// A genre together with the genres it co-occurs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub name: String,
    /// Neighbour genres in first-seen order
    neighbours: Vec<String>,
    /// Number of movies carrying both this genre and the neighbour
    co_occurrences: HashMap<String, u32>,
}

impl CategoryNode {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            neighbours: Vec::new(),
            co_occurrences: HashMap::new(),
        }
    }

    fn add_connection(&mut self, other: &str) {
        match self.co_occurrences.get_mut(other) {
            Some(count) => *count += 1,
            None => {
                self.neighbours.push(other.to_string());
                self.co_occurrences.insert(other.to_string(), 1);
            }
        }
    }

    pub fn neighbours(&self) -> impl Iterator<Item = &str> {
        self.neighbours.iter().map(String::as_str)
    }

    /// Co-occurrence count towards `other`, zero if the genres never meet
    pub fn weight(&self, other: &str) -> u32 {
        self.co_occurrences.get(other).copied().unwrap_or(0)
    }
}

/// Undirected genre co-occurrence graph
///
/// Every genre found on any movie has exactly one node. Two genres are
/// adjacent (in both directions) when at least one movie lists both.
#[derive(Debug, Clone, Default)]
pub struct CategoryGraph {
    nodes: HashMap<String, CategoryNode>,
}

impl CategoryGraph {
    /// Builds the graph from every movie in the catalog
    pub fn build(catalog: &Catalog) -> Self {
        let mut nodes: HashMap<String, CategoryNode> = HashMap::new();

        for movie in catalog.movies() {
            // A genre listed twice on the same movie counts once
            let mut genres: Vec<&str> = Vec::with_capacity(movie.genres.len());
            for genre in &movie.genres {
                if !genres.contains(&genre.as_str()) {
                    genres.push(genre.as_str());
                }
            }

            for &genre in &genres {
                let node = nodes
                    .entry(genre.to_string())
                    .or_insert_with(|| CategoryNode::new(genre));
                for &other in &genres {
                    if other != genre {
                        node.add_connection(other);
                    }
                }
            }
        }

        tracing::debug!(genres = nodes.len(), "Built category graph");

        Self { nodes }
    }

    pub fn node(&self, genre: &str) -> Option<&CategoryNode> {
        self.nodes.get(genre)
    }

    pub fn contains(&self, genre: &str) -> bool {
        self.nodes.contains_key(genre)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Genres reachable from `start`, in breadth-first discovery order
    ///
    /// The start genre itself is never part of the result and each genre
    /// appears once, at the moment it is first enqueued. An unknown start
    /// genre yields an empty result.
    pub fn bfs(&self, start: &str) -> Vec<String> {
        let Some(start_node) = self.nodes.get(start) else {
            tracing::debug!(genre = %start, "Genre does not exist in the category graph");
            return Vec::new();
        };

        let mut discovered: HashSet<&str> = HashSet::from([start_node.name.as_str()]);
        let mut queue: VecDeque<&CategoryNode> = VecDeque::from([start_node]);
        let mut related = Vec::new();

        while let Some(current) = queue.pop_front() {
            for neighbour in current.neighbours() {
                if !discovered.insert(neighbour) {
                    continue;
                }
                related.push(neighbour.to_string());
                if let Some(node) = self.nodes.get(neighbour) {
                    queue.push_back(node);
                }
            }
        }

        related
    }
}
