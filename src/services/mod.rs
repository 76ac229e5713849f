pub mod catalog;
pub mod category_graph;
pub mod goal;
pub mod recommendation_plan;
pub mod recommendations;
pub mod title_search;
pub mod watchlist;

pub use catalog::{Catalog, CatalogError};
pub use category_graph::{CategoryGraph, CategoryNode};
pub use goal::{Goal, GoalStatus, Recommender};
pub use recommendation_plan::RecommendationPlan;
pub use watchlist::{WatchlistEdit, WatchlistStore};
