use std::sync::Arc;

use crate::{
    error::AppResult,
    models::Movie,
    services::{
        catalog::Catalog,
        category_graph::CategoryGraph,
        goal::{Goal, Recommender},
        recommendation_plan::RecommendationPlan,
        title_search::find_movie,
        watchlist::WatchlistStore,
    },
};

/// Recommends movies related to `title` through the genre graph
///
/// An unknown title is not an error; it yields no recommendations.
pub async fn get_recommendations(
    catalog: &Catalog,
    graph: &CategoryGraph,
    watchlists: Arc<WatchlistStore>,
    username: &str,
    title: &str,
) -> AppResult<Vec<Movie>> {
    let Some(reference) = find_movie(catalog, title) else {
        tracing::info!(title = %title, "Reference movie not found");
        return Ok(Vec::new());
    };

    let plan = RecommendationPlan::new(reference, catalog, graph);

    let goal = Goal::Recommend;
    let mut recommender = Recommender::new(watchlists);
    recommender.add_goal(goal);
    recommender.set_active_goal(goal);
    recommender.act(username, Some(&plan), None).await?;

    tracing::info!(
        reference = %reference.title,
        achieved = goal.is_achieved(&recommender),
        count = recommender.recommendations().len(),
        "Recommendations generated"
    );

    Ok(recommender.into_recommendations())
}

/// Adds the movie named `title` to the user's watchlist and persists it
///
/// Returns `false` without touching the watchlist if the title is unknown.
pub async fn add_to_watchlist(
    catalog: &Catalog,
    watchlists: Arc<WatchlistStore>,
    username: &str,
    title: &str,
) -> AppResult<bool> {
    update_watchlist(catalog, watchlists, username, title, Goal::UpdateAdd).await
}

/// Removes the movie named `title` from the user's watchlist and persists it
///
/// Returns `false` without touching the watchlist if the title is unknown.
pub async fn remove_from_watchlist(
    catalog: &Catalog,
    watchlists: Arc<WatchlistStore>,
    username: &str,
    title: &str,
) -> AppResult<bool> {
    update_watchlist(catalog, watchlists, username, title, Goal::UpdateRemove).await
}

async fn update_watchlist(
    catalog: &Catalog,
    watchlists: Arc<WatchlistStore>,
    username: &str,
    title: &str,
    goal: Goal,
) -> AppResult<bool> {
    let Some(movie) = find_movie(catalog, title) else {
        tracing::info!(username = %username, title = %title, "Watchlist title not found");
        return Ok(false);
    };

    let mut recommender = Recommender::new(watchlists);
    recommender.add_goal(goal);
    recommender.set_active_goal(goal);
    recommender.act(username, None, Some(movie)).await?;

    tracing::info!(
        username = %username,
        title = %movie.title,
        change = goal.desired_outcome(),
        "Watchlist updated"
    );

    Ok(true)
}

pub async fn get_watchlist(watchlists: &WatchlistStore, username: &str) -> Vec<Movie> {
    watchlists.get(username).await
}

/// Restores a user's persisted watchlist at the start of a session
///
/// Returns whether a previous record was found.
pub async fn start_session(watchlists: &WatchlistStore, username: &str) -> AppResult<bool> {
    watchlists.reload(username).await
}
