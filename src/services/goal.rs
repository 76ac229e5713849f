use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::Movie,
    services::{
        recommendation_plan::RecommendationPlan,
        watchlist::{WatchlistEdit, WatchlistStore},
    },
};

/// What the recommender is asked to achieve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goal {
    /// Collect recommendations from a plan
    Recommend,
    /// Add a movie to the acting user's watchlist
    UpdateAdd,
    /// Remove a movie from the acting user's watchlist
    UpdateRemove,
}

impl Goal {
    pub fn name(&self) -> &'static str {
        match self {
            Goal::Recommend => "recommend",
            Goal::UpdateAdd | Goal::UpdateRemove => "update",
        }
    }

    pub fn desired_outcome(&self) -> &'static str {
        match self {
            Goal::Recommend => "has recommendations",
            Goal::UpdateAdd => "add",
            Goal::UpdateRemove => "remove",
        }
    }

    /// Only recommendation goals can be achieved; watchlist goals never report
    /// completion.
    pub fn is_achieved(&self, recommender: &Recommender) -> bool {
        match self {
            Goal::Recommend => recommender.has_recommendations(),
            Goal::UpdateAdd | Goal::UpdateRemove => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    /// No goal has been activated
    Absent,
    /// A goal is active and has not been acted on yet
    Active,
    /// The active goal has been acted on at least once
    Discharged,
}

/// Executes the action tied to its active goal
///
/// The active goal is never cleared by [`Recommender::act`]; calling it again
/// re-applies the same action.
pub struct Recommender {
    watchlists: Arc<WatchlistStore>,
    recommendations: Vec<Movie>,
    recommended_keys: HashSet<String>,
    goals: Vec<Goal>,
    active: Option<Goal>,
    status: GoalStatus,
}

impl Recommender {
    pub fn new(watchlists: Arc<WatchlistStore>) -> Self {
        Self {
            watchlists,
            recommendations: Vec::new(),
            recommended_keys: HashSet::new(),
            goals: Vec::new(),
            active: None,
            status: GoalStatus::Absent,
        }
    }

    /// Appends a goal to the backlog; duplicates are kept
    pub fn add_goal(&mut self, goal: Goal) {
        self.goals.push(goal);
    }

    /// Removes the first backlog entry equal to `goal`
    ///
    /// Returns `false` if the backlog held no such goal.
    pub fn remove_goal(&mut self, goal: Goal) -> bool {
        match self.goals.iter().position(|g| *g == goal) {
            Some(pos) => {
                self.goals.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn set_active_goal(&mut self, goal: Goal) {
        self.active = Some(goal);
        self.status = GoalStatus::Active;
    }

    pub fn active_goal(&self) -> Option<Goal> {
        self.active
    }

    pub fn status(&self) -> GoalStatus {
        self.status
    }

    pub fn has_recommendations(&self) -> bool {
        !self.recommendations.is_empty()
    }

    /// Recommendations accumulated across every `act` so far
    pub fn recommendations(&self) -> &[Movie] {
        &self.recommendations
    }

    pub fn into_recommendations(self) -> Vec<Movie> {
        self.recommendations
    }

    /// Applies the active goal on behalf of `username`
    ///
    /// `Recommend` merges the plan's movies (skipping titles already held) and
    /// ignores `movie`. The update goals apply `movie` to the user's watchlist
    /// when one is given and always persist the watchlist afterwards.
    pub async fn act(
        &mut self,
        username: &str,
        plan: Option<&RecommendationPlan<'_>>,
        movie: Option<&Movie>,
    ) -> AppResult<()> {
        let goal = self.active.ok_or(AppError::NoActiveGoal)?;

        match goal {
            Goal::Recommend => {
                if let Some(plan) = plan {
                    self.merge_recommendations(plan);
                }
            }
            Goal::UpdateAdd => {
                let edit = movie.cloned().map(WatchlistEdit::Add);
                self.watchlists.apply(username, edit).await?;
            }
            Goal::UpdateRemove => {
                let edit = movie.cloned().map(WatchlistEdit::Remove);
                self.watchlists.apply(username, edit).await?;
            }
        }

        self.status = GoalStatus::Discharged;
        Ok(())
    }

    fn merge_recommendations(&mut self, plan: &RecommendationPlan<'_>) {
        for movie in plan.recommendations() {
            if self.recommended_keys.insert(movie.key()) {
                self.recommendations.push((*movie).clone());
            }
        }
    }
}
