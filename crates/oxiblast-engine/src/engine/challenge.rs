//! Daily challenge goals and progress tracking.
//!
//! A challenge asks the player to reach a target in one of the three summary metrics.
//! Progress keeps the best value seen so far; the first time it reaches the target
//! the challenge completes and pays out a bonus.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::event::ScoreSummary;

/// Which part of a [`ScoreSummary`] a challenge measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    Lines,
    Score,
    Level,
}

impl GoalKind {
    #[must_use]
    pub const fn metric(self, summary: &ScoreSummary) -> usize {
        match self {
            GoalKind::Lines => summary.lines,
            GoalKind::Score => summary.score,
            GoalKind::Level => summary.level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeGoal {
    pub kind: GoalKind,
    pub target: usize,
}

impl ChallengeGoal {
    /// Every goal a daily challenge can pick from.
    pub const ALL: [Self; 7] = [
        Self::new(GoalKind::Lines, 30),
        Self::new(GoalKind::Lines, 50),
        Self::new(GoalKind::Lines, 75),
        Self::new(GoalKind::Score, 5000),
        Self::new(GoalKind::Score, 10000),
        Self::new(GoalKind::Level, 3),
        Self::new(GoalKind::Level, 5),
    ];

    #[must_use]
    pub const fn new(kind: GoalKind, target: usize) -> Self {
        Self { kind, target }
    }

    /// Picks one of [`Self::ALL`] uniformly.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Points awarded when the goal is reached.
    #[must_use]
    pub const fn bonus(&self) -> usize {
        self.target * 10
    }
}

impl fmt::Display for ChallengeGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GoalKind::Lines => write!(f, "Clear {} lines", self.target),
            GoalKind::Score => write!(f, "Score {} points", self.target),
            GoalKind::Level => write!(f, "Reach level {}", self.target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeProgress {
    pub goal: ChallengeGoal,
    pub progress: usize,
    pub completed: bool,
}

impl ChallengeProgress {
    #[must_use]
    pub const fn new(goal: ChallengeGoal) -> Self {
        Self {
            goal,
            progress: 0,
            completed: false,
        }
    }

    /// Folds a finished game into the challenge.
    ///
    /// Returns the bonus when this record completes the challenge; completed
    /// challenges ignore further records.
    pub fn record(&mut self, summary: &ScoreSummary) -> Option<usize> {
        if self.completed {
            return None;
        }
        self.progress = self.progress.max(self.goal.kind.metric(summary));
        if self.progress < self.goal.target {
            return None;
        }
        self.completed = true;
        tracing::info!(goal = %self.goal, bonus = self.goal.bonus(), "daily challenge completed");
        Some(self.goal.bonus())
    }
}
