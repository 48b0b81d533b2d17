use chrono::{DateTime, Utc};
use oxiblast_engine::{ChallengeProgress, Difficulty, ScoreSummary, ShapeSeed};
use serde::{Deserialize, Serialize};

/// One finished game in the score history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Timestamp when the game ended (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    /// Seed of the session, so the deal sequence can be replayed
    pub seed: ShapeSeed,
    /// Final score before any challenge bonus
    pub summary: ScoreSummary,
}

/// The challenge of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    #[serde(flatten)]
    pub progress: ChallengeProgress,
    pub completed_at: Option<DateTime<Utc>>,
}
