use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, NaiveDate, Utc};
use oxiblast_engine::{ChallengeGoal, ChallengeProgress, GameSession, ScoreSummary};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    schema::{
        record::{DailyChallenge, ScoreEntry},
        settings::GameSettings,
    },
    util,
};

pub const DEFAULT_DATA_DIR: &str = "./data";

/// Number of entries kept in the score history.
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// Directory holding the score history, the challenge book and the settings.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scores_path(&self) -> PathBuf {
        self.root.join("scores.json")
    }

    pub fn challenges_path(&self) -> PathBuf {
        self.root.join("challenges.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Loads the settings, falling back to defaults when the file is missing or broken.
    pub fn load_settings(&self) -> GameSettings {
        let path = self.settings_path();
        match util::read_optional_json_file("settings", &path) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring settings: {err:#}");
                GameSettings::default()
            }
        }
    }

    pub fn load_history(&self) -> anyhow::Result<ScoreHistory> {
        util::read_optional_json_file("score history", self.scores_path())
            .map(Option::unwrap_or_default)
    }

    pub fn save_history(&self, history: &ScoreHistory) -> anyhow::Result<()> {
        util::write_json_file("score history", self.scores_path(), history)
    }

    pub fn load_challenges(&self) -> anyhow::Result<ChallengeBook> {
        util::read_optional_json_file("challenge", self.challenges_path())
            .map(Option::unwrap_or_default)
    }

    pub fn save_challenges(&self, book: &ChallengeBook) -> anyhow::Result<()> {
        util::write_json_file("challenge", self.challenges_path(), book)
    }

    /// Stores a finished game and folds it into today's challenge.
    ///
    /// The history entry holds the score as the game ended; a challenge bonus is
    /// awarded to the session afterwards.
    pub fn record_game(&self, session: &mut GameSession) -> anyhow::Result<RecordedGame> {
        let now = Utc::now();
        let summary = session.summary();

        let mut history = self.load_history()?;
        let rank = history.record(ScoreEntry {
            recorded_at: now,
            difficulty: session.difficulty(),
            seed: session.seed(),
            summary,
        });
        self.save_history(&history)?;

        let mut book = self.load_challenges()?;
        let today = Local::now().date_naive();
        let bonus = book.record(today, &summary, now, &mut rand::rng());
        let challenge = book.today(today, &mut rand::rng()).clone();
        self.save_challenges(&book)?;

        if let Some(bonus) = bonus {
            session.award_bonus(bonus);
        }
        Ok(RecordedGame {
            rank,
            challenge,
            bonus,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// What [`DataDir::record_game`] stored.
#[derive(Debug, Clone)]
pub struct RecordedGame {
    /// Zero-based position in the history, `None` when the score did not make the cut
    pub rank: Option<usize>,
    pub challenge: DailyChallenge,
    pub bonus: Option<usize>,
}

/// Best scores, highest first.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreHistory {
    entries: Vec<ScoreEntry>,
}

impl ScoreHistory {
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Inserts an entry behind every entry with an equal or higher score.
    ///
    /// Only the best [`MAX_HISTORY_ENTRIES`] entries are kept. Returns the position of
    /// the new entry, or `None` if it fell off the end.
    pub fn record(&mut self, entry: ScoreEntry) -> Option<usize> {
        let score = entry.summary.score;
        let rank = self
            .entries
            .partition_point(|e| e.summary.score >= score);
        self.entries.insert(rank, entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        (rank < MAX_HISTORY_ENTRIES).then_some(rank)
    }
}

/// Daily challenges keyed by local calendar date.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChallengeBook {
    days: BTreeMap<NaiveDate, DailyChallenge>,
}

impl ChallengeBook {
    pub fn get(&self, date: NaiveDate) -> Option<&DailyChallenge> {
        self.days.get(&date)
    }

    /// Returns the challenge of `date`, picking a random goal the first time.
    pub fn today<R>(&mut self, date: NaiveDate, rng: &mut R) -> &mut DailyChallenge
    where
        R: Rng + ?Sized,
    {
        self.days.entry(date).or_insert_with(|| {
            let goal = ChallengeGoal::random(rng);
            tracing::info!(%date, %goal, "new daily challenge");
            DailyChallenge {
                progress: ChallengeProgress::new(goal),
                completed_at: None,
            }
        })
    }

    /// Records a finished game against the challenge of `date`; returns the bonus on
    /// completion.
    pub fn record<R>(
        &mut self,
        date: NaiveDate,
        summary: &ScoreSummary,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        let challenge = self.today(date, rng);
        let bonus = challenge.progress.record(summary)?;
        challenge.completed_at = Some(now);
        Some(bonus)
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use oxiblast_engine::{Difficulty, GoalKind, ShapeSeed};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn summary(score: usize, lines: usize) -> ScoreSummary {
        ScoreSummary {
            score,
            lines,
            level: lines / 10 + 1,
        }
    }

    fn entry(score: usize) -> ScoreEntry {
        ScoreEntry {
            recorded_at: DateTime::UNIX_EPOCH,
            difficulty: Difficulty::Normal,
            seed: ShapeSeed::from_bytes([0; 16]),
            summary: summary(score, 0),
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, day).unwrap()
    }

    #[test]
    fn test_history_sorted_descending() {
        let mut history = ScoreHistory::default();
        assert_eq!(history.record(entry(300)), Some(0));
        assert_eq!(history.record(entry(900)), Some(0));
        assert_eq!(history.record(entry(300)), Some(2));
        assert_eq!(history.record(entry(500)), Some(1));
        let scores = history
            .entries()
            .iter()
            .map(|e| e.summary.score)
            .collect::<Vec<_>>();
        assert_eq!(scores, vec![900, 500, 300, 300]);
    }

    #[test]
    fn test_history_keeps_best_entries() {
        let mut history = ScoreHistory::default();
        for score in 1..=MAX_HISTORY_ENTRIES {
            history.record(entry(score * 10));
        }
        assert_eq!(history.entries().len(), MAX_HISTORY_ENTRIES);

        // A low score does not push out a better one.
        assert_eq!(history.record(entry(5)), None);
        assert_eq!(history.entries().len(), MAX_HISTORY_ENTRIES);
        assert_eq!(history.entries().last().unwrap().summary.score, 10);

        assert_eq!(history.record(entry(15)), Some(MAX_HISTORY_ENTRIES - 1));
        assert_eq!(history.entries().last().unwrap().summary.score, 15);
        assert_eq!(history.entries()[0].summary.score, 1000);
    }

    #[test]
    fn test_challenge_created_once_per_day() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut book = ChallengeBook::default();
        let goal = book.today(date(19), &mut rng).progress.goal;
        for _ in 0..20 {
            assert_eq!(book.today(date(19), &mut rng).progress.goal, goal);
        }
        assert!(book.get(date(20)).is_none());
    }

    #[test]
    fn test_challenge_completion_sets_timestamp() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut book = ChallengeBook::default();
        book.today(date(19), &mut rng).progress =
            ChallengeProgress::new(ChallengeGoal::new(GoalKind::Lines, 30));

        let now = Utc::now();
        assert_eq!(book.record(date(19), &summary(100, 12), now, &mut rng), None);
        assert_eq!(book.get(date(19)).unwrap().completed_at, None);
        assert_eq!(
            book.record(date(19), &summary(100, 31), now, &mut rng),
            Some(300)
        );
        assert_eq!(book.get(date(19)).unwrap().completed_at, Some(now));
        assert_eq!(book.record(date(19), &summary(100, 60), now, &mut rng), None);
    }

    #[test]
    fn test_challenge_book_json_uses_dates() {
        let mut book = ChallengeBook::default();
        book.today(date(1), &mut Pcg32::seed_from_u64(0)).progress =
            ChallengeProgress::new(ChallengeGoal::new(GoalKind::Score, 5000));
        let json = serde_json::to_string(&book).unwrap();
        assert_eq!(
            json,
            r#"{"2026-10-01":{"goal":{"kind":"score","target":5000},"progress":0,"completed":false,"completed_at":null}}"#
        );
        let parsed: ChallengeBook = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, book);
    }

    fn temp_data_dir(name: &str) -> DataDir {
        DataDir::new(env::temp_dir().join(format!("oxiblast-record-{name}-{}", std::process::id())))
    }

    #[test]
    fn test_record_game_persists_history_and_challenge() {
        let dir = temp_data_dir("persist");
        let mut session = GameSession::with_seed(Difficulty::Easy, ShapeSeed::from_bytes([3; 16]));

        // A fresh book draws a goal that an empty game cannot meet.
        let recorded = dir.record_game(&mut session).unwrap();
        assert_eq!(recorded.rank, Some(0));
        assert!(!recorded.challenge.progress.completed);
        assert_eq!(recorded.bonus, None);
        assert_eq!(session.stats().score(), 0);

        let history = dir.load_history().unwrap();
        assert_eq!(history.entries().len(), 1);
        assert_eq!(history.entries()[0].seed, session.seed());
        let book = dir.load_challenges().unwrap();
        assert_eq!(
            book.get(Local::now().date_naive()),
            Some(&recorded.challenge)
        );

        fs::remove_dir_all(dir.root()).unwrap();
    }

    #[test]
    fn test_record_game_awards_bonus_after_saving_history() {
        let dir = temp_data_dir("bonus");
        let today = Local::now().date_naive();
        let mut book = ChallengeBook::default();
        book.today(today, &mut Pcg32::seed_from_u64(0)).progress =
            ChallengeProgress::new(ChallengeGoal::new(GoalKind::Level, 1));
        dir.save_challenges(&book).unwrap();

        let mut session = GameSession::with_seed(Difficulty::Normal, ShapeSeed::from_bytes([4; 16]));
        let hint = session.hint().unwrap();
        session.attempt_place(0, hint.x, hint.y).unwrap();
        let score = session.stats().score();
        assert!(score > 0);

        let recorded = dir.record_game(&mut session).unwrap();
        assert_eq!(recorded.bonus, Some(10));
        assert!(recorded.challenge.progress.completed);
        assert_eq!(session.stats().score(), score + 10);
        assert_eq!(session.stats().bonus_points(), 10);

        let history = dir.load_history().unwrap();
        assert_eq!(history.entries()[0].summary.score, score);
        let saved = dir.load_challenges().unwrap();
        let challenge = saved.get(today).unwrap();
        assert!(challenge.progress.completed);
        assert!(challenge.completed_at.is_some());

        // Completed challenges pay out once.
        let again = dir.record_game(&mut session).unwrap();
        assert_eq!(again.bonus, None);
        assert_eq!(session.stats().score(), score + 10);

        fs::remove_dir_all(dir.root()).unwrap();
    }
}
