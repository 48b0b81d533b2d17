use std::{
    io::{self, Write},
    path::PathBuf,
};

use chrono::Local;

use crate::{
    record::{DEFAULT_DATA_DIR, DataDir, ScoreHistory},
    schema::record::DailyChallenge,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct HistoryArg {
    /// Number of entries to show
    #[clap(long, default_value_t = 10)]
    limit: usize,
    /// Directory holding scores, challenges and settings
    #[clap(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
}

pub(crate) fn run(arg: &HistoryArg) -> anyhow::Result<()> {
    let HistoryArg { limit, data_dir } = arg;

    let data_dir = DataDir::new(data_dir);
    let history = data_dir.load_history()?;
    let book = data_dir.load_challenges()?;

    let mut out = io::stdout().lock();
    if history.entries().is_empty() {
        writeln!(out, "No games recorded in {}", data_dir.root().display())?;
    } else {
        write_history(&mut out, &history, *limit)?;
    }
    writeln!(out)?;
    write_challenge(&mut out, book.get(Local::now().date_naive()))?;
    Ok(())
}

fn write_history<W>(out: &mut W, history: &ScoreHistory, limit: usize) -> io::Result<()>
where
    W: Write,
{
    writeln!(
        out,
        "{:>4}  {:>8}  {:>6}  {:>5}  {:<10}  date",
        "rank", "score", "lines", "level", "difficulty"
    )?;
    for (rank, entry) in history.entries().iter().take(limit).enumerate() {
        let summary = &entry.summary;
        writeln!(
            out,
            "{:>4}  {:>8}  {:>6}  {:>5}  {:<10}  {}",
            rank + 1,
            summary.score,
            summary.lines,
            summary.level,
            entry.difficulty,
            entry.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        )?;
    }
    Ok(())
}

fn write_challenge<W>(out: &mut W, challenge: Option<&DailyChallenge>) -> io::Result<()>
where
    W: Write,
{
    let Some(challenge) = challenge else {
        return writeln!(out, "Today's challenge: not drawn yet (finish a game to get one)");
    };
    let progress = &challenge.progress;
    let status = if progress.completed {
        "completed".to_owned()
    } else {
        format!("{}/{}", progress.progress, progress.goal.target)
    };
    writeln!(
        out,
        "Today's challenge: {} [{status}], bonus {} points",
        progress.goal,
        progress.goal.bonus()
    )
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use oxiblast_engine::{ChallengeGoal, ChallengeProgress, Difficulty, GoalKind, ScoreSummary, ShapeSeed};

    use crate::schema::record::ScoreEntry;

    use super::*;

    #[test]
    fn test_history_table_respects_limit() {
        let mut history = ScoreHistory::default();
        for score in [100, 700, 300] {
            history.record(ScoreEntry {
                recorded_at: DateTime::UNIX_EPOCH,
                difficulty: Difficulty::Hard,
                seed: ShapeSeed::from_bytes([0; 16]),
                summary: ScoreSummary {
                    score,
                    lines: score / 100,
                    level: 1,
                },
            });
        }
        let mut out = Vec::new();
        write_history(&mut out, &history, 2).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("   1       700       7      1  hard"));
        assert!(lines[2].starts_with("   2       300       3      1  hard"));
    }

    #[test]
    fn test_challenge_line() {
        let mut challenge = DailyChallenge {
            progress: ChallengeProgress::new(ChallengeGoal::new(GoalKind::Lines, 50)),
            completed_at: None,
        };
        challenge.progress.progress = 12;

        let mut out = Vec::new();
        write_challenge(&mut out, Some(&challenge)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Today's challenge: Clear 50 lines [12/50], bonus 500 points\n"
        );

        let mut out = Vec::new();
        write_challenge(&mut out, None).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("not drawn yet"));
    }
}
