use oxiblast_engine::Difficulty;
use serde::{Deserialize, Serialize};

/// Player settings stored in `settings.json`.
///
/// Missing keys take their default values, so older or hand-written files keep
/// loading.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let settings: GameSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.difficulty, Difficulty::Normal);

        let settings: GameSettings = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
    }
}
