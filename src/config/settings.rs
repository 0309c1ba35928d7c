//! Configuration settings for lyttekort.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub gpodder: GpodderSettings,
    pub transcription: TranscriptionSettings,
    pub cards: CardSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data (audio, transcripts, results).
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.lyttekort".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// gpodder sync server settings.
///
/// The account password is never stored in the config file; it is read from
/// the `GPODDER_PASSWORD` environment variable (a `.env` file works too).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GpodderSettings {
    /// Base URL of the gpodder-compatible server (e.g. "https://gpodder.net").
    pub base_url: String,
    /// Account username.
    pub username: String,
    /// Restrict episode actions to a specific device id.
    pub device: Option<String>,
    /// Fixed UTC offset (hours) applied when formatting listened-at dates.
    pub utc_offset_hours: i32,
}

impl Default for GpodderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://gpodder.net".to_string(),
            username: String::new(),
            device: None,
            utc_offset_hours: 0,
        }
    }
}

impl GpodderSettings {
    /// Read the account password from the environment.
    pub fn password(&self) -> crate::error::Result<String> {
        match std::env::var("GPODDER_PASSWORD") {
            Ok(p) if !p.is_empty() => Ok(p),
            _ => Err(crate::error::LyttekortError::Config(
                "GPODDER_PASSWORD not set. Add it to your environment or .env file.".to_string(),
            )),
        }
    }
}

/// Whisper model size.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WhisperModel {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl std::str::FromStr for WhisperModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(WhisperModel::Tiny),
            "base" => Ok(WhisperModel::Base),
            "small" => Ok(WhisperModel::Small),
            "medium" => Ok(WhisperModel::Medium),
            "large" => Ok(WhisperModel::Large),
            _ => Err(format!("Unknown whisper model size: {}", s)),
        }
    }
}

impl std::fmt::Display for WhisperModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WhisperModel::Tiny => "tiny",
            WhisperModel::Base => "base",
            WhisperModel::Small => "small",
            WhisperModel::Medium => "medium",
            WhisperModel::Large => "large",
        };
        write!(f, "{}", name)
    }
}

impl WhisperModel {
    /// File name of the ggml model weights for this size.
    pub fn file_name(&self) -> String {
        format!("ggml-{}.bin", self)
    }
}

/// Transcription engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Name or path of the whisper.cpp CLI binary.
    pub binary: String,
    /// Directory holding ggml model files.
    pub model_dir: String,
    /// Model size to load.
    pub model: WhisperModel,
    /// Language hint passed to the engine (None = auto-detect).
    pub language: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            binary: "whisper-cli".to_string(),
            model_dir: "~/.lyttekort/models".to_string(),
            model: WhisperModel::Small,
            language: None,
        }
    }
}

impl TranscriptionSettings {
    /// Full path to the configured model file.
    pub fn model_path(&self) -> PathBuf {
        Settings::expand_path(&self.model_dir).join(self.model.file_name())
    }
}

/// Flashcard generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSettings {
    /// Chat model used for summarization.
    pub model: String,
    /// Upper bound on key points kept per episode.
    pub max_key_points: usize,
    /// Upper bound on supporting quotes kept per key point.
    pub max_quotes_per_point: usize,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_key_points: 10,
            max_quotes_per_point: 3,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::LyttekortError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lyttekort")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Directory where downloaded episode audio is stored.
    pub fn episodes_dir(&self) -> PathBuf {
        self.data_dir().join("episodes")
    }

    /// Directory where transcripts are stored.
    pub fn transcripts_dir(&self) -> PathBuf {
        self.data_dir().join("transcripts")
    }

    /// Directory where card results and the CSV export are stored.
    pub fn results_dir(&self) -> PathBuf {
        self.data_dir().join("results")
    }

    /// Path of the episode catalog file.
    pub fn episodes_json_path(&self) -> PathBuf {
        self.data_dir().join("episodes.json")
    }

    /// Path of the per-episode card results store.
    pub fn card_results_path(&self) -> PathBuf {
        self.results_dir().join("card_results.json")
    }

    /// Path of the Anki CSV export.
    pub fn csv_path(&self) -> PathBuf {
        self.results_dir().join("anki-flashcards.csv")
    }

    /// Path of the persisted sync timestamp.
    pub fn timestamp_path(&self) -> PathBuf {
        self.results_dir().join("last_timestamp.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.cards.max_key_points, 10);
        assert_eq!(settings.cards.max_quotes_per_point, 3);
        assert_eq!(settings.transcription.model, WhisperModel::Small);
        assert_eq!(settings.gpodder.utc_offset_hours, 0);
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let path = PathBuf::from("/nonexistent/lyttekort-config.toml");
        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.cards.model, "gpt-4o-mini");
    }

    #[test]
    fn test_model_file_name() {
        assert_eq!(WhisperModel::Small.file_name(), "ggml-small.bin");
        assert_eq!("medium".parse::<WhisperModel>(), Ok(WhisperModel::Medium));
        assert!("enormous".parse::<WhisperModel>().is_err());
    }

    #[test]
    fn test_partial_config_parses() {
        let toml_str = r#"
            [gpodder]
            base_url = "https://sync.example.org"
            username = "me"

            [transcription]
            model = "medium"
        "#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.gpodder.base_url, "https://sync.example.org");
        assert_eq!(settings.transcription.model, WhisperModel::Medium);
        // Untouched sections keep defaults
        assert_eq!(settings.cards.max_key_points, 10);
    }
}
