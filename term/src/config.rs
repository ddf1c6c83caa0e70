//! Layered settings: built-in defaults, then an optional TOML file, then flags.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use pairs_core::{GameConfig, TileCount};
use serde::Deserialize;

/// Everything the terminal front end needs to start a game.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub game: GameConfig,
    pub seed: Option<u64>,
    pub show_preview: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            seed: None,
            show_preview: true,
        }
    }
}

/// Overrides coming from the command line, `None` keeps the layer below.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub seed: Option<u64>,
    pub preview_ms: Option<u64>,
    pub mismatch_delay_ms: Option<u64>,
    pub mistakes: Option<TileCount>,
    pub no_preview: bool,
}

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct TomlSettings {
    seed: Option<u64>,
    preview_ms: Option<u64>,
    mismatch_delay_ms: Option<u64>,
    mistakes: Option<TileCount>,
    show_preview: Option<bool>,
}

impl Settings {
    pub fn load(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Self> {
        let mut settings = Self::default();
        if let Some(path) = path {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            settings.apply_toml(&text)
                .with_context(|| format!("parsing config {}", path.display()))?;
            log::debug!("Loaded config from {}", path.display());
        }
        settings.apply_overrides(overrides);
        settings.game.validate()?;
        Ok(settings)
    }

    fn apply_toml(&mut self, text: &str) -> anyhow::Result<()> {
        let file: TomlSettings = toml::from_str(text)?;
        self.seed = file.seed.or(self.seed);
        if let Some(ms) = file.preview_ms {
            self.game.preview = Duration::from_millis(ms);
        }
        if let Some(ms) = file.mismatch_delay_ms {
            self.game.mismatch_delay = Duration::from_millis(ms);
        }
        if let Some(mistakes) = file.mistakes {
            self.game.mistake_limit = mistakes;
        }
        if let Some(show) = file.show_preview {
            self.show_preview = show;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: &Overrides) {
        self.seed = overrides.seed.or(self.seed);
        if let Some(ms) = overrides.preview_ms {
            self.game.preview = Duration::from_millis(ms);
        }
        if let Some(ms) = overrides.mismatch_delay_ms {
            self.game.mismatch_delay = Duration::from_millis(ms);
        }
        if let Some(mistakes) = overrides.mistakes {
            self.game.mistake_limit = mistakes;
        }
        if overrides.no_preview {
            self.show_preview = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairs_core::{MISMATCH_DELAY, MISTAKE_LIMIT, PREVIEW_DURATION};

    #[test]
    fn defaults_match_core_constants() {
        let settings = Settings::load(None, &Overrides::default()).unwrap();

        assert_eq!(settings.game.preview, PREVIEW_DURATION);
        assert_eq!(settings.game.mismatch_delay, MISMATCH_DELAY);
        assert_eq!(settings.game.mistake_limit, MISTAKE_LIMIT);
        assert!(settings.show_preview);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn toml_keys_are_optional() {
        let mut settings = Settings::default();
        settings.apply_toml("mismatch_delay_ms = 250\nseed = 9\n").unwrap();

        assert_eq!(settings.game.mismatch_delay, Duration::from_millis(250));
        assert_eq!(settings.game.preview, PREVIEW_DURATION);
        assert_eq!(settings.seed, Some(9));
    }

    #[test]
    fn unknown_toml_key_is_rejected() {
        let mut settings = Settings::default();

        assert!(settings.apply_toml("grid = 6\n").is_err());
    }

    #[test]
    fn flags_win_over_file() {
        let mut settings = Settings::default();
        settings
            .apply_toml("preview_ms = 100\nmistakes = 5\nshow_preview = true\n")
            .unwrap();
        settings.apply_overrides(&Overrides {
            preview_ms: Some(50),
            no_preview: true,
            ..Default::default()
        });

        assert_eq!(settings.game.preview, Duration::from_millis(50));
        assert_eq!(settings.game.mistake_limit, 5);
        assert!(!settings.show_preview);
    }

    #[test]
    fn zero_mistakes_fails_validation() {
        let overrides = Overrides {
            mistakes: Some(0),
            ..Default::default()
        };

        assert!(Settings::load(None, &overrides).is_err());
    }
}
