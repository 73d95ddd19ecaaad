use std::path::Path;

use pwsmith_select::{Category, DEFAULT_THRESHOLD, Probability};
use serde::{Deserialize, Serialize};

use super::atomic::write_bytes_atomic;
use super::{WorkspaceError, WorkspacePaths, WorkspaceResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Write category streams, selections and diagnostics to the workdir.
    pub persist_artifacts: bool,
    pub thresholds: ThresholdSettings,
    pub forecast: ForecastSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            persist_artifacts: true,
            thresholds: ThresholdSettings::default(),
            forecast: ForecastSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    pub default: Probability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condensed: Option<Probability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letters: Option<Probability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digits: Option<Probability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specials: Option<Probability>,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            default: DEFAULT_THRESHOLD,
            condensed: None,
            letters: None,
            digits: None,
            specials: None,
        }
    }
}

impl ThresholdSettings {
    fn category(&self, category: Category) -> Option<Probability> {
        match category {
            Category::Condensed => self.condensed,
            Category::Letters => self.letters,
            Category::Digits => self.digits,
            Category::Specials => self.specials,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub bytes_per_record: u64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            bytes_per_record: 15,
        }
    }
}

/// Thresholds given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ThresholdOverrides {
    pub default: Option<Probability>,
    pub condensed: Option<Probability>,
    pub letters: Option<Probability>,
    pub digits: Option<Probability>,
    pub specials: Option<Probability>,
}

impl ThresholdOverrides {
    fn category(&self, category: Category) -> Option<Probability> {
        match category {
            Category::Condensed => self.condensed,
            Category::Letters => self.letters,
            Category::Digits => self.digits,
            Category::Specials => self.specials,
        }
    }
}

/// Effective threshold of every category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Thresholds {
    pub condensed: Probability,
    pub letters: Probability,
    pub digits: Probability,
    pub specials: Probability,
}

impl Thresholds {
    /// Per-category flag, then the default flag, then the per-category
    /// setting, then the default setting.
    pub fn resolve(settings: &ThresholdSettings, overrides: &ThresholdOverrides) -> Self {
        let pick = |category: Category| {
            overrides
                .category(category)
                .or(overrides.default)
                .or(settings.category(category))
                .unwrap_or(settings.default)
        };
        Self {
            condensed: pick(Category::Condensed),
            letters: pick(Category::Letters),
            digits: pick(Category::Digits),
            specials: pick(Category::Specials),
        }
    }

    pub fn get(&self, category: Category) -> Probability {
        match category {
            Category::Condensed => self.condensed,
            Category::Letters => self.letters,
            Category::Digits => self.digits,
            Category::Specials => self.specials,
        }
    }

    pub fn set(&mut self, category: Category, threshold: Probability) {
        match category {
            Category::Condensed => self.condensed = threshold,
            Category::Letters => self.letters = threshold,
            Category::Digits => self.digits = threshold,
            Category::Specials => self.specials = threshold,
        }
    }
}

pub fn load_settings(path: &Path) -> WorkspaceResult<Settings> {
    if !path.exists() {
        return Err(WorkspaceError::MissingArtifact(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<Settings> {
    let path = paths.settings_path();
    if path.exists() {
        return load_settings(&path);
    }

    let settings = Settings::default();
    save_settings(&path, &settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &Settings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(path, encoded.as_bytes())
}
