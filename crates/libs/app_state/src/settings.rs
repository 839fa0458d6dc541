use crate::{ApiSettings, DetectorSettings, LoggingSettings, RawSettings};
use serde::Deserialize;
use std::path::{PathBuf, absolute};

/// Environment variable the model download URL falls back to.
pub const MODEL_URL_ENV: &str = "MODEL_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub model: ModelSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSettings {
    pub path: PathBuf,
    pub download_url: Option<String>,
    pub detector: DetectorSettings,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        let path = absolute(&raw.model.path).unwrap_or(raw.model.path);
        let download_url = non_empty(raw.model.download_url)
            .or_else(|| non_empty(std::env::var(MODEL_URL_ENV).ok()));

        Self {
            model: ModelSettings {
                path,
                download_url,
                detector: raw.model.detector,
            },
            logging: raw.logging,
            api: raw.api,
        }
    }
}

impl ModelSettings {
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

impl DetectorSettings {
    /// Number of classes the model was trained on, when `class_names` lists them.
    #[must_use]
    pub fn num_classes(&self) -> Option<usize> {
        (!self.class_names.is_empty()).then_some(self.class_names.len())
    }

    /// Human-readable label for a class id.
    #[must_use]
    pub fn class_name(&self, class_id: usize) -> String {
        self.class_names
            .get(class_id)
            .cloned()
            .unwrap_or_else(|| format!("class_{class_id}"))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
