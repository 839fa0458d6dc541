use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::path::Path;
use tracing::debug;

pub const SETTINGS_FILE: &str = "config/settings.yaml";

/// Load the app settings from `config/settings.yaml` + `APP__` environment variables.
pub fn load_app_settings() -> Result<AppSettings> {
    // Need to load from dotenv first so `.env` values can override the yaml file.
    dotenv::from_path(".env").ok();
    load_app_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_app_settings_from(config_path: &Path) -> Result<AppSettings> {
    let config_path = config_path.canonicalize()?;
    debug!("Loading settings from {}", config_path.display());

    let builder = config::Config::builder()
        .add_source(config::File::from(config_path))
        .add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    Ok(raw_settings.into())
}
