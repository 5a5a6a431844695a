//! Handles settings for the application. Configuration is written in
//! `bahi.toml` next to the binary; every field has a default so the file is
//! optional.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
    pub database: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("bahi").required(false))
            .set_default("app.level", "info")?
            .build()?;

        settings.try_deserialize()
    }
}
