//! Application-level configuration loading, including the runtime content pack.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use tracing::{info, warn};

use crate::content::{ContentPack, ContentProvider, builtin_pack};

/// Default location on disk where the server looks for the JSON content pack.
const DEFAULT_CONFIG_PATH: &str = "config/content.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "BURGER_RUSH_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    content: ContentProvider,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in content pack when the file is missing or unusable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<ContentPack>(&contents) {
                Ok(pack) => match ContentProvider::new(pack) {
                    Ok(content) => {
                        info!(
                            path = %path.display(),
                            players = content.players().len(),
                            ingredients = content.ingredients().len(),
                            "loaded content pack from config"
                        );
                        Self { content }
                    }
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "content pack failed validation; falling back to defaults"
                        );
                        Self::default()
                    }
                },
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse content pack; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "content pack not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read content pack; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Build a configuration around an already validated content provider.
    pub fn with_content(content: ContentProvider) -> Self {
        Self { content }
    }

    /// The validated content pools the controller draws from.
    pub fn content(&self) -> &ContentProvider {
        &self.content
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let content =
            ContentProvider::new(builtin_pack()).expect("built-in content pack is valid");
        Self { content }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
