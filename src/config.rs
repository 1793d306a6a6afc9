use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::animation::AnimationCatalog;

/// Flag namespace the group label is stored under
pub const DEFAULT_FLAG_NAMESPACE: &str = "light-groups-manager";
/// Flag key of the group label
pub const DEFAULT_FLAG_KEY: &str = "group";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid settings: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    #[validate(length(min = 1))]
    pub flag_namespace: String,
    #[validate(length(min = 1))]
    pub flag_key: String,
    /// Whether the operator may edit groups
    pub privileged: bool,
    /// JSON language file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<PathBuf>,
    #[validate(custom(function = crate::animation::validate_catalog))]
    pub animations: AnimationCatalog,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            flag_namespace: DEFAULT_FLAG_NAMESPACE.to_owned(),
            flag_key: DEFAULT_FLAG_KEY.to_owned(),
            privileged: true,
            language: None,
            animations: Default::default(),
        }
    }
}

impl Settings {
    /// Default location of the settings file, in the user's configuration directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("light-groups");
            path.push("settings.toml");
            path
        })
    }

    pub async fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let full = tokio::fs::read_to_string(path).await?;
        let settings = Self::from_toml(&full)?;

        debug!(path = %path.display(), "loaded settings");

        Ok(settings)
    }

    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn label_flag(&self) -> (&str, &str) {
        (&self.flag_namespace, &self.flag_key)
    }
}
