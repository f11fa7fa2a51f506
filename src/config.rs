// Copyright (C) 2025 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::path::Path;

use config::{Config, File, FileFormat};
use serde::Deserialize;

mod cache;
mod error;
mod mixer;

pub use cache::Cache;
pub use error::ConfigError;
pub use mixer::Mixer;

/// Top level settings file.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    /// The buffer cache configuration.
    #[serde(default)]
    cache: Cache,
    /// The mixer configuration.
    #[serde(default)]
    mixer: Mixer,
}

impl Settings {
    /// Parse settings from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize::<Settings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        self.mixer.validate()
    }
}
