// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
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
use serde::Deserialize;

use super::error::ConfigError;
use crate::audio::resample::{ResamplerKind, MAX_QUALITY};

const DEFAULT_RESAMPLE_QUALITY: usize = 4;

/// Buffer cache configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Cache {
    /// Interpolation used when a file's rate differs from the cache rate (default: polynomial)
    resampler: Option<ResamplerKind>,

    /// Half-width of the polynomial interpolation window (default: 4, 1 is linear)
    resample_quality: Option<usize>,

    /// Whether release_all also forgets the adopted cache format (default: false)
    reset_format_on_release_all: Option<bool>,
}

impl Cache {
    /// New will create a new cache configuration with all defaults.
    pub fn new() -> Cache {
        Cache::default()
    }

    pub fn with_resampler(mut self, resampler: ResamplerKind) -> Cache {
        self.resampler = Some(resampler);
        self
    }

    pub fn with_resample_quality(mut self, quality: usize) -> Cache {
        self.resample_quality = Some(quality);
        self
    }

    pub fn with_reset_format_on_release_all(mut self, reset: bool) -> Cache {
        self.reset_format_on_release_all = Some(reset);
        self
    }

    /// Returns the resampler (default: polynomial).
    pub fn resampler(&self) -> ResamplerKind {
        self.resampler.unwrap_or_default()
    }

    /// Returns the resample quality (default: 4).
    pub fn resample_quality(&self) -> usize {
        self.resample_quality.unwrap_or(DEFAULT_RESAMPLE_QUALITY)
    }

    /// Returns whether release_all resets the cache format (default: false).
    pub fn reset_format_on_release_all(&self) -> bool {
        self.reset_format_on_release_all.unwrap_or(false)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        let quality = self.resample_quality();
        if quality == 0 || quality > MAX_QUALITY {
            return Err(ConfigError::Invalid(format!(
                "resample_quality must be between 1 and {}, got {}",
                MAX_QUALITY, quality
            )));
        }
        Ok(())
    }
}
