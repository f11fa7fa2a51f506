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

const DEFAULT_BUFFER_SIZE: usize = 1024;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Mixer {
    /// Frames requested per stream call when rendering (default: 1024)
    buffer_size: Option<usize>,
}

impl Mixer {
    pub fn new(buffer_size: Option<usize>) -> Mixer {
        Mixer { buffer_size }
    }

    /// Returns the render buffer size in frames (default: 1024)
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE)
    }

    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_size() == 0 {
            return Err(ConfigError::Invalid(
                "buffer_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
