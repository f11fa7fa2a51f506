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

use std::{fmt, time::Duration};

/// A single stereo frame: left and right amplitude.
pub type Frame = [f32; 2];

/// Number of channels every buffer is normalized to.
pub const STEREO: u16 = 2;

/// Silence.
pub const SILENCE: Frame = [0.0, 0.0];

/// The sample format shared by every buffer in a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Channel count. Always 2 once normalized.
    pub channels: u16,
}

impl Format {
    /// Creates a stereo format at the given sample rate.
    pub fn stereo(sample_rate: u32) -> Self {
        Format {
            sample_rate,
            channels: STEREO,
        }
    }

    /// Returns the playback duration of the given number of frames.
    pub fn duration(&self, frames: usize) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }

    /// Returns the number of frames that cover the given duration, rounded down.
    pub fn frames_for(&self, duration: Duration) -> usize {
        (duration.as_secs_f64() * self.sample_rate as f64).floor() as usize
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz, {}ch", self.sample_rate, self.channels)
    }
}
