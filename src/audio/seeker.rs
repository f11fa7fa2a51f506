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
use super::error::SeekError;
use super::format::Frame;

/// A finite, seekable source of stereo frames with its own read position.
pub trait StreamSeeker: Send + Sync {
    /// Copies at most `output.len()` frames starting at the current position into
    /// `output` and advances the position by the number copied.
    /// Returns the number of frames written (0 = end of stream).
    fn stream(&mut self, output: &mut [Frame]) -> usize;

    /// Total number of frames.
    fn len(&self) -> usize;

    /// Current position, between 0 and `len()`.
    fn position(&self) -> usize;

    /// Moves the position to `position`. On error the position is unchanged.
    fn seek(&mut self, position: usize) -> Result<(), SeekError>;

    /// Returns true if there are no frames at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Blanket implementation for Box<dyn StreamSeeker> so boxed seekers can be
/// handed to anything generic over S: StreamSeeker.
impl StreamSeeker for Box<dyn StreamSeeker> {
    fn stream(&mut self, output: &mut [Frame]) -> usize {
        (**self).stream(output)
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn seek(&mut self, position: usize) -> Result<(), SeekError> {
        (**self).seek(position)
    }
}
