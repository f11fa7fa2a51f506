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

//! Immutable decoded buffers and the read cursors handed out over them.

use std::sync::Arc;
use std::time::Duration;

use super::error::SeekError;
use super::format::{Format, Frame};
use super::seeker::StreamSeeker;

/// A fully decoded, format-normalized track.
/// The frames are stored in an Arc so seekers can share them without copying.
#[derive(Clone)]
pub struct DecodedBuffer {
    key: String,
    frames: Arc<[Frame]>,
    format: Format,
}

impl DecodedBuffer {
    /// Creates a new decoded buffer.
    pub fn new(key: &str, frames: Vec<Frame>, format: Format) -> Self {
        DecodedBuffer {
            key: key.to_string(),
            frames: frames.into(),
            format,
        }
    }

    /// The key this buffer was loaded from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of frames in the buffer.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Playback duration of the buffer.
    pub fn duration(&self) -> Duration {
        self.format.duration(self.frames.len())
    }

    /// Returns the memory size of the frame data in bytes.
    pub fn memory_size(&self) -> usize {
        std::mem::size_of_val(&*self.frames)
    }

    /// Returns a new seeker positioned at the start, spanning the whole buffer.
    pub fn seeker(&self) -> BufferSeeker {
        BufferSeeker {
            frames: Arc::clone(&self.frames),
            position: 0,
        }
    }
}

impl std::fmt::Debug for DecodedBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedBuffer")
            .field("key", &self.key)
            .field("frames", &self.frames.len())
            .field("format", &self.format)
            .finish()
    }
}

/// An independent read cursor over a decoded buffer.
/// Holding a seeker keeps the underlying frames alive even after the
/// buffer has been released from its cache.
#[derive(Clone)]
pub struct BufferSeeker {
    frames: Arc<[Frame]>,
    position: usize,
}

impl StreamSeeker for BufferSeeker {
    fn stream(&mut self, output: &mut [Frame]) -> usize {
        let remaining = &self.frames[self.position..];
        let to_copy = remaining.len().min(output.len());
        output[..to_copy].copy_from_slice(&remaining[..to_copy]);
        self.position += to_copy;
        to_copy
    }

    fn len(&self) -> usize {
        self.frames.len()
    }

    fn position(&self) -> usize {
        self.position
    }

    fn seek(&mut self, position: usize) -> Result<(), SeekError> {
        if position > self.frames.len() {
            return Err(SeekError::OutOfRange {
                position,
                length: self.frames.len(),
            });
        }
        self.position = position;
        Ok(())
    }
}
