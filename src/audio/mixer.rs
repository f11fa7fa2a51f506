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
// Position-synchronized mixing of equal-length streams.
use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use super::error::{MixerError, SeekError};
use super::format::{Frame, SILENCE};
use super::seeker::StreamSeeker;

/// The result of a single [`Synchronized::stream`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streamed {
    /// Number of frames written to the start of the output.
    pub frames: usize,
    /// True when this call moved the cursor onto the end of the session.
    pub finished: bool,
    /// True when the cursor was already at the end and nothing was read.
    pub drained: bool,
    /// Participants left out of this call because they could not be repositioned.
    pub skipped: Vec<String>,
}

struct MixerState {
    /// Participants by id. Ordered so that summation order is stable.
    streams: BTreeMap<String, Box<dyn StreamSeeker>>,
    /// Shared cursor, between 0 and length.
    position: usize,
    /// Length every participant must have. Fixed by the first add.
    length: usize,
    initialized: bool,
    /// Most recent participant seek failure.
    last_error: Option<MixerError>,
    /// Per-participant read buffer, reused across calls.
    scratch: Vec<Frame>,
}

/// Streams any number of equal-length seekers in lock-step from one shared
/// cursor. Participants can be added and removed while streaming.
pub struct Synchronized {
    state: RwLock<MixerState>,
}

impl Default for Synchronized {
    fn default() -> Self {
        Self::new()
    }
}

impl Synchronized {
    /// Creates an empty mixer.
    pub fn new() -> Self {
        Synchronized {
            state: RwLock::new(MixerState {
                streams: BTreeMap::new(),
                position: 0,
                length: 0,
                initialized: false,
                last_error: None,
                scratch: Vec::new(),
            }),
        }
    }

    /// Returns the total number of frames of the session, 0 before the first add.
    pub fn len(&self) -> usize {
        self.state.read().length
    }

    /// Returns true if the session has no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the shared cursor, between 0 and `len()`.
    pub fn position(&self) -> usize {
        self.state.read().position
    }

    /// Moves the shared cursor. Participants are repositioned on the next
    /// stream call. On error the cursor is unchanged.
    pub fn seek(&self, position: usize) -> Result<(), MixerError> {
        let mut state = self.state.write();
        if position > state.length {
            return Err(MixerError::OutOfRange {
                position,
                length: state.length,
            });
        }
        state.position = position;
        Ok(())
    }

    /// Sums the next `output.len()` frames of every participant into `output`,
    /// starting at the shared cursor, and advances the cursor by the number of
    /// frames produced.
    ///
    /// A participant that cannot be repositioned is skipped for this call and its
    /// error is kept for [`Synchronized::err`]; the other participants still play.
    pub fn stream(&self, output: &mut [Frame]) -> Streamed {
        let mut guard = self.state.write();
        let state = &mut *guard;

        output.fill(SILENCE);
        if state.position >= state.length {
            return Streamed {
                drained: true,
                ..Default::default()
            };
        }

        let position = state.position;
        let requested = output.len().min(state.length - position);
        if state.scratch.len() < requested {
            state.scratch.resize(requested, SILENCE);
        }

        let mut produced = 0;
        let mut skipped = Vec::new();
        for (id, stream) in state.streams.iter_mut() {
            if let Err(source) = stream.seek(position) {
                warn!(id = id.as_str(), position, error = %source, "Skipping stream that failed to seek");
                state.last_error = Some(MixerError::Seek {
                    id: id.clone(),
                    position,
                    source,
                });
                skipped.push(id.clone());
                continue;
            }

            let scratch = &mut state.scratch[..requested];
            let n = stream.stream(scratch).min(requested);
            for (out, frame) in output.iter_mut().zip(&scratch[..n]) {
                out[0] += frame[0];
                out[1] += frame[1];
            }
            produced = produced.max(n);
        }

        state.position += produced;
        let finished = state.position == state.length;
        if finished {
            debug!(length = state.length, "Reached end of session");
        }

        Streamed {
            frames: produced,
            finished,
            drained: false,
            skipped,
        }
    }

    /// Returns the most recent participant seek failure, if any occurred.
    /// Only the latest failure is kept.
    pub fn err(&self) -> Option<MixerError> {
        self.state.read().last_error.clone()
    }

    /// Adds a participant under `id`. The first participant ever added fixes the
    /// session length; any other must match it. Adding an id that is already
    /// present does nothing.
    pub fn add<S: StreamSeeker + 'static>(&self, stream: S, id: &str) -> Result<(), MixerError> {
        let mut state = self.state.write();
        if state.streams.contains_key(id) {
            debug!(id, "Stream already added");
            return Ok(());
        }

        let length = stream.len();
        if !state.initialized {
            state.length = length;
            state.initialized = true;
            info!(id, length, "Session length fixed");
        } else if length != state.length {
            return Err(MixerError::LengthMismatch {
                id: id.to_string(),
                expected: state.length,
                actual: length,
            });
        }

        state.streams.insert(id.to_string(), Box::new(stream));
        info!(id, position = state.position, "Added stream");
        Ok(())
    }

    /// Removes the participant `id`. Removing an unknown id does nothing.
    /// The session length and cursor are not affected.
    pub fn remove(&self, id: &str) {
        let mut state = self.state.write();
        if state.streams.remove(id).is_some() {
            info!(id, "Removed stream");
        } else {
            debug!(id, "Remove of unknown stream ignored");
        }
    }

    /// Returns the ids of the current participants, sorted.
    pub fn participants(&self) -> Vec<String> {
        self.state.read().streams.keys().cloned().collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.read().streams.contains_key(id)
    }
}

/// Lets a mixer take part in another mixer as a submix.
impl StreamSeeker for Synchronized {
    fn stream(&mut self, output: &mut [Frame]) -> usize {
        Synchronized::stream(self, output).frames
    }

    fn len(&self) -> usize {
        Synchronized::len(self)
    }

    fn position(&self) -> usize {
        Synchronized::position(self)
    }

    fn seek(&mut self, position: usize) -> Result<(), SeekError> {
        Synchronized::seek(self, position).map_err(|e| match e {
            MixerError::OutOfRange { position, length } => {
                SeekError::OutOfRange { position, length }
            }
            other => SeekError::Other(other.to_string()),
        })
    }
}
