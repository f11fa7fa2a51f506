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

//! Decode-once buffer caching.
//!
//! Files are decoded entirely into memory the first time they are loaded, so
//! repeated playback never touches the decoder again. Every buffer in a cache is
//! normalized to the format of the first buffer loaded into it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use super::buffer::{BufferSeeker, DecodedBuffer};
use super::decoder::{Decoder, SymphoniaDecoder};
use super::error::CacheError;
use super::format::Format;
use super::reader::{FileReader, Reader};
use super::resample;
use crate::config;


struct CacheState {
    /// Loaded buffers by key.
    buffers: HashMap<String, Arc<DecodedBuffer>>,
    /// Format adopted from the first load. None until then.
    format: Option<Format>,
}

/// Stores decoded, format-normalized buffers keyed by path.
///
/// Loads and releases take the write lock for their whole duration, so a key is
/// never decoded twice and a buffer is never observed half inserted. Seekers and
/// format queries only take the read lock.
pub struct BufferCache {
    state: RwLock<CacheState>,
    reader: Box<dyn Reader>,
    decoder: Box<dyn Decoder>,
    settings: config::Cache,
}

impl BufferCache {
    /// Creates a cache that reads from the filesystem and decodes with symphonia.
    pub fn new(settings: config::Cache) -> Self {
        Self::with_capabilities(Box::new(FileReader), Box::new(SymphoniaDecoder), settings)
    }

    /// Creates a cache that reads through the given reader.
    pub fn with_reader<R: Reader + 'static>(reader: R, settings: config::Cache) -> Self {
        Self::with_capabilities(Box::new(reader), Box::new(SymphoniaDecoder), settings)
    }

    /// Creates a cache with explicit read and decode capabilities.
    pub fn with_capabilities(
        reader: Box<dyn Reader>,
        decoder: Box<dyn Decoder>,
        settings: config::Cache,
    ) -> Self {
        BufferCache {
            state: RwLock::new(CacheState {
                buffers: HashMap::new(),
                format: None,
            }),
            reader,
            decoder,
            settings,
        }
    }

    /// Loads and decodes the file at `key`. Loading a key that is already cached
    /// does nothing. On error the cache is left untouched.
    pub fn load(&self, key: &str) -> Result<(), CacheError> {
        let mut state = self.state.write();
        if state.buffers.contains_key(key) {
            debug!(key, "Buffer already loaded");
            return Ok(());
        }

        info!(key, "Loading buffer into memory");

        let source = self.reader.open(key).map_err(|source| CacheError::Io {
            path: key.to_string(),
            source,
        })?;
        let hint = Path::new(key).extension().and_then(|ext| ext.to_str());
        let decoded = self
            .decoder
            .decode(source, hint)
            .map_err(|source| CacheError::Decode {
                path: key.to_string(),
                source,
            })?;

        // The first buffer ever loaded decides the format of the cache.
        let format = state.format.unwrap_or(decoded.format);
        let frames = if decoded.format.sample_rate == format.sample_rate {
            decoded.frames
        } else {
            info!(
                key,
                source_rate = decoded.format.sample_rate,
                target_rate = format.sample_rate,
                resampler = ?self.settings.resampler(),
                "Resampling buffer"
            );
            resample::resample(
                &decoded.frames,
                decoded.format.sample_rate,
                format.sample_rate,
                self.settings.resampler(),
                self.settings.resample_quality(),
            )
            .map_err(|source| CacheError::Resample {
                path: key.to_string(),
                source,
            })?
        };

        let buffer = DecodedBuffer::new(key, frames, format);
        info!(
            key,
            frames = buffer.len(),
            format = %format,
            duration_ms = buffer.duration().as_millis(),
            memory_kb = buffer.memory_size() / 1024,
            "Buffer loaded"
        );

        if state.format.is_none() {
            info!(format = %format, "Adopted cache format");
            state.format = Some(format);
        }
        state.buffers.insert(key.to_string(), Arc::new(buffer));
        Ok(())
    }

    /// Frees the buffer for `key`. Releasing a key that is not loaded does nothing.
    /// Seekers already handed out keep their frames alive.
    pub fn release(&self, key: &str) {
        let mut state = self.state.write();
        if state.buffers.remove(key).is_some() {
            info!(key, "Released buffer");
        } else {
            debug!(key, "Release of unloaded buffer ignored");
        }
    }

    /// Frees every buffer. The adopted format is kept unless the cache is
    /// configured with `reset_format_on_release_all`.
    pub fn release_all(&self) {
        let mut state = self.state.write();
        let released = state.buffers.len();
        state.buffers.clear();
        if self.settings.reset_format_on_release_all() {
            state.format = None;
        }
        info!(released, "Released all buffers");
    }

    /// Returns a new seeker over the buffer for `key`, positioned at the start.
    pub fn stream_seeker(&self, key: &str) -> Result<BufferSeeker, CacheError> {
        Ok(self.buffer(key)?.seeker())
    }

    /// Returns the buffer for `key`.
    pub fn buffer(&self, key: &str) -> Result<Arc<DecodedBuffer>, CacheError> {
        let state = self.state.read();
        state
            .buffers
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::NotFound(key.to_string()))
    }

    /// Returns the common format of all buffers.
    pub fn format(&self) -> Result<Format, CacheError> {
        self.state.read().format.ok_or(CacheError::NotInitialized)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.read().buffers.contains_key(key)
    }

    /// Number of loaded buffers.
    pub fn len(&self) -> usize {
        self.state.read().buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().buffers.is_empty()
    }

    /// Returns the loaded keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.state.read().buffers.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the total memory used by cached frames.
    pub fn memory_usage(&self) -> usize {
        self.state
            .read()
            .buffers
            .values()
            .map(|buffer| buffer.memory_size())
            .sum()
    }
}

impl std::fmt::Debug for BufferCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("BufferCache")
            .field("cached_buffers", &state.buffers.len())
            .field("format", &state.format)
            .field(
                "total_memory_kb",
                &(state
                    .buffers
                    .values()
                    .map(|buffer| buffer.memory_size())
                    .sum::<usize>()
                    / 1024),
            )
            .finish()
    }
}
