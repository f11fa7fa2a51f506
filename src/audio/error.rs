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

/// Errors produced while turning a byte stream into frames.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("Audio file error: {0}")]
    Audio(#[from] symphonia::core::errors::Error),

    #[error("No audio track found")]
    NoAudioTrack,

    #[error("Sample rate not specified")]
    UnknownSampleRate,
}

/// Errors produced while converting frames between sample rates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResampleError {
    #[error("Resampling failed: {0}Hz -> {1}Hz")]
    Failed(u32, u32),

    #[error("Resample quality must be between 1 and {max}, got {quality}")]
    InvalidQuality { quality: usize, max: usize },
}

/// Errors returned by the buffer cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {source}")]
    Decode { path: String, source: DecodeError },

    #[error("cannot resample {path}: {source}")]
    Resample { path: String, source: ResampleError },

    #[error("cannot get stream seeker from unloaded buffer {0}")]
    NotFound(String),

    #[error("cannot get format, no buffer has been loaded")]
    NotInitialized,
}

/// Errors returned when repositioning a stream seeker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeekError {
    #[error("position {position} out of bounds [0, {length}]")]
    OutOfRange { position: usize, length: usize },

    #[error("{0}")]
    Other(String),
}

/// Errors returned by the synchronized mixer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MixerError {
    #[error("cannot seek to position {position}, out of bounds [0, {length}]")]
    OutOfRange { position: usize, length: usize },

    #[error("cannot add stream {id}: expected length {expected}, got length {actual}")]
    LengthMismatch {
        id: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot seek stream {id} to position {position}: {source}")]
    Seek {
        id: String,
        position: usize,
        source: SeekError,
    },
}
