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
pub mod buffer;
pub mod cache;
pub mod decoder;
pub mod error;
pub mod format;
pub mod mixer;
pub mod reader;
pub mod resample;
pub mod seeker;

pub use buffer::{BufferSeeker, DecodedBuffer};
pub use cache::BufferCache;
pub use error::{CacheError, DecodeError, MixerError, ResampleError, SeekError};
pub use format::{Format, Frame};
pub use mixer::{Streamed, Synchronized};
pub use seeker::StreamSeeker;
