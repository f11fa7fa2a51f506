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

//! Decode-once audio buffers and a mixer that plays many of them in lock-step.
//!
//! A [`audio::BufferCache`] decodes each file once, normalizes it to a shared
//! format, and hands out independent seekers over the decoded frames. A
//! [`audio::Synchronized`] mixer sums any number of equal-length seekers from one
//! shared cursor, so stems can be muted, swapped, or scrubbed without drifting.
pub mod audio;
pub mod config;
pub mod render;
#[cfg(test)]
mod testutil;
