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
use std::error::Error;
use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hound::{SampleFormat, WavSpec, WavWriter};
use symphonia::core::io::MediaSource;

use crate::audio::decoder::{Decoded, Decoder};
use crate::audio::error::{DecodeError, SeekError};
use crate::audio::format::{Format, Frame};
use crate::audio::seeker::StreamSeeker;

/// Writes planar channel data as an interleaved WAV stream.
fn write_planar<W, S>(
    writer: W,
    channels: &[Vec<S>],
    sample_rate: u32,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<(), Box<dyn Error>>
where
    W: Write + Seek,
    S: hound::Sample + Copy,
{
    assert!(!channels.is_empty(), "At least one channel is required");
    let mut writer = WavWriter::new(
        writer,
        WavSpec {
            channels: channels.len() as u16,
            sample_rate,
            bits_per_sample,
            sample_format,
        },
    )?;

    let frames = channels[0].len();
    for frame in 0..frames {
        for channel in channels {
            writer.write_sample(channel[frame])?;
        }
    }
    writer.finalize()?;

    Ok(())
}

/// Returns a 32-bit float WAV file in memory.
pub fn wav_bytes(channels: &[Vec<f32>], sample_rate: u32) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut cursor = Cursor::new(Vec::new());
    write_planar(&mut cursor, channels, sample_rate, 32, SampleFormat::Float)?;
    Ok(cursor.into_inner())
}

/// Returns a 16-bit integer WAV file in memory.
pub fn wav_bytes_i16(
    channels: &[Vec<i16>],
    sample_rate: u32,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut cursor = Cursor::new(Vec::new());
    write_planar(&mut cursor, channels, sample_rate, 16, SampleFormat::Int)?;
    Ok(cursor.into_inner())
}

/// Writes a 32-bit float WAV file to disk.
pub fn write_wav(
    path: PathBuf,
    channels: &[Vec<f32>],
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    write_planar(file, channels, sample_rate, 32, SampleFormat::Float)
}

/// Stereo frames where frame i is [i, -i] scaled by `gain`.
pub fn ramp(len: usize, gain: f32) -> Vec<Frame> {
    (0..len)
        .map(|i| [i as f32 * gain, -(i as f32) * gain])
        .collect()
}

/// A decoder that returns fixed frames for every stream and counts its calls.
pub struct FixedDecoder {
    pub decoded: Decoded,
    pub calls: Arc<AtomicUsize>,
}

impl FixedDecoder {
    pub fn new(frames: Vec<Frame>, sample_rate: u32) -> Self {
        FixedDecoder {
            decoded: Decoded {
                frames,
                format: Format::stereo(sample_rate),
                source_channels: 2,
            },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Decoder for FixedDecoder {
    fn decode(
        &self,
        _source: Box<dyn MediaSource>,
        _hint: Option<&str>,
    ) -> Result<Decoded, DecodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Slow enough that concurrent loads overlap.
        std::thread::sleep(std::time::Duration::from_millis(5));
        Ok(self.decoded.clone())
    }
}

/// A seeker of a given length whose seek always fails.
pub struct FailingSeeker {
    pub length: usize,
}

impl StreamSeeker for FailingSeeker {
    fn stream(&mut self, output: &mut [Frame]) -> usize {
        // Would be audible if the mixer ever used it.
        let n = output.len().min(self.length);
        output[..n].fill([100.0, 100.0]);
        n
    }

    fn len(&self) -> usize {
        self.length
    }

    fn position(&self) -> usize {
        0
    }

    fn seek(&mut self, _position: usize) -> Result<(), SeekError> {
        Err(SeekError::Other("device unavailable".to_string()))
    }
}
