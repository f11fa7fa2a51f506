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
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};
use tracing::{debug, warn};

use super::error::DecodeError;
use super::format::{Format, Frame};

/// Corrupt packets are skipped, but more than this many in a row is fatal.
const MAX_DECODE_RETRIES: usize = 3;

/// A fully decoded track, already folded down to stereo.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub frames: Vec<Frame>,
    /// Native sample rate of the track, with channels normalized to stereo.
    pub format: Format,
    /// Channel count as reported by the decoder, before normalization.
    pub source_channels: u16,
}

/// Turns a byte stream into frames.
pub trait Decoder: Send + Sync {
    /// Decodes the whole stream. `hint` is an optional file extension used to
    /// speed up format detection.
    fn decode(
        &self,
        source: Box<dyn MediaSource>,
        hint: Option<&str>,
    ) -> Result<Decoded, DecodeError>;
}

/// Decodes WAV, MP3, FLAC, Ogg and everything else symphonia supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaDecoder;

impl Decoder for SymphoniaDecoder {
    fn decode(
        &self,
        source: Box<dyn MediaSource>,
        hint: Option<&str>,
    ) -> Result<Decoded, DecodeError> {
        let mss = MediaSourceStream::new(source, Default::default());

        let mut probe_hint = Hint::new();
        if let Some(extension) = hint {
            probe_hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let probed = get_probe().format(&probe_hint, mss, &fmt_opts, &meta_opts)?;
        let mut format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(DecodeError::NoAudioTrack)?;
        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .filter(|rate| *rate > 0)
            .ok_or(DecodeError::UnknownSampleRate)?;
        let capacity = track.codec_params.n_frames.unwrap_or(0) as usize;

        let decoder_opts: DecoderOptions = Default::default();
        let mut decoder = get_codecs().make(&track.codec_params, &decoder_opts)?;

        let mut frames: Vec<Frame> = Vec::with_capacity(capacity);
        let mut sample_buffer: Option<SampleBuffer<f32>> = None;
        let mut source_channels = 0u16;
        let mut consecutive_errors = 0usize;

        loop {
            let packet = match format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    break
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                // Some readers report the end of the stream as a decode error.
                Err(SymphoniaError::DecodeError(e)) => {
                    debug!(error = e, "Treating reader decode error as end of stream");
                    break;
                }
                Err(e) => return Err(e.into()),
            };
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => {
                    consecutive_errors = 0;
                    decoded
                }
                Err(SymphoniaError::DecodeError(e)) => {
                    consecutive_errors += 1;
                    if consecutive_errors > MAX_DECODE_RETRIES {
                        return Err(SymphoniaError::DecodeError(e).into());
                    }
                    warn!(error = e, "Skipping corrupt packet");
                    continue;
                }
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if decoded.frames() == 0 {
                continue;
            }

            let spec = *decoded.spec();
            let channels = spec.channels.count();
            let needed = decoded.capacity() * channels;
            if sample_buffer
                .as_ref()
                .map_or(true, |buffer| buffer.capacity() < needed)
            {
                sample_buffer = Some(SampleBuffer::new(decoded.capacity() as u64, spec));
            }
            if let Some(buffer) = sample_buffer.as_mut() {
                buffer.copy_interleaved_ref(decoded);
                push_stereo_frames(buffer.samples(), channels, &mut frames);
            }
            source_channels = channels as u16;
        }

        debug!(
            frames = frames.len(),
            sample_rate,
            source_channels,
            "Decoded audio"
        );

        Ok(Decoded {
            frames,
            format: Format::stereo(sample_rate),
            source_channels,
        })
    }
}

/// Folds interleaved samples into stereo frames. Mono is duplicated to both
/// sides, wider layouts keep their first two channels.
fn push_stereo_frames(samples: &[f32], channels: usize, frames: &mut Vec<Frame>) {
    match channels {
        0 => {}
        1 => frames.extend(samples.iter().map(|&sample| [sample, sample])),
        _ => frames.extend(
            samples
                .chunks_exact(channels)
                .map(|frame| [frame[0], frame[1]]),
        ),
    }
}
