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

//! Whole-buffer sample rate conversion.
//!
//! Buffers are converted once at load time, so both resamplers work on complete
//! frame slices rather than streaming chunks. The output of either resampler for
//! `n` input frames is exactly `ceil(n * to / from)` frames.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use serde::Deserialize;

use super::error::ResampleError;
use super::format::Frame;

/// Highest accepted quality. Each step widens the interpolation window by two frames.
pub const MAX_QUALITY: usize = 64;

/// Input block size for the sinc resampler.
const SINC_BLOCK_SIZE: usize = 1024;

/// The interpolation used when a loaded buffer does not match the cache rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResamplerKind {
    /// Lagrange interpolation over `2 * quality` neighbouring frames.
    /// Quality 1 is plain linear interpolation.
    #[default]
    Polynomial,
    /// Band-limited sinc interpolation. Ignores the quality setting.
    Sinc,
}

/// Number of frames produced when converting `frames` frames from `from` Hz to `to` Hz.
pub fn resampled_len(frames: usize, from: u32, to: u32) -> usize {
    if from == 0 {
        return 0;
    }
    (frames as u64 * to as u64).div_ceil(from as u64) as usize
}

/// Converts `frames` from `from` Hz to `to` Hz.
pub fn resample(
    frames: &[Frame],
    from: u32,
    to: u32,
    kind: ResamplerKind,
    quality: usize,
) -> Result<Vec<Frame>, ResampleError> {
    if from == 0 || to == 0 {
        return Err(ResampleError::Failed(from, to));
    }
    if from == to {
        return Ok(frames.to_vec());
    }
    match kind {
        ResamplerKind::Polynomial => resample_polynomial(frames, from, to, quality),
        ResamplerKind::Sinc => resample_sinc(frames, from, to),
    }
}

fn resample_polynomial(
    frames: &[Frame],
    from: u32,
    to: u32,
    quality: usize,
) -> Result<Vec<Frame>, ResampleError> {
    if quality == 0 || quality > MAX_QUALITY {
        return Err(ResampleError::InvalidQuality {
            quality,
            max: MAX_QUALITY,
        });
    }
    if frames.is_empty() {
        return Ok(Vec::new());
    }

    let ratio = from as f64 / to as f64;
    let output_len = resampled_len(frames.len(), from, to);
    let last = frames.len() as isize - 1;
    let window = quality as isize;

    let mut output = Vec::with_capacity(output_len);
    for target in 0..output_len {
        let pos = target as f64 * ratio;
        let base = pos.floor() as isize;
        let (first, end) = (base - window + 1, base + window);

        let mut acc = [0.0f64; 2];
        for i in first..=end {
            // Lagrange basis polynomial for point i over the window.
            let mut weight = 1.0f64;
            for k in first..=end {
                if k != i {
                    weight *= (pos - k as f64) / (i - k) as f64;
                }
            }
            // Points outside the buffer repeat the edge frame.
            let frame = frames[i.clamp(0, last) as usize];
            acc[0] += weight * frame[0] as f64;
            acc[1] += weight * frame[1] as f64;
        }
        output.push([acc[0] as f32, acc[1] as f32]);
    }

    Ok(output)
}

fn resample_sinc(frames: &[Frame], from: u32, to: u32) -> Result<Vec<Frame>, ResampleError> {
    if frames.is_empty() {
        return Ok(Vec::new());
    }

    let sinc_params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 128,
        interpolation: SincInterpolationType::Linear,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(
        to as f64 / from as f64,
        1.0,
        sinc_params,
        SINC_BLOCK_SIZE,
        2,
    )
    .map_err(|_e| ResampleError::Failed(from, to))?;

    let expected = resampled_len(frames.len(), from, to);
    let delay = resampler.output_delay();
    let planar: [Vec<f32>; 2] = [
        frames.iter().map(|frame| frame[0]).collect(),
        frames.iter().map(|frame| frame[1]).collect(),
    ];

    let mut output: [Vec<f32>; 2] = [
        Vec::with_capacity(expected + delay),
        Vec::with_capacity(expected + delay),
    ];
    let mut offset = 0;
    while offset < frames.len() {
        let end = (offset + SINC_BLOCK_SIZE).min(frames.len());
        let block: [&[f32]; 2] = [&planar[0][offset..end], &planar[1][offset..end]];
        let produced = if end - offset == SINC_BLOCK_SIZE {
            resampler.process(&block[..], None)
        } else {
            resampler.process_partial(Some(&block[..]), None)
        }
        .map_err(|_e| ResampleError::Failed(from, to))?;
        append_planar(&mut output, produced);
        offset = end;
    }

    // Flush the filter delay with silence until the tail is out.
    while output[0].len() < expected + delay {
        let produced = resampler
            .process_partial(None::<&[&[f32]]>, None)
            .map_err(|_e| ResampleError::Failed(from, to))?;
        if produced.first().map_or(true, |channel| channel.is_empty()) {
            break;
        }
        append_planar(&mut output, produced);
    }

    let end = (delay + expected).min(output[0].len());
    Ok((delay..end)
        .map(|i| [output[0][i], output[1][i]])
        .collect())
}

fn append_planar(output: &mut [Vec<f32>; 2], produced: Vec<Vec<f32>>) {
    for (channel, samples) in output.iter_mut().zip(produced) {
        channel.extend(samples);
    }
}
