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
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{info, warn};

use crate::audio::format::{Format, Frame, SILENCE, STEREO};
use crate::audio::mixer::Synchronized;

/// Summary of a render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    /// Frames written.
    pub frames: usize,
    /// Largest absolute sample seen. Above 1.0 means the mix clipped.
    pub peak: f32,
    /// Participants skipped at least once, sorted.
    pub skipped: Vec<String>,
}

/// Streams the mixer from its current position to the end of the session in
/// blocks of `buffer_size` frames, handing every block to `sink`.
pub fn render<F>(
    mixer: &Synchronized,
    buffer_size: usize,
    mut sink: F,
) -> Result<RenderStats, Box<dyn Error>>
where
    F: FnMut(&[Frame]) -> Result<(), Box<dyn Error>>,
{
    if buffer_size == 0 {
        return Err("buffer size must be at least 1".into());
    }

    let mut output = vec![SILENCE; buffer_size];
    let mut stats = RenderStats::default();
    let mut skipped = BTreeSet::new();
    loop {
        let streamed = mixer.stream(&mut output);
        for id in streamed.skipped {
            if skipped.insert(id.clone()) {
                warn!(id = id.as_str(), "Participant skipped during render");
            }
        }

        if streamed.drained {
            break;
        }
        if streamed.frames == 0 {
            // Nothing left to play from, the cursor will never move.
            return Err("mixer has no participants to render".into());
        }

        let block = &output[..streamed.frames];
        stats.peak = block
            .iter()
            .flat_map(|frame| frame.iter())
            .fold(stats.peak, |peak, sample| peak.max(sample.abs()));
        sink(block)?;
        stats.frames += streamed.frames;

        if streamed.finished {
            break;
        }
    }

    stats.skipped = skipped.into_iter().collect();
    Ok(stats)
}

/// Renders the mixer into a 32-bit float stereo WAV file.
pub fn write_wav(
    path: &Path,
    format: Format,
    mixer: &Synchronized,
    buffer_size: usize,
) -> Result<RenderStats, Box<dyn Error>> {
    let spec = WavSpec {
        channels: STEREO,
        sample_rate: format.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    let stats = render(mixer, buffer_size, |block| {
        for frame in block {
            writer.write_sample(frame[0])?;
            writer.write_sample(frame[1])?;
        }
        Ok(())
    })?;
    writer.finalize()?;

    info!(
        path = %path.display(),
        frames = stats.frames,
        duration_ms = format.duration(stats.frames).as_millis(),
        peak = stats.peak,
        "Wrote mix"
    );
    if stats.peak > 1.0 {
        warn!(peak = stats.peak, "Mix exceeds full scale");
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::buffer::DecodedBuffer;
    use crate::testutil::{ramp, FailingSeeker};

    fn mixer_with(len: usize, gains: &[f32]) -> Synchronized {
        let mixer = Synchronized::new();
        for (i, gain) in gains.iter().enumerate() {
            let buffer = DecodedBuffer::new("ramp", ramp(len, *gain), Format::stereo(44100));
            mixer.add(buffer.seeker(), &format!("track-{}", i)).unwrap();
        }
        mixer
    }

    #[test]
    fn test_render_whole_session() {
        let mixer = mixer_with(10, &[0.1, 0.1]);
        let mut blocks = Vec::new();
        let stats = render(&mixer, 4, |block| {
            blocks.push(block.len());
            Ok(())
        })
        .unwrap();

        assert_eq!(blocks, vec![4, 4, 2]);
        assert_eq!(stats.frames, 10);
        assert!((stats.peak - 1.8).abs() < 1e-5);
        assert!(stats.skipped.is_empty());
        assert_eq!(mixer.position(), 10);
    }

    #[test]
    fn test_render_from_position() {
        let mixer = mixer_with(10, &[1.0]);
        mixer.seek(6).unwrap();
        let mut frames = Vec::new();
        let stats = render(&mixer, 3, |block| {
            frames.extend_from_slice(block);
            Ok(())
        })
        .unwrap();

        assert_eq!(stats.frames, 4);
        assert_eq!(frames[0], [6.0, -6.0]);
        assert_eq!(frames[3], [9.0, -9.0]);
    }

    #[test]
    fn test_render_at_end_is_empty() {
        let mixer = mixer_with(10, &[1.0]);
        mixer.seek(10).unwrap();
        let stats = render(&mixer, 3, |_| panic!("nothing should be rendered")).unwrap();
        assert_eq!(stats.frames, 0);
    }

    #[test]
    fn test_render_reports_skipped_participants() {
        let mixer = mixer_with(10, &[1.0]);
        mixer.add(FailingSeeker { length: 10 }, "broken").unwrap();
        let stats = render(&mixer, 4, |_| Ok(())).unwrap();
        assert_eq!(stats.frames, 10);
        assert_eq!(stats.skipped, vec!["broken".to_string()]);
    }

    #[test]
    fn test_render_errors() {
        let mixer = mixer_with(10, &[1.0]);
        assert!(render(&mixer, 0, |_| Ok(())).is_err());
        assert!(render(&mixer, 4, |_| Err("sink failed".into())).is_err());

        mixer.remove("track-0");
        assert!(render(&mixer, 4, |_| Ok(())).is_err());
    }

    #[test]
    fn test_write_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mix.wav");
        let mixer = mixer_with(100, &[0.001, 0.002]);

        let stats = write_wav(&path, Format::stereo(48000), &mixer, 32).unwrap();
        assert_eq!(stats.frames, 100);

        let mut reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 48000);
        assert_eq!(reader.duration(), 100);

        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples.len(), 200);
        assert!((samples[20] - 10.0 * 0.003).abs() < 1e-6);
        assert!((samples[21] + 10.0 * 0.003).abs() < 1e-6);
    }
}
