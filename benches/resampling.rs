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
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stembuf::audio::format::Frame;
use stembuf::audio::resample::{resample, ResamplerKind};
use stembuf::audio::{DecodedBuffer, Format, Synchronized};

fn generate_test_audio(duration_seconds: f32, sample_rate: u32) -> Vec<Frame> {
    let num_frames = (duration_seconds * sample_rate as f32) as usize;
    (0..num_frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let left = 0.3 * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
                + 0.2 * (2.0 * std::f32::consts::PI * 880.0 * t).sin();
            let right = 0.3 * (2.0 * std::f32::consts::PI * 660.0 * t).sin();
            [left, right]
        })
        .collect()
}

fn benchmark_resampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("resampling");

    let test_cases = vec![
        ("48kHz_to_44.1kHz", 48000, 44100),
        ("44.1kHz_to_48kHz", 44100, 48000),
        ("96kHz_to_44.1kHz", 96000, 44100),
    ];

    for (name, source_rate, target_rate) in test_cases {
        let input = generate_test_audio(1.0, source_rate);

        for (kind, quality) in [
            (ResamplerKind::Polynomial, 1),
            (ResamplerKind::Polynomial, 4),
            (ResamplerKind::Sinc, 4),
        ] {
            let id = BenchmarkId::new(format!("{:?}_q{}", kind, quality), name);
            group.bench_function(id, |b| {
                b.iter(|| {
                    let result = resample(
                        black_box(&input),
                        source_rate,
                        target_rate,
                        kind,
                        quality,
                    )
                    .unwrap();
                    black_box(result)
                })
            });
        }
    }

    group.finish();
}

fn benchmark_mixing(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixing");

    // One second of audio per track, streamed in 1024 frame blocks.
    for tracks in [1, 8, 32] {
        let frames = generate_test_audio(1.0, 44100);
        let buffer = DecodedBuffer::new("bench", frames, Format::stereo(44100));
        let mixer = Synchronized::new();
        for i in 0..tracks {
            mixer.add(buffer.seeker(), &format!("track-{}", i)).unwrap();
        }

        let mut output = vec![[0.0f32; 2]; 1024];
        group.bench_function(BenchmarkId::new("tracks", tracks), |b| {
            b.iter(|| {
                mixer.seek(0).unwrap();
                loop {
                    let streamed = mixer.stream(black_box(&mut output));
                    if streamed.finished || streamed.drained {
                        break;
                    }
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_resampling, benchmark_mixing);
criterion_main!(benches);
