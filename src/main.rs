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
use std::path::PathBuf;
use std::time::Duration;

use clap::{crate_version, Parser, Subcommand};
use duration_string::DurationString;
use stembuf::audio::{BufferCache, Synchronized};
use stembuf::config::Settings;
use stembuf::render;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Decode-once stem mixing."
)]
struct Cli {
    /// The path to a YAML settings file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decodes the given files and prints their normalized format and length.
    Info {
        /// The audio files to inspect.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Mixes the given files in lock-step and writes the result to a WAV file.
    Mix {
        /// The audio files to mix. All must have the same length once decoded.
        #[arg(required = true)]
        files: Vec<String>,
        /// Where to start the mix, for example 1m30s.
        #[arg(short, long)]
        start: Option<String>,
        /// The WAV file to write.
        #[arg(short, long, default_value = "mix.wav")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let settings = match cli.config {
        Some(path) => Settings::deserialize(&path)?,
        None => Settings::default(),
    };
    let cache = BufferCache::new(settings.cache().clone());

    match cli.command {
        Commands::Info { files } => {
            for file in files.iter() {
                cache.load(file)?;
            }

            let format = cache.format()?;
            println!("Format: {}", format);
            println!("Buffers (count: {}):", cache.len());
            for key in cache.keys() {
                let buffer = cache.buffer(&key)?;
                println!(
                    "- {} ({} frames, {:.3}s)",
                    key,
                    buffer.len(),
                    buffer.duration().as_secs_f64()
                );
            }
            println!("Memory: {} KiB", cache.memory_usage() / 1024);
        }
        Commands::Mix {
            files,
            start,
            output,
        } => {
            let mixer = Synchronized::new();
            for file in files.iter() {
                cache.load(file)?;
                mixer.add(cache.stream_seeker(file)?, file)?;
            }

            let format = cache.format()?;
            let start: Duration = match start {
                Some(start) => DurationString::from_string(start)?.into(),
                None => Duration::ZERO,
            };
            mixer.seek(format.frames_for(start))?;

            let stats =
                render::write_wav(&output, format, &mixer, settings.mixer().buffer_size())?;
            println!(
                "Wrote {} frames ({:.3}s) to {}",
                stats.frames,
                format.duration(stats.frames).as_secs_f64(),
                output.display()
            );
            if !stats.skipped.is_empty() {
                println!("Skipped: {}", stats.skipped.join(", "));
            }
            if let Some(err) = mixer.err() {
                println!("Last stream error: {}", err);
            }

            cache.release_all();
        }
    }

    Ok(())
}
