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
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor};
use std::sync::Arc;

use symphonia::core::io::MediaSource;

/// Supplies the raw bytes for a path.
pub trait Reader: Send + Sync {
    fn open(&self, path: &str) -> io::Result<Box<dyn MediaSource>>;
}

/// Reads from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReader;

impl Reader for FileReader {
    fn open(&self, path: &str) -> io::Result<Box<dyn MediaSource>> {
        // Include the path in the error so the caller sees which file failed.
        let file = File::open(path)
            .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path, e)))?;
        Ok(Box::new(file))
    }
}

/// Serves byte contents registered in memory. Unknown paths fail with NotFound.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    contents: HashMap<String, Arc<[u8]>>,
}

impl MemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the contents served for `path`, replacing any previous contents.
    pub fn insert(&mut self, path: &str, contents: Vec<u8>) {
        self.contents.insert(path.to_string(), contents.into());
    }

    /// Builder form of [`MemoryReader::insert`].
    pub fn with(mut self, path: &str, contents: Vec<u8>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl Reader for MemoryReader {
    fn open(&self, path: &str) -> io::Result<Box<dyn MediaSource>> {
        match self.contents.get(path) {
            Some(contents) => Ok(Box::new(Cursor::new(Arc::clone(contents)))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such entry", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn test_file_reader_missing_file() {
        let err = FileReader.open("/foo/bar/baz.mp3").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/foo/bar/baz.mp3"));
    }

    #[test]
    fn test_file_reader_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contents.bin");
        std::fs::write(&path, b"foo bar baz qux").unwrap();

        let mut source = FileReader.open(path.to_str().unwrap()).unwrap();
        let mut contents = String::new();
        source.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "foo bar baz qux");
    }

    #[test]
    fn test_memory_reader() {
        let reader = MemoryReader::new().with("/dummy/path.mp3", b"foo".to_vec());

        let mut source = reader.open("/dummy/path.mp3").unwrap();
        let mut contents = Vec::new();
        source.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"foo");

        // Every open gets a fresh cursor.
        let mut again = reader.open("/dummy/path.mp3").unwrap();
        let mut contents = Vec::new();
        again.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"foo");

        let err = reader.open("/dummy/other.mp3").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
