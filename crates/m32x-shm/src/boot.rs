use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::ops::Index;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootImageError {
    #[error("failed to read boot image `{name}`: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Source of named byte streams (ROM images and similar system files).
pub trait FilePak {
    /// Open `name` for sequential reading, or `None` if the pak does not carry it.
    fn read(&self, name: &str) -> Option<Box<dyn Read + '_>>;
}

/// In-memory file pak.
#[derive(Debug, Default, Clone)]
pub struct MemoryPak {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryPak {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.files.insert(name.into(), data.into());
    }

    pub fn with(mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(name, data);
        self
    }
}

impl FilePak for MemoryPak {
    fn read(&self, name: &str) -> Option<Box<dyn Read + '_>> {
        let data = self.files.get(name)?;
        Some(Box::new(data.as_slice()))
    }
}

/// File pak backed by a directory on the host file system.
#[derive(Debug, Clone)]
pub struct DirectoryPak {
    root: PathBuf,
}

impl DirectoryPak {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FilePak for DirectoryPak {
    fn read(&self, name: &str) -> Option<Box<dyn Read + '_>> {
        let path = self.root.join(name);
        match File::open(&path) {
            Ok(file) => Some(Box::new(BufReader::new(file))),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), "cannot open pak file: {err}");
                }
                None
            }
        }
    }
}

/// Fixed-size ROM of big-endian 16-bit cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootImage {
    cells: Box<[u16]>,
}

impl BootImage {
    pub fn zeroed(cells: usize) -> Self {
        Self {
            cells: vec![0; cells].into_boxed_slice(),
        }
    }

    /// Fill cells from consecutive big-endian words of `source`.
    ///
    /// Stops at the end of the stream or of the image, whichever comes first; a trailing odd
    /// byte is dropped. Returns the number of cells written.
    pub fn fill_from(&mut self, mut source: impl Read) -> io::Result<usize> {
        let mut word = [0u8; 2];
        for (filled, cell) in self.cells.iter_mut().enumerate() {
            match source.read_exact(&mut word) {
                Ok(()) => *cell = u16::from_be_bytes(word),
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(filled),
                Err(err) => return Err(err),
            }
        }
        Ok(self.cells.len())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn size_bytes(&self) -> u32 {
        (self.cells.len() * 2) as u32
    }

    pub fn cells(&self) -> &[u16] {
        &self.cells
    }

    /// Byte view for debug memory inspection. Reads past the end return zero.
    pub fn read_byte(&self, address: u32) -> u8 {
        match self.cells.get((address >> 1) as usize) {
            Some(cell) if address & 1 == 0 => (cell >> 8) as u8,
            Some(cell) => *cell as u8,
            None => 0,
        }
    }

    /// Long formed from cells `index` and `index + 1`, high cell first.
    pub fn long(&self, index: usize) -> u32 {
        (self[index] as u32) << 16 | self[index + 1] as u32
    }
}

impl Index<usize> for BootImage {
    type Output = u16;

    fn index(&self, index: usize) -> &u16 {
        &self.cells[index]
    }
}
