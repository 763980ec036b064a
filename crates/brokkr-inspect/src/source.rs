//! Project input sources
//!
//! The extractor only needs two capabilities from an uploaded project:
//! list entry paths and read an entry as text. Anything exposing that
//! works - a `.tar.gz` archive, a plain directory, or an in-memory
//! fixture.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use brokkr_core::{Error, Result};
use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;
use walkdir::WalkDir;

/// Entries larger than this are not read as text
const MAX_ENTRY_BYTES: u64 = 4 * 1024 * 1024;

/// Read access to a project file tree
pub trait ProjectSource {
    /// All entry paths, normalized to forward slashes without a leading `./`
    fn entries(&self) -> Vec<String>;

    /// Read one entry as text; `None` when absent or not readable as text
    fn read_text(&self, path: &str) -> Option<String>;
}

/// A gzip-compressed tar archive, fully indexed at open time
pub struct TarGzProject {
    files: BTreeMap<String, String>,
}

impl TarGzProject {
    /// Open an archive from raw bytes
    ///
    /// Fails only when the bytes cannot be read as a gzipped tar at
    /// all; individual non-text entries are skipped.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let decoder = GzDecoder::new(bytes);
        let mut archive = Archive::new(decoder);
        let mut files = BTreeMap::new();

        let entries = archive
            .entries()
            .map_err(|e| Error::extraction_failed(format!("not a tar.gz archive: {e}")))?;

        for entry in entries {
            let mut entry =
                entry.map_err(|e| Error::extraction_failed(format!("corrupt archive: {e}")))?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            if entry.size() > MAX_ENTRY_BYTES {
                continue;
            }
            let path = match entry.path() {
                Ok(p) => normalize(&p.to_string_lossy()),
                Err(_) => continue,
            };
            let mut buffer = Vec::new();
            if entry.read_to_end(&mut buffer).is_err() {
                continue;
            }
            match String::from_utf8(buffer) {
                Ok(text) => {
                    files.insert(path, text);
                }
                Err(_) => debug!("Skipping binary archive entry: {}", path),
            }
        }

        Ok(Self { files })
    }
}

impl ProjectSource for TarGzProject {
    fn entries(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn read_text(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

/// A project rooted at a local directory
pub struct DirProject {
    root: std::path::PathBuf,
    paths: Vec<String>,
}

impl DirProject {
    /// Index a directory tree
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::extraction_failed(format!(
                "not a directory: {}",
                root.display()
            )));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&root) {
                paths.push(normalize(&relative.to_string_lossy()));
            }
        }
        paths.sort();

        Ok(Self { root, paths })
    }
}

impl ProjectSource for DirProject {
    fn entries(&self) -> Vec<String> {
        self.paths.clone()
    }

    fn read_text(&self, path: &str) -> Option<String> {
        let full = self.root.join(path);
        let size = std::fs::metadata(&full).ok()?.len();
        if size > MAX_ENTRY_BYTES {
            return None;
        }
        std::fs::read_to_string(full).ok()
    }
}

/// In-memory project for fixtures and structured uploads
#[derive(Debug, Default)]
pub struct InMemoryProject {
    files: BTreeMap<String, String>,
}

impl InMemoryProject {
    /// Create an empty project
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(normalize(&path.into()), content.into());
        self
    }
}

impl ProjectSource for InMemoryProject {
    fn entries(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn read_text(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}

fn normalize(path: &str) -> String {
    let forward = path.replace('\\', "/");
    forward
        .trim_start_matches("./")
        .trim_start_matches('/')
        .to_string()
}
