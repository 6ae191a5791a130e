//! File-backed Visited Record
//!
//! The file is a single-column, tab-separated list with a `url` header. New
//! keys are appended and written through immediately, so an interrupted run
//! leaves every completed URL on disk.

use crate::storage::StorageResult;
use crate::url::normalize_url;
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const HEADER: &str = "url";

/// Durable set of keys (normalized URLs or PDF file names) already processed
#[derive(Debug)]
pub struct VisitedSet {
    path: PathBuf,
    keys: HashSet<String>,
    file: File,
}

impl VisitedSet {
    /// Opens (or creates) the visited file and loads its contents
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let keys = if path.exists() {
            load_keys(path)?
        } else {
            HashSet::new()
        };

        let file = open_list_for_append(path)?;

        tracing::info!("Loaded {} visited entries from {}", keys.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            keys,
            file,
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Adds a key, appending it to the file when it is new
    ///
    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: &str) -> StorageResult<bool> {
        if self.keys.contains(key) {
            return Ok(false);
        }

        writeln!(self.file, "{}", key)?;
        self.file.flush()?;
        self.keys.insert(key.to_string());
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Opens a one-URL-per-line list for appending
///
/// A new file gets the `url` header. A hand-edited file whose last line lacks
/// its newline gets one, so the next entry starts on a line of its own.
pub(crate) fn open_list_for_append(path: &Path) -> io::Result<File> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    let len = file.metadata()?.len();
    if len == 0 {
        writeln!(file, "{}", HEADER)?;
        return Ok(file);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        writeln!(file)?;
    }
    Ok(file)
}

fn load_keys(path: &Path) -> StorageResult<HashSet<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut keys = HashSet::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let entry = line.split('\t').next().unwrap_or("").trim();

        if entry.is_empty() || (index == 0 && entry == HEADER) {
            continue;
        }

        // Older files may hold URLs that predate normalization
        let key = match normalize_url(entry) {
            Ok(url) => url.to_string(),
            Err(_) => entry.to_string(),
        };
        keys.insert(key);
    }

    Ok(keys)
}
