//! JSON snapshot file acting as the line store.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use subway_transit::prelude::*;
use tempfile::NamedTempFile;

/// On-disk layout: every line with its sections.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub lines: Vec<LineRecord>,
}

/// Line store backed by a single JSON file. The whole file is rewritten on
/// every save, through a temporary file renamed over the old snapshot.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, err: impl std::fmt::Display) -> SubwayError {
        SubwayError::Storage(format!("{}: {}", self.path.display(), err))
    }

    fn read(&self) -> Result<Snapshot> {
        let file = File::open(&self.path).map_err(|e| self.storage_error(e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| self.storage_error(e))
    }

    fn write(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(|e| self.storage_error(e))?;

        let mut writer = BufWriter::new(staged.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, snapshot).map_err(|e| self.storage_error(e))?;
        writer.flush().map_err(|e| self.storage_error(e))?;
        drop(writer);

        staged
            .persist(&self.path)
            .map(|_| ())
            .map_err(|e| self.storage_error(e))
    }
}

impl LineStore for JsonSnapshotStore {
    fn load_lines(&self) -> Result<Vec<LineRecord>> {
        Ok(self.read()?.lines)
    }

    fn save_line(&self, line: &LineRecord) -> Result<()> {
        let mut snapshot = self.read()?;

        match snapshot.lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => *existing = line.clone(),
            None => snapshot.lines.push(line.clone()),
        }
        snapshot.lines.sort_by_key(|l| l.id);

        self.write(&snapshot)
    }

    fn delete_line(&self, id: LineId) -> Result<()> {
        let mut snapshot = self.read()?;
        let before = snapshot.lines.len();
        snapshot.lines.retain(|l| l.id != id);

        if snapshot.lines.len() == before {
            return Err(SubwayError::LineNotFound(id));
        }
        self.write(&snapshot)
    }
}
