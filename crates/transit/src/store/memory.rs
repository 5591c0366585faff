//! In-memory line store, used by tests and by callers that manage
//! persistence themselves.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::identifiers::LineId;
use crate::models::records::LineRecord;
use crate::models::types::*;
use crate::store::traits::LineStore;

#[derive(Debug, Default)]
pub struct MemoryLineStore {
    lines: RwLock<BTreeMap<LineId, LineRecord>>,
}

impl MemoryLineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = LineRecord>) -> Self {
        Self {
            lines: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    pub fn get(&self, id: LineId) -> Option<LineRecord> {
        self.lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }
}

impl LineStore for MemoryLineStore {
    fn load_lines(&self) -> Result<Vec<LineRecord>> {
        let lines = self.lines.read().unwrap_or_else(PoisonError::into_inner);
        Ok(lines.values().cloned().collect())
    }

    fn save_line(&self, line: &LineRecord) -> Result<()> {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(line.id, line.clone());
        Ok(())
    }

    fn delete_line(&self, id: LineId) -> Result<()> {
        self.lines
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id)
            .map(|_| ())
            .ok_or(SubwayError::LineNotFound(id))
    }
}
