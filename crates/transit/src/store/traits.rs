//! Pluggable storage traits.
//!
//! Persistence lives outside this crate. Storage backends implement
//! [`LineStore`] to hand over and take back plain line records.

use crate::identifiers::LineId;
use crate::models::records::LineRecord;
use crate::models::types::Result;

/// Load and save line records, each carrying its sections.
pub trait LineStore: Send + Sync {
    fn load_lines(&self) -> Result<Vec<LineRecord>>;

    /// Insert or replace the line with the record's id.
    fn save_line(&self, line: &LineRecord) -> Result<()>;

    fn delete_line(&self, id: LineId) -> Result<()>;
}
