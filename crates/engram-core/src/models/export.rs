use serde::{Deserialize, Serialize};

use super::context_record::ContextRecord;
use super::project_record::ProjectRecord;
use crate::constants::EXPORT_SCHEMA_VERSION;

/// Backup/transfer document for one project: the owning project record
/// plus every context under it. Versioned so future schemas can be
/// detected at the import boundary instead of half-applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
    pub schema_version: u32,
    pub project: ProjectRecord,
    pub contexts: Vec<ContextRecord>,
}

impl ProjectExport {
    pub fn new(project: ProjectRecord, contexts: Vec<ContextRecord>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            project,
            contexts,
        }
    }
}
