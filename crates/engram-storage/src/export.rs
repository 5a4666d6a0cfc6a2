//! Export/import of one project as a versioned JSON document. Import is
//! all-or-nothing: any invalid record rejects the whole document before a
//! single row is touched.

use rusqlite::Connection;

use engram_core::constants::EXPORT_SCHEMA_VERSION;
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{ImportSummary, ProjectExport};

use crate::queries::{context_crud, project_ops};
use crate::to_storage_err;

/// Pagination size used when draining a project's contexts for export.
const EXPORT_PAGE_SIZE: usize = 500;

/// Build the export document for one project.
pub fn export_project(conn: &Connection, project_key: &str) -> EngramResult<ProjectExport> {
    let project = project_ops::get_project(conn, project_key)?.ok_or_else(|| {
        EngramError::ProjectNotFound {
            key: project_key.to_string(),
        }
    })?;

    let mut contexts = Vec::new();
    let mut offset = 0;
    loop {
        let page = context_crud::list_by_project(conn, project_key, EXPORT_PAGE_SIZE, offset)?;
        let done = page.len() < EXPORT_PAGE_SIZE;
        contexts.extend(page);
        if done {
            break;
        }
        offset += EXPORT_PAGE_SIZE;
    }

    Ok(ProjectExport::new(project, contexts))
}

/// Validate the document, then apply it in a single transaction.
pub fn import_project(conn: &Connection, export: &ProjectExport) -> EngramResult<ImportSummary> {
    validate(export)?;

    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("import_project begin: {e}")))?;

    let result = apply(&tx, export);
    match result {
        Ok(summary) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("import_project commit: {e}")))?;
            Ok(summary)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}

/// Boundary validation. Errors name the offending record so the caller can
/// fix the document rather than guess.
fn validate(export: &ProjectExport) -> EngramResult<()> {
    if export.schema_version != EXPORT_SCHEMA_VERSION {
        return Err(EngramError::ImportRejected {
            reason: format!(
                "unsupported schema version {} (expected {EXPORT_SCHEMA_VERSION})",
                export.schema_version
            ),
        });
    }
    if export.project.key.is_empty() {
        return Err(EngramError::ImportRejected {
            reason: "project key is empty".to_string(),
        });
    }
    for (idx, record) in export.contexts.iter().enumerate() {
        if record.id.is_empty() {
            return Err(EngramError::ImportRejected {
                reason: format!("context #{idx} has an empty id"),
            });
        }
        if record.project_key != export.project.key {
            return Err(EngramError::ImportRejected {
                reason: format!(
                    "context '{}' belongs to project '{}', document is for '{}'",
                    record.id, record.project_key, export.project.key
                ),
            });
        }
        if record.last_accessed < record.created_at {
            return Err(EngramError::ImportRejected {
                reason: format!("context '{}' accessed before it was created", record.id),
            });
        }
    }
    Ok(())
}

fn apply(conn: &Connection, export: &ProjectExport) -> EngramResult<ImportSummary> {
    let mut replaced = 0;
    for record in &export.contexts {
        if context_crud::get_context(conn, &record.id)?.is_some() {
            replaced += 1;
        }
        context_crud::save_context_in(conn, record)?;
    }

    // Upsert the project row: the document carries name/path/first_seen
    // from the source machine, and a zero-context export must still land
    // its project record. Aggregates stay as recounted from what landed.
    conn.execute(
        "INSERT INTO projects (
            key, name, path, context_count, total_tokens, first_seen, last_updated
        ) VALUES (?1, ?2, ?3, 0, 0, ?4, ?5)
        ON CONFLICT(key) DO UPDATE SET
            name = excluded.name,
            path = excluded.path,
            first_seen = excluded.first_seen",
        rusqlite::params![
            export.project.key,
            export.project.name,
            export.project.path,
            export.project.first_seen.to_rfc3339(),
            export.project.last_updated.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(ImportSummary {
        project_key: export.project.key.clone(),
        contexts_imported: export.contexts.len(),
        replaced,
    })
}
