//! Query modules: free functions over `&rusqlite::Connection`, composed by
//! the engine under its reader/writer routing.

pub mod aggregation;
pub mod context_crud;
pub mod decision_ops;
pub mod maintenance;
pub mod metric_ops;
pub mod project_ops;
pub mod tier_query;

/// Helper trait to make `query_row` return `Option` on not-found.
pub(crate) trait OptionalRow<T> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error>;
}

impl<T> OptionalRow<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, rusqlite::Error> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
