use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit trail entry written by the task-execution caller. Append-only,
/// with exactly one later mutation allowed: the outcome backfill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: String,
    pub session_id: String,
    pub task_id: Option<String>,
    /// What was decided.
    pub decision: String,
    /// Why it was decided.
    pub reasoning: String,
    /// Context the decision was made under.
    pub context: String,
    /// Filled in later once the result of the decision is known.
    pub outcome: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl DecisionRecord {
    /// New record with a generated id and the current timestamp.
    pub fn new(
        session_id: impl Into<String>,
        task_id: Option<String>,
        decision: impl Into<String>,
        reasoning: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            task_id,
            decision: decision.into(),
            reasoning: reasoning.into(),
            context: context.into(),
            outcome: None,
            timestamp: Utc::now(),
        }
    }
}
