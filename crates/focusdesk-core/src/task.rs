//! Task records.
//!
//! The task list itself (CRUD, filtering, ordering) is display-layer glue;
//! the core only needs the records for the weekly stats recompute and as
//! the collaborator surface that toggles completion. The blob keeps the
//! original camelCase field names.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const WEEK_MS: u64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at_ms: u64,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub order: u32,
}

impl TaskRecord {
    pub fn new(title: impl Into<String>, priority: TaskPriority, created_at_ms: u64, order: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            created_at_ms,
            priority,
            order,
        }
    }

    /// Created within the trailing `window_ms` before `now_ms`.
    pub fn created_within(&self, now_ms: u64, window_ms: u64) -> bool {
        self.created_at_ms >= now_ms.saturating_sub(window_ms)
    }
}
