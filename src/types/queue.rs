use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Builds waiting for an executor (`/queue/api/json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    /// Waiting items.
    pub items: Vec<QueueItem>,
}

impl Queue {
    /// Items queued for the job called `name`.
    pub fn items_for<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a QueueItem> {
        self.items.iter().filter(move |item| item.task.name == name)
    }
}

/// A triggered build that has not started yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueItem {
    /// Causes and parameters.
    pub actions: Vec<Value>,
    /// Blocked by another build.
    pub blocked: bool,
    /// Ready to run once an executor frees up.
    pub buildable: bool,
    /// When the item became buildable, milliseconds since the epoch.
    pub buildable_start_milliseconds: u64,
    /// Queue id.
    pub id: u64,
    /// When the item was queued, milliseconds since the epoch.
    pub in_queue_since: u64,
    /// Build parameters as text.
    pub params: String,
    /// Waiting for a resource.
    pub pending: bool,
    /// Buildable for too long.
    pub stuck: bool,
    /// The job to build.
    pub task: QueueTask,
    /// Item URL.
    pub url: String,
    /// Why the item is still waiting.
    pub why: Option<String>,
    /// The started build, once the item left the queue.
    pub executable: Option<Value>,
    /// Whether the item was cancelled.
    pub cancelled: bool,
}

/// The job a queue item belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueTask {
    /// Status ball color.
    pub color: Option<String>,
    /// Job name.
    pub name: String,
    /// Job URL.
    pub url: String,
}
