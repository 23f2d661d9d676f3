use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::JobBrief;

/// Summary of the node the client is connected to (`/api/json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Root {
    /// Labels assigned to the node.
    pub assigned_labels: Vec<Value>,
    /// Executor usage mode, e.g. `NORMAL`.
    pub mode: String,
    /// Free-form node description.
    pub node_description: String,
    /// Node name; empty for the built-in node.
    pub node_name: String,
    /// Executors on this node.
    pub num_executors: u32,
    /// Top-level jobs.
    pub jobs: Vec<JobBrief>,
    /// Load statistics.
    pub overall_load: Value,
    /// Default view.
    pub primary_view: Option<ViewBrief>,
    /// Whether the node is preparing for shutdown.
    pub quieting_down: bool,
    /// Inbound agent port; `-1` when disabled.
    pub slave_agent_port: i32,
    /// Load statistics for unlabeled jobs.
    pub unlabeled_load: Value,
    /// Whether CSRF crumbs are required.
    pub use_crumbs: bool,
    /// Whether security is enabled.
    pub use_security: bool,
    /// All views.
    pub views: Vec<ViewBrief>,
}

impl Root {
    /// Find a top-level job by name.
    pub fn job(&self, name: &str) -> Option<&JobBrief> {
        self.jobs.iter().find(|job| job.name == name)
    }
}

/// Short reference to a view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewBrief {
    /// View name.
    pub name: String,
    /// View URL.
    pub url: String,
}
