//! Typed mirrors of the Jenkins JSON API.
//!
//! Only the parts of the schema the client relies on are typed strictly.
//! Fields whose shape depends on installed plugins stay
//! [`serde_json::Value`]. Every struct defaults missing fields, since Jenkins
//! omits or nulls fields depending on version, depth and permissions.
//!
//! # Key Types
//!
//! | Type | Route |
//! |------|-------|
//! | [`Root`] | `/api/json` |
//! | [`Job`] | `/job/{name}/api/json` |
//! | [`Build`] | `/job/{name}/{number}/api/json` |
//! | [`BuildInvoked`] | `Location` of `POST /job/{name}/build` |
//! | [`Queue`] | `/queue/api/json` |
//! | [`QueueItem`] | `/queue/item/{id}/api/json` |

mod build;
mod job;
mod queue;
mod root;

pub use build::{
    Artifact, Branch, BranchBuild, Build, BuildAction, BuildInvoked, BuildParameter, ChangeAuthor,
    ChangePath, ChangeSet, ChangeSetItem, ChangeSetRevision, Culprit, Revision,
};
pub use job::{
    BuildBrief, HealthReport, Job, JobBrief, JobProperty, ParameterDefinition, ParameterValue,
};
pub use queue::{Queue, QueueItem, QueueTask};
pub use root::{Root, ViewBrief};
