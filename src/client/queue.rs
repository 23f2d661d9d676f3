//! Build queue inspection.

use super::JenkinsClient;
use crate::error::Result;
use crate::request::{ApiRequest, CallContext};
use crate::types::{Queue, QueueItem};

impl JenkinsClient {
    /// All items currently waiting in the build queue.
    pub async fn queue_list(&self, ctx: &CallContext) -> Result<Queue> {
        self.get(ctx, &ApiRequest::get("/queue")).await
    }

    /// A single queue item, e.g. the one returned by
    /// [`build_invoke`](Self::build_invoke).
    ///
    /// Jenkins keeps items for a few minutes after they leave the queue;
    /// `executable` then points at the started build.
    pub async fn queue_item_get(&self, ctx: &CallContext, queue_id: u64) -> Result<QueueItem> {
        self.get(ctx, &ApiRequest::get(format!("/queue/item/{queue_id}")))
            .await
    }
}
