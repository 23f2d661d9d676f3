//! Job lifecycle operations.

use bytes::Bytes;

use super::{job_route, require_name, JenkinsClient};
use crate::error::{JenkinsError, Result};
use crate::request::{ApiRequest, CallContext, DumpMethod, Receiver};
use crate::types::Job;

/// Deepest `depth` accepted by [`JenkinsClient::job_get`].
pub const MAX_JOB_DEPTH: u8 = 2;

impl JenkinsClient {
    /// Create a job from its `config.xml` and return it as seen by the server.
    ///
    /// The creation call is followed by a [`job_get`](Self::job_get) with
    /// depth 0.
    pub async fn job_create(
        &self,
        ctx: &CallContext,
        name: &str,
        config: impl Into<Bytes>,
    ) -> Result<Job> {
        let api = ApiRequest::post("/createItem")
            .with_query("name", require_name("job", name)?)
            .with_body(config)
            .with_dump(DumpMethod::Json);

        self.processor
            .post_xml::<()>(ctx, &api, Receiver::Discard)
            .await?;
        tracing::debug!(job = name, "job created");

        self.job_get(ctx, name, 0).await
    }

    /// Fetch a job. `depth` (0 to [`MAX_JOB_DEPTH`]) expands nested references.
    pub async fn job_get(&self, ctx: &CallContext, name: &str, depth: u8) -> Result<Job> {
        if depth > MAX_JOB_DEPTH {
            return Err(JenkinsError::InvalidRequest(format!(
                "depth {depth} exceeds the maximum of {MAX_JOB_DEPTH}"
            )));
        }

        let mut api = ApiRequest::get(job_route(name)?);
        if depth != 0 {
            api = api.with_query("depth", depth.to_string());
        }
        self.get(ctx, &api).await
    }

    /// Delete a job.
    pub async fn job_delete(&self, ctx: &CallContext, name: &str) -> Result<()> {
        let api = ApiRequest::post(format!("{}/doDelete", job_route(name)?));
        self.processor.post::<()>(ctx, &api, Receiver::Discard).await?;
        tracing::debug!(job = name, "job deleted");
        Ok(())
    }

    /// Whether a top-level job called `name` exists.
    pub async fn job_exists(&self, ctx: &CallContext, name: &str) -> Result<bool> {
        let root = self.root_info(ctx).await?;
        Ok(root.job(name).is_some())
    }

    /// Whether a build of the job is waiting in the queue.
    pub async fn job_in_queue(&self, ctx: &CallContext, name: &str) -> Result<bool> {
        Ok(self.job_get(ctx, name, 0).await?.in_queue)
    }

    /// Whether the job's latest build is running.
    pub async fn job_is_building(&self, ctx: &CallContext, name: &str) -> Result<bool> {
        Ok(self.job_get(ctx, name, 1).await?.is_building())
    }
}
