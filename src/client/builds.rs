//! Build operations.

use serde::Deserialize;

use super::{job_route, JenkinsClient};
use crate::error::{JenkinsError, Result};
use crate::request::{ApiRequest, CallContext, DumpMethod, Receiver};
use crate::types::{Build, BuildInvoked};

/// Field projection for the build list scanned by `build_get_by_queue_id`.
const BUILD_LIST_TREE: &str = "builds[id,queueId,url]";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BuildList {
    builds: Vec<BuildSummary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BuildSummary {
    id: String,
    queue_id: u64,
}

impl BuildList {
    /// Number of the build started from `queue_id`, if it is in the list.
    fn number_for_queue_id(&self, queue_id: u64) -> Result<Option<u64>> {
        match self.builds.iter().find(|build| build.queue_id == queue_id) {
            Some(build) => build
                .id
                .parse()
                .map(Some)
                .map_err(|_| JenkinsError::InvalidBuildId(build.id.clone())),
            None => Ok(None),
        }
    }
}

impl JenkinsClient {
    /// Trigger a parameterless build.
    ///
    /// Returns as soon as Jenkins has queued the build; the build number is
    /// assigned later and can be found with
    /// [`build_get_by_queue_id`](Self::build_get_by_queue_id).
    pub async fn build_invoke(&self, ctx: &CallContext, name: &str) -> Result<BuildInvoked> {
        let api = ApiRequest::post(format!("{}/build", job_route(name)?))
            .with_dump(DumpMethod::Location);

        let location = self
            .processor
            .post::<()>(ctx, &api, Receiver::Decode)
            .await?
            .into_location()?;

        let invoked = BuildInvoked::from_url(location)?;
        tracing::debug!(job = name, queue_id = invoked.queue_id, "build queued");
        Ok(invoked)
    }

    /// Fetch a build by its number.
    pub async fn build_get_by_number(
        &self,
        ctx: &CallContext,
        name: &str,
        number: u64,
    ) -> Result<Build> {
        let api = ApiRequest::get(format!("{}/{number}", job_route(name)?));
        self.get(ctx, &api).await
    }

    /// Fetch the build that was started from queue item `queue_id`.
    ///
    /// Lists the job's builds, finds the one with the queue id, then fetches
    /// it by number. Fails with [`JenkinsError::BuildNotFound`] when no build
    /// has left the queue for that id yet.
    pub async fn build_get_by_queue_id(
        &self,
        ctx: &CallContext,
        name: &str,
        queue_id: u64,
    ) -> Result<Build> {
        let api = ApiRequest::get(job_route(name)?).with_query("tree", BUILD_LIST_TREE);
        let list: BuildList = self.get(ctx, &api).await?;

        let number = list
            .number_for_queue_id(queue_id)?
            .ok_or_else(|| JenkinsError::BuildNotFound {
                job: name.to_string(),
                queue_id,
            })?;

        self.build_get_by_number(ctx, name, number).await
    }
}
