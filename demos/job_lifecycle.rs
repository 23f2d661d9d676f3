//! Job lifecycle example
//!
//! Creates a job, triggers a build, waits for it to leave the queue, prints
//! the result and deletes the job again.
//!
//! Run with:
//!   JENKINS_URL=http://localhost:8080 JENKINS_USER=admin JENKINS_API_TOKEN=... \
//!   cargo run --example job_lifecycle

use std::time::Duration;

use anyhow::Context;
use jenkins_client::{CallContext, ClientConfig, JenkinsClient};

const JOB_NAME: &str = "jenkins-client-demo";

const JOB_CONFIG: &str = r#"<?xml version='1.1' encoding='UTF-8'?>
<project>
  <description>Created by the jenkins_client job_lifecycle example</description>
  <keepDependencies>false</keepDependencies>
  <canRoam>true</canRoam>
  <disabled>false</disabled>
  <builders>
    <hudson.tasks.Shell>
      <command>echo hello from jenkins_client</command>
    </hudson.tasks.Shell>
  </builders>
</project>"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("Jenkins Job Lifecycle Example");
    println!("=============================\n");

    let config = ClientConfig::from_env().context("loading Jenkins settings")?;
    let client = JenkinsClient::new(&config)?;
    let ctx = CallContext::with_timeout(Duration::from_secs(120));

    let root = client.root_info(&ctx).await?;
    println!(
        "Connected to {} ({} executors, crumbs {})",
        config.base_url,
        root.num_executors,
        if root.use_crumbs { "on" } else { "off" }
    );

    if client.job_exists(&ctx, JOB_NAME).await? {
        println!("Removing leftover job {JOB_NAME}");
        client.job_delete(&ctx, JOB_NAME).await?;
    }

    let job = client.job_create(&ctx, JOB_NAME, JOB_CONFIG).await?;
    println!("Created {} at {}", job.name, job.url);

    let invoked = client.build_invoke(&ctx, JOB_NAME).await?;
    println!("Build queued as item {}", invoked.queue_id);

    let build = loop {
        match client
            .build_get_by_queue_id(&ctx, JOB_NAME, invoked.queue_id)
            .await
        {
            Ok(build) if !build.building => break build,
            Ok(build) => println!("  build #{} running", build.number),
            Err(e) if e.is_not_found() => println!("  still queued"),
            Err(e) => return Err(e.into()),
        }
        tokio::time::sleep(Duration::from_secs(2)).await;
    };
    println!(
        "Build #{} finished: {}",
        build.number,
        build.result.as_deref().unwrap_or("UNKNOWN")
    );

    client.job_delete(&ctx, JOB_NAME).await?;
    println!("Deleted {JOB_NAME}");

    Ok(())
}
