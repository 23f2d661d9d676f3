//! Plugin management.

use super::{require_name, JenkinsClient};
use crate::error::{JenkinsError, Result};
use crate::request::{ApiRequest, CallContext, Receiver};

impl JenkinsClient {
    /// Install the latest version of a plugin.
    ///
    /// Jenkins does not let a specific version be requested this way, so the
    /// directive always asks for `@current`.
    pub async fn plugin_install(&self, ctx: &CallContext, name: &str) -> Result<()> {
        let api = ApiRequest::post("/pluginManager/uploadPlugin").with_body(install_directive(name)?);
        self.processor.post_xml::<()>(ctx, &api, Receiver::Discard).await?;
        tracing::debug!(plugin = name, "plugin installation requested");
        Ok(())
    }
}

fn install_directive(name: &str) -> Result<String> {
    let name = require_name("plugin", name)?;
    if name.chars().any(|c| matches!(c, '"' | '<' | '>' | '&' | '\'')) {
        return Err(JenkinsError::InvalidRequest(format!("invalid plugin name '{name}'")));
    }
    Ok(format!(r#"<jenkins><install plugin="{name}@current" /></jenkins>"#))
}
