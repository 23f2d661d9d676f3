use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use super::BuildBrief;
use crate::error::{JenkinsError, Result};

/// A build as returned by `/job/{name}/{number}/api/json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Build {
    /// Actions attached to the build: causes, parameters, SCM data, ...
    pub actions: Vec<BuildAction>,
    /// Archived artifacts.
    pub artifacts: Vec<Artifact>,
    /// Whether the build is still running.
    pub building: bool,
    /// Node the build ran on; empty for the built-in node.
    pub built_on: String,
    /// Changes included in this build.
    pub change_set: ChangeSet,
    /// Users whose changes are in this build.
    pub culprits: Vec<Culprit>,
    /// Build description, `null` when unset.
    pub description: Value,
    /// Duration in milliseconds; 0 while running.
    pub duration: u64,
    /// Estimated duration in milliseconds; `-1` when unknown.
    pub estimated_duration: i64,
    /// Executor running the build, `null` once finished.
    pub executor: Value,
    /// `job #number`.
    pub full_display_name: String,
    /// Build id, the number as text.
    pub id: String,
    /// Whether the build is kept forever.
    pub keep_log: bool,
    /// Build number.
    pub number: u64,
    /// Id of the queue item that started this build.
    pub queue_id: u64,
    /// `SUCCESS`, `UNSTABLE`, `FAILURE`, `ABORTED`; `None` while running.
    pub result: Option<String>,
    /// Start time, milliseconds since the epoch.
    pub timestamp: u64,
    /// Build URL.
    pub url: String,
    /// Maven module artifacts (Maven jobs only).
    pub maven_artifacts: Value,
    /// Maven version used (Maven jobs only).
    pub maven_version_used: Option<String>,
    /// Matrix runs (matrix jobs only).
    pub runs: Vec<BuildBrief>,
}

impl Build {
    /// All causes recorded by the build's actions.
    pub fn causes(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.actions.iter().flat_map(|action| action.causes.iter())
    }

    /// All parameters the build was started with.
    pub fn parameters(&self) -> impl Iterator<Item = &BuildParameter> {
        self.actions.iter().flat_map(|action| action.parameters.iter())
    }
}

/// An archived artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Artifact {
    /// Display path, `null` when it equals the file name.
    pub display_path: Option<String>,
    /// File name.
    pub file_name: String,
    /// Path relative to the archive root.
    pub relative_path: String,
}

/// The changes that went into a build.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSet {
    /// Individual commits.
    pub items: Vec<ChangeSetItem>,
    /// SCM kind, e.g. `git`.
    pub kind: Option<String>,
    /// Module revisions (Subversion).
    #[serde(rename = "revision")]
    pub revisions: Vec<ChangeSetRevision>,
}

/// One commit of a change set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeSetItem {
    /// Paths touched by the commit.
    pub affected_paths: Vec<String>,
    /// Commit author.
    pub author: Option<ChangeAuthor>,
    /// Full commit message.
    pub comment: String,
    /// Commit id.
    pub commit_id: String,
    /// Commit date as sent by the SCM plugin.
    pub date: String,
    /// SCM-specific id.
    pub id: String,
    /// Commit summary.
    pub msg: String,
    /// Paths with their edit type.
    pub paths: Vec<ChangePath>,
    /// Commit time, milliseconds since the epoch.
    pub timestamp: u64,
}

/// Author of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeAuthor {
    /// User page URL.
    pub absolute_url: String,
    /// Full name.
    pub full_name: String,
}

/// A path touched by a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePath {
    /// `add`, `edit` or `delete`.
    pub edit_type: String,
    /// File path.
    pub file: String,
}

/// A module revision in a change set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeSetRevision {
    /// Module path.
    pub module: String,
    /// Revision number.
    pub revision: u64,
}

/// A user blamed for a build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Culprit {
    /// User page URL.
    pub absolute_url: String,
    /// Full name.
    pub full_name: String,
}

/// A build action. Jenkins mixes many action kinds in one list; fields of
/// other kinds are simply left at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildAction {
    /// Build parameters (parameters action).
    pub parameters: Vec<BuildParameter>,
    /// Build causes (cause action).
    pub causes: Vec<Map<String, Value>>,
    /// Builds per branch (git build data).
    pub builds_by_branch_name: HashMap<String, BranchBuild>,
    /// Last built revision (git build data).
    pub last_built_revision: Option<Revision>,
    /// Remote repository URLs (git build data).
    pub remote_urls: Vec<String>,
    /// SCM name (git build data).
    pub scm_name: Option<String>,
    /// Node name (Mercurial).
    pub mercurial_node_name: Option<String>,
    /// Revision number (Mercurial).
    pub mercurial_revision_number: Option<String>,
    /// Sub-directory (Mercurial), shape varies.
    pub subdir: Value,
    /// Test count (test result action).
    pub total_count: u64,
    /// Action URL name.
    pub url_name: Option<String>,
}

/// A parameter a build was started with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildParameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value; its type depends on the parameter kind.
    pub value: Value,
}

/// A git branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    /// Commit hash.
    #[serde(rename = "SHA1")]
    pub sha1: String,
    /// Branch name.
    pub name: String,
}

/// A git revision with the branches pointing at it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Revision {
    /// Commit hash.
    #[serde(rename = "SHA1")]
    pub sha1: String,
    /// Branches at this revision.
    pub branch: Vec<Branch>,
}

/// Last build of a branch, from git build data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchBuild {
    /// Build number.
    pub build_number: u64,
    /// Build result, shape varies.
    pub build_result: Value,
    /// Marked revision.
    pub marked: Revision,
    /// Built revision.
    pub revision: Revision,
}

/// Acknowledgement of a triggered build.
///
/// Jenkins answers `POST /job/{name}/build` with `201 Created` and a
/// `Location` pointing at the queue item, e.g.
/// `http://ci/queue/item/42/`. The build number is not known yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInvoked {
    /// Queue item URL.
    pub url: Url,
    /// Queue item id.
    pub queue_id: u64,
}

fn queue_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"queue/item/(?P<id>[0-9]+)/").expect("valid queue item pattern"))
}

impl BuildInvoked {
    /// Parse a queue item location.
    ///
    /// # Examples
    ///
    /// ```
    /// use jenkins_client::types::BuildInvoked;
    /// use url::Url;
    ///
    /// let url = Url::parse("http://ci/queue/item/42/").unwrap();
    /// let invoked = BuildInvoked::from_url(url).unwrap();
    /// assert_eq!(invoked.queue_id, 42);
    /// ```
    pub fn from_url(url: Url) -> Result<Self> {
        let id = queue_item_pattern()
            .captures(url.path())
            .and_then(|captures| captures.name("id"))
            .map(|id| id.as_str().to_string())
            .ok_or_else(|| JenkinsError::InvalidQueueLocation(url.to_string()))?;

        let queue_id = id
            .parse()
            .map_err(|_| JenkinsError::InvalidQueueLocation(url.to_string()))?;

        Ok(BuildInvoked { url, queue_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_invoked_from_url() {
        let url = Url::parse("http://ci.local/queue/item/42/").unwrap();
        let invoked = BuildInvoked::from_url(url.clone()).unwrap();
        assert_eq!(invoked.queue_id, 42);
        assert_eq!(invoked.url, url);
    }

    #[test]
    fn test_build_invoked_under_context_path() {
        let url = Url::parse("https://ci.local/jenkins/queue/item/7/").unwrap();
        assert_eq!(BuildInvoked::from_url(url).unwrap().queue_id, 7);
    }

    #[test]
    fn test_build_invoked_rejects_other_locations() {
        for location in [
            "http://ci.local/job/demo/",
            "http://ci.local/queue/item/abc/",
            "http://ci.local/queue/item/42",
            "http://ci.local/queue/item/99999999999999999999999/",
        ] {
            let err = BuildInvoked::from_url(Url::parse(location).unwrap()).unwrap_err();
            assert!(matches!(err, JenkinsError::InvalidQueueLocation(_)), "{location}");
        }
    }

    #[test]
    fn test_decode_build() {
        let build: Build = serde_json::from_str(
            r##"{
                "_class": "hudson.model.FreeStyleBuild",
                "actions": [
                    {"_class": "hudson.model.CauseAction", "causes": [{"_class": "hudson.model.Cause$UserIdCause", "shortDescription": "Started by user admin", "userId": "admin"}]},
                    {},
                    {"_class": "hudson.model.ParametersAction", "parameters": [{"name": "DRY_RUN", "value": false}]},
                    {"_class": "hudson.plugins.git.util.BuildData",
                     "buildsByBranchName": {"refs/remotes/origin/main": {"buildNumber": 5, "buildResult": null,
                        "marked": {"SHA1": "abc", "branch": [{"SHA1": "abc", "name": "refs/remotes/origin/main"}]},
                        "revision": {"SHA1": "abc", "branch": [{"SHA1": "abc", "name": "refs/remotes/origin/main"}]}}},
                     "lastBuiltRevision": {"SHA1": "abc", "branch": [{"SHA1": "abc", "name": "refs/remotes/origin/main"}]},
                     "remoteUrls": ["https://example.com/repo.git"], "scmName": ""}
                ],
                "artifacts": [{"displayPath": null, "fileName": "out.txt", "relativePath": "out.txt"}],
                "building": false,
                "description": null,
                "displayName": "#5",
                "duration": 3051,
                "estimatedDuration": -1,
                "executor": null,
                "fullDisplayName": "demo #5",
                "id": "5",
                "keepLog": false,
                "number": 5,
                "queueId": 42,
                "result": "SUCCESS",
                "timestamp": 1700000000000,
                "url": "http://ci/job/demo/5/",
                "builtOn": "",
                "changeSet": {"_class": "hudson.plugins.git.GitChangeSetList", "items": [
                    {"affectedPaths": ["README.md"], "author": {"absoluteUrl": "http://ci/user/dev", "fullName": "dev"},
                     "comment": "docs\n", "commitId": "abc", "date": "2024-01-01 00:00:00 +0000", "id": "abc",
                     "msg": "docs", "paths": [{"editType": "edit", "file": "README.md"}], "timestamp": 1700000000000}],
                    "kind": "git"},
                "culprits": [{"absoluteUrl": "http://ci/user/dev", "fullName": "dev"}]
            }"##,
        )
        .unwrap();

        assert_eq!(build.number, 5);
        assert_eq!(build.queue_id, 42);
        assert_eq!(build.estimated_duration, -1);
        assert_eq!(build.result.as_deref(), Some("SUCCESS"));
        assert_eq!(build.causes().count(), 1);
        assert_eq!(build.parameters().next().map(|p| &p.value), Some(&Value::Bool(false)));
        assert_eq!(build.change_set.items[0].paths[0].edit_type, "edit");
        assert_eq!(build.culprits[0].full_name, "dev");
        assert_eq!(
            build.actions[3].builds_by_branch_name["refs/remotes/origin/main"].build_number,
            5
        );
        assert!(build.artifacts[0].display_path.is_none());
    }
}
