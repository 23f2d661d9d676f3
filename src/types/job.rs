use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A job as returned by `/job/{name}/api/json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Job {
    /// Plugin-contributed actions.
    pub actions: Vec<Value>,
    /// Whether new builds can be scheduled.
    pub buildable: bool,
    /// Build history, newest first.
    pub builds: Vec<BuildBrief>,
    /// Status ball color, e.g. `blue`, `red`, `notbuilt`, `blue_anime`.
    pub color: Option<String>,
    /// Whether builds may run concurrently.
    pub concurrent_build: bool,
    /// Job description.
    pub description: Option<String>,
    /// Display name.
    pub display_name: String,
    /// Explicit display name, `null` when unset.
    pub display_name_or_null: Value,
    /// Jobs triggered by this one.
    pub downstream_projects: Vec<JobBrief>,
    /// Oldest retained build.
    pub first_build: Option<BuildBrief>,
    /// Health summaries.
    pub health_report: Vec<HealthReport>,
    /// Whether a build of this job is waiting in the queue.
    pub in_queue: bool,
    /// Whether dependencies' builds are kept.
    pub keep_dependencies: bool,
    /// Latest build.
    pub last_build: Option<BuildBrief>,
    /// Latest finished build.
    pub last_completed_build: Option<BuildBrief>,
    /// Latest failed build.
    pub last_failed_build: Option<BuildBrief>,
    /// Latest stable build.
    pub last_stable_build: Option<BuildBrief>,
    /// Latest successful build.
    pub last_successful_build: Option<BuildBrief>,
    /// Latest unstable build.
    pub last_unstable_build: Option<BuildBrief>,
    /// Latest unsuccessful build.
    pub last_unsuccessful_build: Option<BuildBrief>,
    /// Job name.
    pub name: String,
    /// Number the next build will get.
    pub next_build_number: u64,
    /// Job properties, including parameter definitions.
    pub property: Vec<JobProperty>,
    /// Pending queue item, `null` when not queued.
    pub queue_item: Value,
    /// SCM configuration.
    pub scm: Value,
    /// Jobs that trigger this one.
    pub upstream_projects: Vec<JobBrief>,
    /// Job URL.
    pub url: String,
}

impl Job {
    /// Whether the latest build is still running.
    ///
    /// Needs a job fetched with `depth >= 1`; at depth 0 Jenkins only sends
    /// build numbers and URLs.
    pub fn is_building(&self) -> bool {
        self.last_build
            .as_ref()
            .and_then(|build| build.building)
            .unwrap_or(false)
    }

    /// All parameter definitions across the job's properties.
    pub fn parameter_definitions(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.property
            .iter()
            .flat_map(|property| property.parameter_definitions.iter())
    }
}

/// Short reference to a job, as listed by the root and by dependency lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobBrief {
    /// Job name.
    pub name: String,
    /// Job URL.
    pub url: String,
    /// Status ball color; absent for folders.
    pub color: Option<String>,
}

/// Short reference to a build.
///
/// At depth 0 only `number` and `url` are present; deeper fetches expand the
/// reference and fill `building` and `result`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildBrief {
    /// Build number.
    pub number: u64,
    /// Build URL.
    pub url: String,
    /// Whether the build is running, when expanded.
    pub building: Option<bool>,
    /// Build result, when expanded and finished.
    pub result: Option<String>,
}

/// One entry of a job's health report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthReport {
    /// Human readable summary.
    pub description: String,
    /// Icon CSS class.
    pub icon_class_name: String,
    /// Icon URL.
    pub icon_url: String,
    /// Health score, 0 to 100.
    pub score: u32,
}

/// A job property. Only parameter definitions are typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobProperty {
    /// Build parameters declared by this property.
    pub parameter_definitions: Vec<ParameterDefinition>,
}

/// A declared build parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterDefinition {
    /// Default value, if the parameter has one.
    pub default_parameter_value: Option<ParameterValue>,
    /// Parameter description.
    pub description: Option<String>,
    /// Parameter name.
    pub name: String,
    /// Parameter type, e.g. `BooleanParameterDefinition`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A parameter value; its type depends on the parameter kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterValue {
    /// Parameter name.
    pub name: String,
    /// Value, a string, boolean or number.
    pub value: Value,
}
