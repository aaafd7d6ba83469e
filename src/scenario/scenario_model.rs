use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::capture::capture_model::CapturedCredential;

/// A recorded page session to replay against the capture engine.
/// Deserialized from YAML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Human-readable name for this scenario
    pub name: String,

    /// Main document first, then any sub-frames
    pub frames: Vec<FrameSpec>,
}

/// One document (main page or sub-frame) and what happens to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSpec {
    /// Page URL, reported as the credential origin
    pub url: String,

    /// Elements present when the document becomes ready
    #[serde(default)]
    pub tree: Vec<NodeSpec>,

    /// Ordered page activity after the document is ready
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Captures the sink should receive, in order
    #[serde(default)]
    pub expect: Vec<ExpectedCapture>,
}

/// An element and its subtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeSpec {
    pub tag: String,

    /// Element id, used by steps to refer to this node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attrs: HashMap<String, String>,

    /// Current value of a form control
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

/// A single piece of page activity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Build `node` off-document, then append it under `parent` (the root when absent)
    Insert {
        #[serde(default)]
        parent: Option<String>,
        node: NodeSpec,
    },

    /// Detach an element from the document
    Remove { target: String },

    /// Change a form control's current value
    SetValue { target: String, value: String },

    /// Submit a form
    Submit { form: String },

    /// Remove the capture engine from the page
    Detach,
}

/// What one sink call should carry. Absent parts are not checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ExpectedCapture {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Entries that must be present in the field snapshot
    #[serde(default)]
    pub fields: Option<HashMap<String, String>>,
}

/// Outcome of replaying one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    pub url: String,

    /// Whether the capture engine was installed in this frame
    pub observed: bool,

    /// Everything the sink received, in order
    pub captures: Vec<CapturedCredential>,

    /// Differences between expected and actual captures
    pub mismatches: Vec<String>,
}

/// Outcome of replaying a complete scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub frames: Vec<FrameResult>,

    /// Set when replay stopped before the end
    pub error: Option<String>,
}

impl ScenarioResult {
    pub fn capture_count(&self) -> usize {
        self.frames.iter().map(|f| f.captures.len()).sum()
    }
}
