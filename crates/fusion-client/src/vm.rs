//! VM and power-action types

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Placeholder shown when the API omits an id or path
pub const UNKNOWN: &str = "Unknown";

/// A power state change supported by the Fusion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    /// Power the VM on
    On,
    /// Power the VM off
    Off,
    /// Suspend the VM to disk
    Suspend,
    /// Pause the running VM
    Pause,
    /// Resume a paused VM
    Unpause,
    /// Hard reset the VM
    Reset,
}

impl PowerAction {
    /// Every supported action, in the order the API documents them
    pub const ALL: [PowerAction; 6] = [
        PowerAction::On,
        PowerAction::Off,
        PowerAction::Suspend,
        PowerAction::Pause,
        PowerAction::Unpause,
        PowerAction::Reset,
    ];

    /// The path segment used for this action
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Suspend => "suspend",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::Reset => "reset",
        }
    }

    /// Comma separated list of valid action names
    #[must_use]
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PowerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerAction {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ClientError::InvalidAction {
                action: s.to_string(),
            })
    }
}

/// One entry from the VM listing
///
/// The entry is kept as the object the API sent, so it serializes back
/// unchanged. `id` and `path` are read from it on demand and may hold any
/// JSON value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VmSummary {
    fields: Map<String, Value>,
}

impl VmSummary {
    /// Create a summary with just an id and path
    #[must_use]
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::String(id.into()));
        fields.insert("path".to_string(), Value::String(path.into()));
        Self { fields }
    }

    /// VM identifier used in API paths
    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.fields.get("id")
    }

    /// Path to the VM's `.vmx` file
    #[must_use]
    pub fn path(&self) -> Option<&Value> {
        self.fields.get("path")
    }

    /// Every field of the entry, in API order
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The id for display, or `Unknown` when absent
    #[must_use]
    pub fn id_or_unknown(&self) -> Cow<'_, str> {
        text_or_unknown(self.id())
    }

    /// The path for display, or `Unknown` when absent
    #[must_use]
    pub fn path_or_unknown(&self) -> Cow<'_, str> {
        text_or_unknown(self.path())
    }
}

impl From<Map<String, Value>> for VmSummary {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

// Strings print bare, other values as compact JSON
fn text_or_unknown(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(UNKNOWN),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Detailed VM information, in the key order the API returned it
pub type VmDetails = Map<String, Value>;

/// Result object of a power call
pub type PowerOutcome = Map<String, Value>;

/// Outcome reported when the API acknowledges a power call with an empty body
#[must_use]
pub fn default_power_outcome(action: PowerAction) -> PowerOutcome {
    let mut outcome = Map::new();
    outcome.insert("status".to_string(), Value::String("success".to_string()));
    outcome.insert(
        "action".to_string(),
        Value::String(action.as_str().to_string()),
    );
    outcome
}
