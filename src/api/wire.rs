//! Request and response bodies of the action protocol.

use serde::{Deserialize, Serialize};

/// The four server-side mutating verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Delete,
    Copy,
    Move,
    CreateFolder,
}

impl Action {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Delete => "delete",
            Action::Copy => "copy",
            Action::Move => "move",
            Action::CreateFolder => "create_folder",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/action`.
///
/// For copy and move `dest_path` is the destination directory; for
/// create_folder `source_path` is the parent directory and `dest_path` the new
/// folder's name; delete carries no destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
    pub source_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_path: Option<String>,
}

impl ActionRequest {
    pub fn delete(path: &str) -> Self {
        Self {
            action: Action::Delete,
            source_path: path.to_string(),
            dest_path: None,
        }
    }

    pub fn transfer(action: Action, source: &str, dest_dir: &str) -> Self {
        Self {
            action,
            source_path: source.to_string(),
            dest_path: Some(dest_dir.to_string()),
        }
    }

    pub fn create_folder(parent: &str, name: &str) -> Self {
        Self {
            action: Action::CreateFolder,
            source_path: parent.to_string(),
            dest_path: Some(name.to_string()),
        }
    }
}

/// Server acknowledgement of a mutating call.
///
/// The server answers with small JSON objects such as `{"status": "deleted"}`
/// or `{"info": "saved"}`; both fields are kept when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
}

impl Ack {
    /// Parse an acknowledgement body; anything that is not a JSON object
    /// still counts as a bare acknowledgement.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }
}
