use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier rule shared by [`Namespace`] and [`NoteId`].
///
/// Both values end up embedded in object keys of the form
/// `<namespace>/notebook/<noteId>/note.json`, so neither may carry path
/// separators or dot components that would let a caller escape its
/// prefix.
fn valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= 128
        && id != "."
        && id != ".."
        && !id.contains('/')
        && !id.contains('\\')
        && !id.chars().any(char::is_control)
}

/// Per-user/tenant prefix under which all of that user's notes live.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    pub fn new(id: String) -> Option<Self> {
        if valid_identifier(&id) { Some(Self(id)) } else { None }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Namespace {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid namespace: {s:?}"))
    }
}

impl TryFrom<String> for Namespace {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("invalid namespace: {value:?}"))
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

/// Unique note identifier.
///
/// Deserialization runs the same validation as [`NoteId::new`], so a
/// stored document whose embedded id would escape the namespace prefix
/// fails to decode instead of producing an unreachable key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: String) -> Option<Self> {
        if valid_identifier(&id) { Some(Self(id)) } else { None }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NoteId {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string()).ok_or_else(|| anyhow::anyhow!("Invalid note id: {s:?}"))
    }
}

impl TryFrom<String> for NoteId {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.clone()).ok_or_else(|| format!("invalid note id: {value:?}"))
    }
}

impl From<NoteId> for String {
    fn from(id: NoteId) -> Self {
        id.0
    }
}

/// Execution state of a single paragraph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ParagraphStatus {
    #[default]
    Ready,
    Pending,
    Running,
    Completed,
    Error,
    Abort,
}

impl ParagraphStatus {
    /// A persisted `PENDING` or `RUNNING` status reflects an execution
    /// that never finished (e.g. the interpreter process died mid-run).
    pub fn is_interrupted(self) -> bool {
        matches!(self, Self::Pending | Self::Running)
    }
}

/// One executable unit within a note.
///
/// Only `status` is reconciled by the storage layer; every other field
/// a stored document carries is preserved verbatim through the
/// flattened `extra` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub status: ParagraphStatus,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Paragraph {
    pub fn with_status(status: ParagraphStatus) -> Self {
        Self {
            id: None,
            title: None,
            text: None,
            status,
            extra: serde_json::Map::new(),
        }
    }
}

/// A persisted note: an ordered sequence of paragraphs owned by exactly
/// one object in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub name: String,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Note {
    pub fn new(id: NoteId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            paragraphs: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Rewrites every interrupted paragraph status to `ABORT` and
    /// returns how many paragraphs changed.
    ///
    /// Applied in memory on every read path; never written back to the
    /// store as part of the same read.
    pub fn abort_interrupted(&mut self) -> usize {
        let mut aborted = 0;
        for paragraph in &mut self.paragraphs {
            if paragraph.status.is_interrupted() {
                paragraph.status = ParagraphStatus::Abort;
                aborted += 1;
            }
        }
        aborted
    }
}

/// Summary projection of a note used for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteInfo {
    pub id: NoteId,
    pub name: String,
}

impl From<&Note> for NoteInfo {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            name: note.name.clone(),
        }
    }
}

/// A named checkpoint of a note.
///
/// No storage backend in this workspace implements checkpointing; the
/// type exists so the repository surface can signal `Unsupported` with
/// a concrete return shape instead of a silent null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: String,
    pub message: String,
    pub timestamp: i64,
}

/// One settings entry exposed by a repository backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSettingsInfo {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}
