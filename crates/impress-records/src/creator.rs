//! Creator representation

use serde::{Deserialize, Serialize};

/// Role a creator plays for a record
///
/// Serialized with the source library's role names (`author`, `editor`,
/// `seriesEditor`, `translator`, `contributor`, ...). Any role not listed
/// here round-trips through `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum CreatorRole {
    Author,
    Editor,
    SeriesEditor,
    Translator,
    Contributor,
    Other(String),
}

impl CreatorRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Author => "author",
            Self::Editor => "editor",
            Self::SeriesEditor => "seriesEditor",
            Self::Translator => "translator",
            Self::Contributor => "contributor",
            Self::Other(role) => role,
        }
    }

    /// Editors and series editors share the editor bucket
    pub fn is_editor(&self) -> bool {
        matches!(self, Self::Editor | Self::SeriesEditor)
    }
}

impl From<&str> for CreatorRole {
    fn from(s: &str) -> Self {
        match s {
            "author" => Self::Author,
            "editor" => Self::Editor,
            "seriesEditor" => Self::SeriesEditor,
            "translator" => Self::Translator,
            "contributor" => Self::Contributor,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for CreatorRole {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<CreatorRole> for String {
    fn from(role: CreatorRole) -> Self {
        role.as_str().to_string()
    }
}

/// A person or organization credited on a record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct Creator {
    /// Family name, or the full name of a single-field creator
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "creatorType", default = "default_role")]
    pub role: CreatorRole,
}

fn default_role() -> CreatorRole {
    CreatorRole::Author
}

impl Creator {
    /// Create a creator with just a family name
    pub fn new(last_name: impl Into<String>, role: CreatorRole) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: None,
            role,
        }
    }

    /// Builder method to add a given name
    pub fn with_first_name(mut self, first: impl Into<String>) -> Self {
        self.first_name = Some(first.into());
        self
    }

    /// Format as "Last, First" for BibTeX name lists
    pub fn to_bibtex_format(&self) -> String {
        match self.first_name.as_deref().map(str::trim) {
            Some(first) if !first.is_empty() => format!("{}, {}", self.last_name.trim(), first),
            _ => self.last_name.trim().to_string(),
        }
    }
}

/// The creator role that counts as "author" for a given source item type
///
/// Most types credit authors; media and a handful of legal types credit
/// someone else first (a film's director, a program's programmer).
pub fn primary_creator_role(item_type: &str) -> CreatorRole {
    let role = match item_type {
        "artwork" => "artist",
        "audioRecording" => "performer",
        "bill" => "sponsor",
        "computerProgram" => "programmer",
        "film" | "radioBroadcast" | "tvBroadcast" | "videoRecording" => "director",
        "hearing" => "contributor",
        "interview" => "interviewee",
        "map" => "cartographer",
        "patent" => "inventor",
        "podcast" => "podcaster",
        "presentation" => "presenter",
        _ => "author",
    };
    CreatorRole::from(role)
}
