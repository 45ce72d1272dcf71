//! Reusable annotations carrying characterization metadata

use serde::{Deserialize, Serialize};

/// Lowest accepted importance
pub const MIN_IMPORTANCE: u8 = 1;
/// Highest accepted importance
pub const MAX_IMPORTANCE: u8 = 5;
/// Importance assigned when none is given
pub const DEFAULT_IMPORTANCE: u8 = 3;

/// Closed set of tag kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagType {
    /// Character trait
    Personality,
    /// Emotional state
    Emotion,
    /// Relationship between characters
    Relationship,
    /// Place
    Location,
    /// Narrative context
    Context,
    /// Anything else
    Custom,
}

/// Tag metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TagMetadata {
    /// 1 (minor) to 5 (central)
    pub importance: u8,
    /// Voice notes for the character
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_voice: Option<String>,
    /// Pacing notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_pacing: Option<String>,
}

impl Default for TagMetadata {
    fn default() -> Self {
        Self {
            importance: DEFAULT_IMPORTANCE,
            character_voice: None,
            narrative_pacing: None,
        }
    }
}

/// A tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Tag {
    /// Tag identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Tag kind
    #[serde(rename = "type")]
    pub tag_type: TagType,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Metadata
    #[serde(default)]
    pub metadata: TagMetadata,
}

impl Tag {
    /// Whether the importance lies in the accepted range
    #[inline]
    #[must_use]
    pub fn has_valid_importance(&self) -> bool {
        (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(&self.metadata.importance)
    }
}
