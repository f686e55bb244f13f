use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::document::RawDocument;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Gif,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Gif => "gif",
            Self::Video => "video",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "image" => Some(Self::Image),
            "gif" => Some(Self::Gif),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    /// `gif` when the url ends in `.gif` (any case), `image` otherwise.
    pub fn for_still_url(url: &str) -> Self {
        if url.to_ascii_lowercase().ends_with(".gif") {
            Self::Gif
        } else {
            Self::Image
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: i64,
    pub story_id: i64,
    #[serde(rename = "type")]
    pub section_type: String,
    pub data: RawDocument,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    #[serde(rename = "type")]
    pub section_type: String,
    pub data: RawDocument,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionUpdate {
    #[serde(default, rename = "type")]
    pub section_type: Option<String>,
    #[serde(default)]
    pub data: Option<RawDocument>,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: i64,
    pub title: Option<String>,
    pub version: String,
    pub standfirst: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStory {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub standfirst: Option<String>,
    #[serde(default)]
    pub theme_font: Option<String>,
    #[serde(default)]
    pub theme_primary_color: Option<String>,
    #[serde(default)]
    pub sections: Vec<NewSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub post_id: i64,
    pub kind: MediaKind,
    pub url: String,
    pub caption: Option<String>,
    pub alt_text: String,
    pub credit: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewMedia {
    pub kind: MediaKind,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt_text: String,
    #[serde(default)]
    pub credit: String,
    #[serde(default)]
    pub sort_order: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
    pub version: Option<String>,
    pub standfirst: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    pub sections_data: Option<RawDocument>,
    pub media: Vec<Media>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media: Vec<NewMedia>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub standfirst: Option<String>,
    #[serde(default)]
    pub theme_font: Option<String>,
    #[serde(default)]
    pub theme_primary_color: Option<String>,
    #[serde(default)]
    pub sections_data: Option<RawDocument>,
}

/// Partial post update. `media: Some(..)` replaces the whole media list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub media: Option<Vec<NewMedia>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemePayload {
    pub font: String,
    pub primary_color: String,
}

/// The snapshot file shape. Field order is the on-disk key order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoryPayload {
    pub id: i64,
    pub version: String,
    pub title: String,
    pub standfirst: String,
    pub theme: ThemePayload,
    pub sections: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoriesResponse {
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStoryResponse {
    pub deleted: bool,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSectionsResponse {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSectionResponse {
    pub deleted: bool,
    pub id: i64,
    pub story_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePostResponse {
    pub deleted: bool,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStoryResponse {
    pub story_id: i64,
    pub file_path: String,
    pub bytes: usize,
}

/// Offset pagination as accepted by the list operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const MAX_LIMIT: i64 = 500;

    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: skip.max(0),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: 100 }
    }
}
