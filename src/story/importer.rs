//! Turns an external story document into records ready to persist.
//!
//! Three shapes are produced from the same document:
//!   structured  → one [`NewStory`] whose sections keep each node verbatim
//!   per-section → one [`NewPost`] per node with that node's text and media
//!   merged      → one [`NewPost`] with all text and globally ordered media

use std::path::Path;

use serde_json::{Map, Value};

use crate::{
    core::{
        document::RawDocument,
        errors::{AppError, AppResult},
        types::{NewPost, NewSection, NewStory},
    },
    story::{
        collator::{collate, collate_local},
        interpreter::{classify, Extraction},
        payload::{DEFAULT_TITLE, DEFAULT_VERSION},
    },
};

const UNKNOWN_SECTION_TYPE: &str = "unknown";
const TEXT_SEPARATOR: &str = "\n\n";

/// Top-level fields of a story document. Section nodes stay untyped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryDocument {
    pub title: Option<String>,
    pub standfirst: Option<String>,
    pub version: Option<String>,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    pub sections: Vec<Value>,
}

pub fn read_source(path: &Path) -> AppResult<String> {
    if !path.is_file() {
        return Err(AppError::NotFound(format!(
            "story document {}",
            path.display()
        )));
    }
    let bytes = std::fs::read(path)
        .map_err(|err| AppError::Io(format!("cannot read {}: {err}", path.display())))?;
    String::from_utf8(bytes).map_err(|err| AppError::InvalidDocument(format!("invalid UTF-8: {err}")))
}

pub fn parse_document(raw: &str) -> AppResult<StoryDocument> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidDocument(format!("invalid JSON: {err}")))?;
    let Value::Object(root) = value else {
        return Err(AppError::InvalidDocument(
            "story document must be a JSON object".to_string(),
        ));
    };

    let theme = root.get("theme").and_then(Value::as_object);
    Ok(StoryDocument {
        title: str_field(&root, "title"),
        standfirst: str_field(&root, "standfirst"),
        version: str_field(&root, "version"),
        theme_font: theme.and_then(|t| str_field(t, "font")),
        theme_primary_color: theme.and_then(|t| str_field(t, "primaryColor")),
        sections: root
            .get("sections")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    })
}

fn str_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(ToString::to_string)
}

impl StoryDocument {
    pub fn to_new_story(&self) -> NewStory {
        NewStory {
            title: Some(
                self.title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            ),
            version: Some(self.version_or_default()),
            standfirst: Some(self.standfirst.clone().unwrap_or_default()),
            theme_font: self.theme_font.clone(),
            theme_primary_color: self.theme_primary_color.clone(),
            sections: self
                .sections
                .iter()
                .enumerate()
                .map(|(index, node)| NewSection {
                    section_type: node
                        .get("type")
                        .and_then(Value::as_str)
                        .unwrap_or(UNKNOWN_SECTION_TYPE)
                        .to_string(),
                    data: RawDocument::from_value(node),
                    sort_order: Some(index as i64),
                })
                .collect(),
        }
    }

    /// Empty fragments are joined as-is here, unlike [`Self::to_merged_post`].
    pub fn to_section_posts(&self) -> Vec<NewPost> {
        self.sections
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let extraction = classify(node).extract();
                let content = extraction.fragments.join(TEXT_SEPARATOR);
                NewPost {
                    title: self
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Section {}", index + 1)),
                    content: Some(content).filter(|c| !c.is_empty()),
                    media: collate_local(&extraction),
                    ..NewPost::default()
                }
            })
            .collect()
    }

    pub fn to_merged_post(&self) -> NewPost {
        let standfirst = self.standfirst.clone().unwrap_or_default();
        let kinds: Vec<_> = self.sections.iter().map(classify).collect();
        let extractions: Vec<Extraction> = kinds.iter().map(|kind| kind.extract()).collect();

        let mut parts = Vec::with_capacity(kinds.len() + 1);
        if !standfirst.is_empty() {
            parts.push(standfirst.clone());
        }
        parts.extend(kinds.iter().filter_map(|kind| kind.merged_text()));
        let merged = parts
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(TEXT_SEPARATOR);

        NewPost {
            title: self
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            content: Some(merged).filter(|c| !c.is_empty()),
            author: None,
            created_at: None,
            media: collate(&extractions),
            version: Some(self.version_or_default()),
            standfirst: Some(standfirst),
            theme_font: self.theme_font.clone(),
            theme_primary_color: self.theme_primary_color.clone(),
            sections_data: Some(RawDocument::from_value(&Value::Array(self.sections.clone()))),
        }
    }

    fn version_or_default(&self) -> String {
        self.version
            .clone()
            .unwrap_or_else(|| DEFAULT_VERSION.to_string())
    }
}
