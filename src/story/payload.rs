use serde_json::{json, Value};

use crate::core::{
    errors::{AppError, AppResult},
    types::{Section, Story, StoryPayload, ThemePayload},
};

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_TITLE: &str = "Story";
pub const DEFAULT_FONT: &str = "Montserrat";
pub const DEFAULT_PRIMARY_COLOR: &str = "#00007a";

pub fn build_payload(story: &Story) -> StoryPayload {
    let mut ordered: Vec<&Section> = story.sections.iter().collect();
    ordered.sort_by_key(|section| (section.sort_order, section.id));

    StoryPayload {
        id: story.id,
        version: or_default(Some(story.version.as_str()), DEFAULT_VERSION),
        title: or_default(story.title.as_deref(), DEFAULT_TITLE),
        standfirst: story.standfirst.clone().unwrap_or_default(),
        theme: ThemePayload {
            font: or_default(story.theme_font.as_deref(), DEFAULT_FONT),
            primary_color: or_default(story.theme_primary_color.as_deref(), DEFAULT_PRIMARY_COLOR),
        },
        sections: ordered.into_iter().map(section_value).collect(),
    }
}

/// A section blob that no longer parses is replaced by a stub carrying only its type.
fn section_value(section: &Section) -> Value {
    match section.data.parse() {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(
                section_id = section.id,
                story_id = section.story_id,
                "section data is not valid JSON, emitting type-only stub: {err}"
            );
            json!({ "type": section.section_type })
        }
    }
}

fn or_default(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Snapshot text: two-space indented JSON, non-ASCII left unescaped, no trailing newline.
pub fn render_snapshot(payload: &StoryPayload) -> AppResult<String> {
    serde_json::to_string_pretty(payload)
        .map_err(|err| AppError::Internal(format!("failed to serialize story payload: {err}")))
}
