use serde_json::json;
use storyline_lib::{
    core::{
        document::RawDocument,
        types::{NewSection, NewStory},
    },
    db::{repositories::stories, Database},
    story::payload::{build_payload, render_snapshot},
};

fn raw_section(section_type: &str, data: &str, sort_order: i64) -> NewSection {
    NewSection {
        section_type: section_type.to_string(),
        data: RawDocument::from_text(data),
        sort_order: Some(sort_order),
    }
}

#[tokio::test]
async fn payload_fills_defaults_for_blank_fields() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            title: Some(String::new()),
            version: Some(String::new()),
            theme_font: Some(String::new()),
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    let payload = build_payload(&story);
    assert_eq!(payload.id, story.id);
    assert_eq!(payload.title, "Story");
    assert_eq!(payload.version, "1.0");
    assert_eq!(payload.standfirst, "");
    assert_eq!(payload.theme.font, "Montserrat");
    assert_eq!(payload.theme.primary_color, "#00007a");
    assert!(payload.sections.is_empty());
}

#[tokio::test]
async fn payload_orders_sections_and_degrades_broken_blobs() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            title: Some("Tides".to_string()),
            sections: vec![
                raw_section("video", r#"{"type":"video","src":"v.mp4"}"#, 3),
                raw_section("paragraph", "{not json", 1),
                raw_section("spacer", "", 2),
            ],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    let payload = build_payload(&story);
    assert_eq!(payload.sections.len(), story.sections.len());
    assert_eq!(payload.sections[0], json!({"type": "paragraph"}));
    assert_eq!(payload.sections[1], json!({}));
    assert_eq!(payload.sections[2], json!({"type": "video", "src": "v.mp4"}));
}

#[tokio::test]
async fn rendered_snapshot_is_pretty_and_keeps_key_order() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            title: Some("Été".to_string()),
            standfirst: Some("Chaleur".to_string()),
            sections: vec![raw_section("paragraph", r#"{"type":"paragraph","content":"ça"}"#, 0)],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    let rendered = render_snapshot(&build_payload(&story)).expect("render");
    let expected = format!(
        r##"{{
  "id": {id},
  "version": "1.0",
  "title": "Été",
  "standfirst": "Chaleur",
  "theme": {{
    "font": "Montserrat",
    "primaryColor": "#00007a"
  }},
  "sections": [
    {{
      "type": "paragraph",
      "content": "ça"
    }}
  ]
}}"##,
        id = story.id
    );
    assert_eq!(rendered, expected);
    assert!(!rendered.ends_with('\n'));
}
