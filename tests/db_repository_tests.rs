use sqlx::Row;
use storyline_lib::{
    core::{
        document::RawDocument,
        errors::AppError,
        types::{MediaKind, NewMedia, NewPost, NewSection, NewStory, Page, PostUpdate, SectionUpdate},
    },
    db::{
        repositories::{posts, sections, stories},
        Database,
    },
};

fn section(section_type: &str, data: &str, sort_order: Option<i64>) -> NewSection {
    NewSection {
        section_type: section_type.to_string(),
        data: RawDocument::from_text(data),
        sort_order,
    }
}

fn media(kind: MediaKind, url: &str) -> NewMedia {
    NewMedia {
        kind,
        url: url.to_string(),
        caption: None,
        alt_text: String::new(),
        credit: String::new(),
        sort_order: None,
    }
}

#[tokio::test]
async fn story_insert_keeps_sections_in_sort_order() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            title: Some("Harbour".to_string()),
            sections: vec![
                section("paragraph", r#"{"type":"paragraph","content":"b"}"#, Some(2)),
                section("paragraph", r#"{"type":"paragraph","content":"a"}"#, Some(1)),
                section("video", r#"{"type":"video","src":"v.mp4"}"#, None),
            ],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    assert_eq!(story.version, "1.0");
    let orders: Vec<i64> = story.sections.iter().map(|s| s.sort_order).collect();
    assert_eq!(orders, vec![1, 2, 2]);
    assert_eq!(story.sections[0].data.as_str(), r#"{"type":"paragraph","content":"a"}"#);
    // Equal sort orders fall back to insertion id.
    assert_eq!(story.sections[1].section_type, "paragraph");
    assert_eq!(story.sections[2].section_type, "video");
}

#[tokio::test]
async fn section_insert_appends_after_current_last() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("paragraph", "{}", Some(7))],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    let appended = sections::insert_section(db.pool(), story.id, &section("pullquote", "{}", None))
        .await
        .expect("append section");
    assert_eq!(appended.sort_order, 8);
    assert_eq!(appended.story_id, story.id);

    let missing = sections::insert_section(db.pool(), story.id + 100, &section("paragraph", "{}", None))
        .await
        .expect_err("story must exist");
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[tokio::test]
async fn section_update_is_partial() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("paragraph", r#"{"type":"paragraph"}"#, None)],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");
    let section_id = story.sections[0].id;

    let updated = sections::update_section(
        db.pool(),
        section_id,
        &SectionUpdate {
            sort_order: Some(5),
            ..SectionUpdate::default()
        },
    )
    .await
    .expect("update section");
    assert_eq!(updated.sort_order, 5);
    assert_eq!(updated.section_type, "paragraph");
    assert_eq!(updated.data.as_str(), r#"{"type":"paragraph"}"#);

    let err = sections::update_section(db.pool(), section_id + 1, &SectionUpdate::default())
        .await
        .expect_err("unknown section");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn section_delete_reports_owning_story() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("paragraph", "{}", None)],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");
    let section_id = story.sections[0].id;

    let owner = sections::delete_section(db.pool(), section_id)
        .await
        .expect("delete section");
    assert_eq!(owner, Some(story.id));

    let again = sections::delete_section(db.pool(), section_id)
        .await
        .expect("second delete");
    assert_eq!(again, None);
}

#[tokio::test]
async fn section_list_filters_and_pages() {
    let db = Database::in_memory().await.expect("db should initialize");
    let first = stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("paragraph", "{}", None), section("video", "{}", None)],
            ..NewStory::default()
        },
    )
    .await
    .expect("first story");
    stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("imagegif", "{}", None)],
            ..NewStory::default()
        },
    )
    .await
    .expect("second story");

    let all = sections::list_sections(db.pool(), None, Page::default())
        .await
        .expect("list all");
    assert_eq!(all.len(), 3);

    let owned = sections::list_sections(db.pool(), Some(first.id), Page::new(1, 10))
        .await
        .expect("list filtered");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].section_type, "video");
}

#[tokio::test]
async fn story_delete_cascades_to_sections() {
    let db = Database::in_memory().await.expect("db should initialize");
    let story = stories::insert_story(
        db.pool(),
        &NewStory {
            sections: vec![section("paragraph", "{}", None), section("video", "{}", None)],
            ..NewStory::default()
        },
    )
    .await
    .expect("insert story");

    assert!(stories::delete_story(db.pool(), story.id).await.expect("delete"));
    assert!(!stories::delete_story(db.pool(), story.id).await.expect("delete again"));

    let remaining: i64 = sqlx::query("SELECT COUNT(*) AS n FROM sections")
        .fetch_one(db.pool())
        .await
        .expect("count sections")
        .get("n");
    assert_eq!(remaining, 0);
    assert!(stories::find_story(db.pool(), story.id)
        .await
        .expect("find")
        .is_none());
}

#[tokio::test]
async fn latest_story_prefers_newest_then_highest_id() {
    let db = Database::in_memory().await.expect("db should initialize");
    assert!(stories::latest_story(db.pool()).await.expect("empty").is_none());

    let older = stories::insert_story(db.pool(), &NewStory::default())
        .await
        .expect("older");
    let newer = stories::insert_story(db.pool(), &NewStory::default())
        .await
        .expect("newer");
    sqlx::query("UPDATE stories SET created_at = '2024-01-01T00:00:00.000Z'")
        .execute(db.pool())
        .await
        .expect("pin timestamps");

    let latest = stories::latest_story(db.pool())
        .await
        .expect("latest")
        .expect("story exists");
    assert_eq!(latest.id, newer.id);
    assert!(latest.id > older.id);
}

#[tokio::test]
async fn post_update_replaces_media_and_keeps_other_fields() {
    let db = Database::in_memory().await.expect("db should initialize");
    let post = posts::insert_post(
        db.pool(),
        &NewPost {
            title: "Field notes".to_string(),
            content: Some("body".to_string()),
            author: Some("desk".to_string()),
            media: vec![media(MediaKind::Image, "a.jpg"), media(MediaKind::Video, "b.mp4")],
            ..NewPost::default()
        },
    )
    .await
    .expect("insert post");
    assert_eq!(post.media.len(), 2);
    assert_eq!(post.media[1].sort_order, 1);

    let updated = posts::update_post(
        db.pool(),
        post.id,
        &PostUpdate {
            title: Some("Field notes, revised".to_string()),
            media: Some(vec![media(MediaKind::Gif, "c.gif")]),
            ..PostUpdate::default()
        },
    )
    .await
    .expect("update post");
    assert_eq!(updated.title, "Field notes, revised");
    assert_eq!(updated.content.as_deref(), Some("body"));
    assert_eq!(updated.author.as_deref(), Some("desk"));
    assert_eq!(updated.created_at, post.created_at);
    assert_eq!(updated.media.len(), 1);
    assert_eq!(updated.media[0].kind, MediaKind::Gif);
    assert_eq!(updated.media[0].sort_order, 0);

    let untouched = posts::update_post(
        db.pool(),
        post.id,
        &PostUpdate {
            content: Some("new body".to_string()),
            ..PostUpdate::default()
        },
    )
    .await
    .expect("update without media");
    assert_eq!(untouched.media.len(), 1);

    let err = posts::update_post(db.pool(), post.id + 1, &PostUpdate::default())
        .await
        .expect_err("unknown post");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn post_delete_cascades_to_media() {
    let db = Database::in_memory().await.expect("db should initialize");
    let post = posts::insert_post(
        db.pool(),
        &NewPost {
            title: "Gallery".to_string(),
            media: vec![media(MediaKind::Image, "a.jpg")],
            ..NewPost::default()
        },
    )
    .await
    .expect("insert post");

    assert!(posts::delete_post(db.pool(), post.id).await.expect("delete"));
    assert!(posts::list_media(db.pool(), post.id)
        .await
        .expect("list media")
        .is_empty());
    let err = posts::get_post(db.pool(), post.id)
        .await
        .expect_err("post is gone");
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn migrated_schema_cascades_from_parents() {
    let db = Database::in_memory().await.expect("db should initialize");

    for (table, parent) in [("sections", "stories"), ("media", "posts")] {
        let rows = sqlx::query(&format!("PRAGMA foreign_key_list({table});"))
            .fetch_all(db.pool())
            .await
            .expect("fk list");
        assert!(
            rows.iter().any(|row| {
                let target: String = row.get("table");
                let on_delete: String = row.get("on_delete");
                target == parent && on_delete == "CASCADE"
            }),
            "{table} should cascade from {parent}"
        );
    }
}
