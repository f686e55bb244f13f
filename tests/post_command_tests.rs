use storyline_lib::{
    commands::posts,
    core::{
        config::AppConfig,
        errors::AppError,
        types::{NewPost, Page, PostUpdate},
    },
    db::Database,
    AppState,
};

async fn state() -> AppState {
    let db = Database::in_memory().await.expect("db should initialize");
    AppState::new(db, AppConfig::new("unused-data", "unused/story.json"))
}

#[tokio::test]
async fn post_titles_are_trimmed_and_required() {
    let state = state().await;

    let created = posts::create_post(
        &state,
        NewPost {
            title: "  Morning edition ".to_string(),
            ..NewPost::default()
        },
    )
    .await
    .expect("create post");
    assert_eq!(created.title, "Morning edition");

    let err = posts::create_post(
        &state,
        NewPost {
            title: "   ".to_string(),
            ..NewPost::default()
        },
    )
    .await
    .expect_err("blank title");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = posts::update_post(
        &state,
        created.id,
        PostUpdate {
            title: Some(String::new()),
            ..PostUpdate::default()
        },
    )
    .await
    .expect_err("blank update title");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[tokio::test]
async fn post_list_pages_in_id_order() {
    let state = state().await;
    for title in ["one", "two", "three"] {
        posts::create_post(
            &state,
            NewPost {
                title: title.to_string(),
                ..NewPost::default()
            },
        )
        .await
        .expect("create post");
    }

    let page = posts::list_posts(&state, Page::new(1, 1)).await.expect("list posts");
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].title, "two");

    let clamped = Page::new(-5, 10_000);
    assert_eq!(clamped, Page { skip: 0, limit: Page::MAX_LIMIT });
}

#[tokio::test]
async fn deleting_unknown_post_is_not_found() {
    let state = state().await;
    let err = posts::delete_post(&state, 7).await.expect_err("unknown post");
    assert!(matches!(err, AppError::NotFound(_)));

    let serialized = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(serialized["code"], "NOT_FOUND");
    assert!(err.user_visible());
}
