use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{DeleteStoryResponse, ListStoriesResponse, NewStory, Page, Story, StoryPayload},
    },
    db::repositories::stories,
    story::payload::build_payload,
    AppState,
};

pub async fn create_story(state: &AppState, story: NewStory) -> AppResult<Story> {
    let created = stories::insert_story(state.db.pool(), &story).await?;
    state.snapshot.sync_story(&state.db, created.id).await;
    Ok(created)
}

pub async fn list_stories(state: &AppState, page: Page) -> AppResult<ListStoriesResponse> {
    let stories = stories::list_stories(state.db.pool(), page).await?;
    Ok(ListStoriesResponse { stories })
}

pub async fn get_story(state: &AppState, story_id: i64) -> AppResult<Story> {
    stories::get_story(state.db.pool(), story_id).await
}

pub async fn get_story_payload(state: &AppState, story_id: i64) -> AppResult<StoryPayload> {
    let story = stories::get_story(state.db.pool(), story_id).await?;
    Ok(build_payload(&story))
}

/// Payload of the newest story, the shape served in place of the static snapshot.
pub async fn get_latest_story_payload(state: &AppState) -> AppResult<StoryPayload> {
    let story = stories::latest_story(state.db.pool())
        .await?
        .ok_or_else(|| AppError::NotFound("no story found".to_string()))?;
    Ok(build_payload(&story))
}

pub async fn delete_story(state: &AppState, story_id: i64) -> AppResult<DeleteStoryResponse> {
    let deleted = stories::delete_story(state.db.pool(), story_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("story {story_id}")));
    }
    state.snapshot.sync_story(&state.db, story_id).await;
    Ok(DeleteStoryResponse {
        deleted,
        id: story_id,
    })
}
