use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{DeletePostResponse, ListPostsResponse, NewPost, Page, Post, PostUpdate},
    },
    db::repositories::posts,
    AppState,
};

fn normalized_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("post title cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub async fn create_post(state: &AppState, mut post: NewPost) -> AppResult<Post> {
    post.title = normalized_title(&post.title)?;
    posts::insert_post(state.db.pool(), &post).await
}

pub async fn list_posts(state: &AppState, page: Page) -> AppResult<ListPostsResponse> {
    let posts = posts::list_posts(state.db.pool(), page).await?;
    Ok(ListPostsResponse { posts })
}

pub async fn get_post(state: &AppState, post_id: i64) -> AppResult<Post> {
    posts::get_post(state.db.pool(), post_id).await
}

pub async fn update_post(state: &AppState, post_id: i64, mut update: PostUpdate) -> AppResult<Post> {
    if let Some(title) = update.title.as_deref() {
        update.title = Some(normalized_title(title)?);
    }
    posts::update_post(state.db.pool(), post_id, &update).await
}

pub async fn delete_post(state: &AppState, post_id: i64) -> AppResult<DeletePostResponse> {
    let deleted = posts::delete_post(state.db.pool(), post_id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }
    Ok(DeletePostResponse {
        deleted,
        id: post_id,
    })
}
