use std::path::Path;

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{ExportStoryResponse, Post, Story},
    },
    db::repositories::{posts, stories},
    story::{
        importer::{parse_document, read_source},
        payload::{build_payload, render_snapshot},
        sync::SyncOutcome,
    },
    AppState,
};

/// Structured import: one story whose sections keep the source nodes verbatim.
pub async fn import_story(state: &AppState, raw: &str) -> AppResult<Story> {
    let document = parse_document(raw)?;
    let created = stories::insert_story(state.db.pool(), &document.to_new_story()).await?;
    tracing::info!(
        story_id = created.id,
        sections = created.sections.len(),
        "imported story document"
    );
    state.snapshot.sync_story(&state.db, created.id).await;
    Ok(created)
}

pub async fn import_story_file(state: &AppState, path: &Path) -> AppResult<Story> {
    let raw = read_source(path)?;
    import_story(state, &raw).await
}

/// One post per section node, all committed together.
pub async fn import_section_posts(state: &AppState, raw: &str) -> AppResult<Vec<Post>> {
    let document = parse_document(raw)?;
    let created = posts::insert_posts(state.db.pool(), &document.to_section_posts()).await?;
    tracing::info!(posts = created.len(), "imported story sections as posts");
    Ok(created)
}

pub async fn import_section_posts_file(state: &AppState, path: &Path) -> AppResult<Vec<Post>> {
    let raw = read_source(path)?;
    import_section_posts(state, &raw).await
}

/// The whole document collapsed into a single post.
pub async fn import_merged_post(state: &AppState, raw: &str) -> AppResult<Post> {
    let document = parse_document(raw)?;
    let created = posts::insert_post(state.db.pool(), &document.to_merged_post()).await?;
    tracing::info!(
        post_id = created.id,
        media = created.media.len(),
        "imported story document as merged post"
    );
    Ok(created)
}

pub async fn import_merged_post_file(state: &AppState, path: &Path) -> AppResult<Post> {
    let raw = read_source(path)?;
    import_merged_post(state, &raw).await
}

/// Refreshes the configured snapshot for a story on demand.
pub async fn sync_snapshot(state: &AppState, story_id: i64) -> SyncOutcome {
    state.snapshot.sync_story(&state.db, story_id).await
}

/// Writes a story payload to an explicit destination, creating the file if needed.
pub async fn export_story_file(
    state: &AppState,
    story_id: i64,
    export_path: &Path,
) -> AppResult<ExportStoryResponse> {
    let story = stories::get_story(state.db.pool(), story_id).await?;
    let rendered = render_snapshot(&build_payload(&story))?;
    std::fs::write(export_path, rendered.as_bytes()).map_err(|err| AppError::Io(err.to_string()))?;
    Ok(ExportStoryResponse {
        story_id,
        file_path: export_path.to_string_lossy().to_string(),
        bytes: rendered.len(),
    })
}
