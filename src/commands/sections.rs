use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{DeleteSectionResponse, ListSectionsResponse, NewSection, Page, Section, SectionUpdate},
    },
    db::repositories::sections,
    AppState,
};

fn normalized_type(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("section type cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

pub async fn list_sections(
    state: &AppState,
    story_id: Option<i64>,
    page: Page,
) -> AppResult<ListSectionsResponse> {
    let sections = sections::list_sections(state.db.pool(), story_id, page).await?;
    Ok(ListSectionsResponse { sections })
}

pub async fn get_section(state: &AppState, section_id: i64) -> AppResult<Section> {
    sections::get_section(state.db.pool(), section_id).await
}

pub async fn create_section(
    state: &AppState,
    story_id: i64,
    mut section: NewSection,
) -> AppResult<Section> {
    section.section_type = normalized_type(&section.section_type)?;
    let created = sections::insert_section(state.db.pool(), story_id, &section).await?;
    state.snapshot.sync_story(&state.db, created.story_id).await;
    Ok(created)
}

pub async fn update_section(
    state: &AppState,
    section_id: i64,
    mut update: SectionUpdate,
) -> AppResult<Section> {
    if let Some(section_type) = update.section_type.as_deref() {
        update.section_type = Some(normalized_type(section_type)?);
    }
    let updated = sections::update_section(state.db.pool(), section_id, &update).await?;
    state.snapshot.sync_story(&state.db, updated.story_id).await;
    Ok(updated)
}

pub async fn delete_section(state: &AppState, section_id: i64) -> AppResult<DeleteSectionResponse> {
    let story_id = sections::delete_section(state.db.pool(), section_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("section {section_id}")))?;
    state.snapshot.sync_story(&state.db, story_id).await;
    Ok(DeleteSectionResponse {
        deleted: true,
        id: section_id,
        story_id,
    })
}
