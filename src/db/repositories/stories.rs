use sqlx::{Row, SqlitePool};

use crate::{
    core::{
        errors::{AppError, AppResult},
        types::{NewStory, Page, Story},
    },
    db::repositories::{parse_timestamp, sections},
};

const STORY_COLUMNS: &str =
    "id, title, version, standfirst, theme_font, theme_primary_color, created_at";
const DEFAULT_VERSION: &str = "1.0";

/// Creates a story and all of its sections in one transaction. Sections
/// without an explicit sort order take their position in `story.sections`.
pub async fn insert_story(pool: &SqlitePool, story: &NewStory) -> AppResult<Story> {
    let mut tx = pool.begin().await?;

    let story_id = sqlx::query(
        r#"
        INSERT INTO stories (title, version, standfirst, theme_font, theme_primary_color)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(story.title.as_deref())
    .bind(story.version.as_deref().unwrap_or(DEFAULT_VERSION))
    .bind(story.standfirst.as_deref())
    .bind(story.theme_font.as_deref())
    .bind(story.theme_primary_color.as_deref())
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for (index, section) in story.sections.iter().enumerate() {
        let sort_order = section.sort_order.unwrap_or(index as i64);
        sections::insert_section_in(&mut *tx, story_id, section, sort_order).await?;
    }

    tx.commit().await?;
    get_story(pool, story_id).await
}

pub async fn list_stories(pool: &SqlitePool, page: Page) -> AppResult<Vec<Story>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {STORY_COLUMNS}
        FROM stories
        ORDER BY id ASC
        LIMIT ?1 OFFSET ?2
        "#
    ))
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(pool)
    .await?;

    let mut stories = Vec::with_capacity(rows.len());
    for row in rows {
        stories.push(load_sections(pool, row).await?);
    }
    Ok(stories)
}

pub async fn get_story(pool: &SqlitePool, story_id: i64) -> AppResult<Story> {
    find_story(pool, story_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("story {story_id}")))
}

pub async fn find_story(pool: &SqlitePool, story_id: i64) -> AppResult<Option<Story>> {
    let maybe_row = sqlx::query(&format!(
        "SELECT {STORY_COLUMNS} FROM stories WHERE id = ?1"
    ))
    .bind(story_id)
    .fetch_optional(pool)
    .await?;

    match maybe_row {
        Some(row) => Ok(Some(load_sections(pool, row).await?)),
        None => Ok(None),
    }
}

/// The most recently created story; equal timestamps resolve to the higher id.
pub async fn latest_story(pool: &SqlitePool) -> AppResult<Option<Story>> {
    let maybe_row = sqlx::query(&format!(
        r#"
        SELECT {STORY_COLUMNS}
        FROM stories
        ORDER BY created_at DESC, id DESC
        LIMIT 1
        "#
    ))
    .fetch_optional(pool)
    .await?;

    match maybe_row {
        Some(row) => Ok(Some(load_sections(pool, row).await?)),
        None => Ok(None),
    }
}

pub async fn delete_story(pool: &SqlitePool, story_id: i64) -> AppResult<bool> {
    let affected = sqlx::query("DELETE FROM stories WHERE id = ?1")
        .bind(story_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

async fn load_sections(pool: &SqlitePool, row: sqlx::sqlite::SqliteRow) -> AppResult<Story> {
    let mut story = map_story(row)?;
    story.sections = sections::list_for_story(pool, story.id).await?;
    Ok(story)
}

fn map_story(row: sqlx::sqlite::SqliteRow) -> AppResult<Story> {
    let created_at: String = row.try_get("created_at")?;
    Ok(Story {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        version: row.try_get("version")?,
        standfirst: row.try_get("standfirst")?,
        theme_font: row.try_get("theme_font")?,
        theme_primary_color: row.try_get("theme_primary_color")?,
        created_at: parse_timestamp(created_at)?,
        sections: Vec::new(),
    })
}
