use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::core::{
    document::RawDocument,
    errors::{AppError, AppResult},
    types::{NewSection, Page, Section, SectionUpdate},
};

const SECTION_COLUMNS: &str = "id, story_id, section_type, data, sort_order";

pub async fn list_sections(
    pool: &SqlitePool,
    story_id: Option<i64>,
    page: Page,
) -> AppResult<Vec<Section>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {SECTION_COLUMNS}
        FROM sections
        WHERE (?1 IS NULL OR story_id = ?1)
        ORDER BY sort_order ASC, id ASC
        LIMIT ?2 OFFSET ?3
        "#
    ))
    .bind(story_id)
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_section).collect()
}

pub async fn list_for_story(pool: &SqlitePool, story_id: i64) -> AppResult<Vec<Section>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {SECTION_COLUMNS}
        FROM sections
        WHERE story_id = ?1
        ORDER BY sort_order ASC, id ASC
        "#
    ))
    .bind(story_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_section).collect()
}

pub async fn get_section(pool: &SqlitePool, section_id: i64) -> AppResult<Section> {
    let row = sqlx::query(&format!(
        "SELECT {SECTION_COLUMNS} FROM sections WHERE id = ?1"
    ))
    .bind(section_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("section {section_id}")))?;

    map_section(row)
}

/// Appends a section to an existing story. Without an explicit sort order the
/// section lands one past the story's current last position.
pub async fn insert_section(
    pool: &SqlitePool,
    story_id: i64,
    section: &NewSection,
) -> AppResult<Section> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query("SELECT 1 FROM stories WHERE id = ?1")
        .bind(story_id)
        .fetch_optional(&mut *tx)
        .await?
        .is_some();
    if !exists {
        return Err(AppError::NotFound(format!("story {story_id}")));
    }

    let sort_order = match section.sort_order {
        Some(order) => order,
        None => {
            sqlx::query_scalar::<_, i64>(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM sections WHERE story_id = ?1",
            )
            .bind(story_id)
            .fetch_one(&mut *tx)
            .await?
        }
    };

    let id = insert_section_in(&mut *tx, story_id, section, sort_order).await?;
    tx.commit().await?;
    get_section(pool, id).await
}

/// Inserts one section row on an open connection and returns its generated id.
pub(crate) async fn insert_section_in(
    conn: &mut SqliteConnection,
    story_id: i64,
    section: &NewSection,
    sort_order: i64,
) -> AppResult<i64> {
    let id = sqlx::query(
        r#"
        INSERT INTO sections (story_id, section_type, data, sort_order)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(story_id)
    .bind(&section.section_type)
    .bind(section.data.as_str())
    .bind(sort_order)
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn update_section(
    pool: &SqlitePool,
    section_id: i64,
    update: &SectionUpdate,
) -> AppResult<Section> {
    let affected = sqlx::query(
        r#"
        UPDATE sections
        SET section_type = COALESCE(?2, section_type),
            data = COALESCE(?3, data),
            sort_order = COALESCE(?4, sort_order)
        WHERE id = ?1
        "#,
    )
    .bind(section_id)
    .bind(update.section_type.as_deref())
    .bind(update.data.as_ref().map(RawDocument::as_str))
    .bind(update.sort_order)
    .execute(pool)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound(format!("section {section_id}")));
    }
    get_section(pool, section_id).await
}

/// Deletes a section and hands back the id of the story that owned it.
pub async fn delete_section(pool: &SqlitePool, section_id: i64) -> AppResult<Option<i64>> {
    let mut tx = pool.begin().await?;

    let story_id = sqlx::query_scalar::<_, i64>("SELECT story_id FROM sections WHERE id = ?1")
        .bind(section_id)
        .fetch_optional(&mut *tx)
        .await?;
    let Some(story_id) = story_id else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM sections WHERE id = ?1")
        .bind(section_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(Some(story_id))
}

pub(crate) fn map_section(row: sqlx::sqlite::SqliteRow) -> AppResult<Section> {
    let data: String = row.try_get("data")?;
    Ok(Section {
        id: row.try_get("id")?,
        story_id: row.try_get("story_id")?,
        section_type: row.try_get("section_type")?,
        data: RawDocument::from(data),
        sort_order: row.try_get("sort_order")?,
    })
}
