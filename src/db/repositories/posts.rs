use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::{
    core::{
        document::RawDocument,
        errors::{AppError, AppResult},
        types::{Media, MediaKind, NewMedia, NewPost, Page, Post, PostUpdate},
    },
    db::repositories::{format_timestamp, parse_timestamp},
};

const POST_COLUMNS: &str = "id, title, content, author, created_at, version, standfirst, \
                            theme_font, theme_primary_color, sections_data";

pub async fn insert_post(pool: &SqlitePool, post: &NewPost) -> AppResult<Post> {
    let mut tx = pool.begin().await?;
    let post_id = insert_post_in(&mut *tx, post).await?;
    tx.commit().await?;
    get_post(pool, post_id).await
}

/// Inserts every post with its media in a single transaction.
pub async fn insert_posts(pool: &SqlitePool, posts: &[NewPost]) -> AppResult<Vec<Post>> {
    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(posts.len());
    for post in posts {
        ids.push(insert_post_in(&mut *tx, post).await?);
    }
    tx.commit().await?;

    let mut created = Vec::with_capacity(ids.len());
    for id in ids {
        created.push(get_post(pool, id).await?);
    }
    Ok(created)
}

async fn insert_post_in(conn: &mut SqliteConnection, post: &NewPost) -> AppResult<i64> {
    let post_id = sqlx::query(
        r#"
        INSERT INTO posts (
          title, content, author, created_at, version, standfirst,
          theme_font, theme_primary_color, sections_data
        )
        VALUES (?1, ?2, ?3, COALESCE(?4, strftime('%Y-%m-%dT%H:%M:%fZ', 'now')), ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&post.title)
    .bind(post.content.as_deref())
    .bind(post.author.as_deref())
    .bind(post.created_at.as_ref().map(format_timestamp))
    .bind(post.version.as_deref())
    .bind(post.standfirst.as_deref())
    .bind(post.theme_font.as_deref())
    .bind(post.theme_primary_color.as_deref())
    .bind(post.sections_data.as_ref().map(RawDocument::as_str))
    .execute(&mut *conn)
    .await?
    .last_insert_rowid();

    insert_media_in(conn, post_id, &post.media).await?;
    Ok(post_id)
}

/// Media without an explicit sort order take their index in `media`.
async fn insert_media_in(
    conn: &mut SqliteConnection,
    post_id: i64,
    media: &[NewMedia],
) -> AppResult<()> {
    for (index, item) in media.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO media (post_id, kind, url, caption, alt_text, credit, sort_order)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(post_id)
        .bind(item.kind.as_str())
        .bind(&item.url)
        .bind(item.caption.as_deref())
        .bind(&item.alt_text)
        .bind(&item.credit)
        .bind(item.sort_order.unwrap_or(index as i64))
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list_posts(pool: &SqlitePool, page: Page) -> AppResult<Vec<Post>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {POST_COLUMNS}
        FROM posts
        ORDER BY id ASC
        LIMIT ?1 OFFSET ?2
        "#
    ))
    .bind(page.limit)
    .bind(page.skip)
    .fetch_all(pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let mut post = map_post(row)?;
        post.media = list_media(pool, post.id).await?;
        posts.push(post);
    }
    Ok(posts)
}

pub async fn get_post(pool: &SqlitePool, post_id: i64) -> AppResult<Post> {
    let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"))
        .bind(post_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

    let mut post = map_post(row)?;
    post.media = list_media(pool, post_id).await?;
    Ok(post)
}

/// Applies the provided scalar fields, and when `update.media` is present
/// swaps the whole media set for the new list.
pub async fn update_post(pool: &SqlitePool, post_id: i64, update: &PostUpdate) -> AppResult<Post> {
    let mut tx = pool.begin().await?;

    let affected = sqlx::query(
        r#"
        UPDATE posts
        SET title = COALESCE(?2, title),
            content = COALESCE(?3, content),
            author = COALESCE(?4, author),
            created_at = COALESCE(?5, created_at)
        WHERE id = ?1
        "#,
    )
    .bind(post_id)
    .bind(update.title.as_deref())
    .bind(update.content.as_deref())
    .bind(update.author.as_deref())
    .bind(update.created_at.as_ref().map(format_timestamp))
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound(format!("post {post_id}")));
    }

    if let Some(media) = &update.media {
        sqlx::query("DELETE FROM media WHERE post_id = ?1")
            .bind(post_id)
            .execute(&mut *tx)
            .await?;
        insert_media_in(&mut *tx, post_id, media).await?;
    }

    tx.commit().await?;
    get_post(pool, post_id).await
}

pub async fn delete_post(pool: &SqlitePool, post_id: i64) -> AppResult<bool> {
    let affected = sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(post_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(affected > 0)
}

pub async fn list_media(pool: &SqlitePool, post_id: i64) -> AppResult<Vec<Media>> {
    let rows = sqlx::query(
        r#"
        SELECT id, post_id, kind, url, caption, alt_text, credit, sort_order
        FROM media
        WHERE post_id = ?1
        ORDER BY sort_order ASC, id ASC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(map_media).collect()
}

fn map_post(row: sqlx::sqlite::SqliteRow) -> AppResult<Post> {
    let created_at: String = row.try_get("created_at")?;
    let sections_data: Option<String> = row.try_get("sections_data")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        author: row.try_get("author")?,
        created_at: parse_timestamp(created_at)?,
        version: row.try_get("version")?,
        standfirst: row.try_get("standfirst")?,
        theme_font: row.try_get("theme_font")?,
        theme_primary_color: row.try_get("theme_primary_color")?,
        sections_data: sections_data.map(RawDocument::from),
        media: Vec::new(),
    })
}

fn map_media(row: sqlx::sqlite::SqliteRow) -> AppResult<Media> {
    let kind: String = row.try_get("kind")?;
    Ok(Media {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        kind: MediaKind::parse(&kind)
            .ok_or_else(|| AppError::Database(format!("unknown media kind {kind}")))?,
        url: row.try_get("url")?,
        caption: row.try_get("caption")?,
        alt_text: row.try_get("alt_text")?,
        credit: row.try_get("credit")?,
        sort_order: row.try_get("sort_order")?,
    })
}
