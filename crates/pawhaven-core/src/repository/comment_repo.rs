//! 评论与收藏仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Bookmark, Comment};

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.user_id, u.username, c.content, \
                              c.created_at, c.updated_at \
                              FROM comments c JOIN users u ON u.id = c.user_id";

pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<_, Comment>(&format!("{COMMENT_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    pub async fn list_for_post(&self, post_id: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} WHERE c.post_id = $1 ORDER BY c.created_at DESC, c.id DESC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{COMMENT_SELECT} ORDER BY c.created_at DESC, c.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(comments)
    }

    pub async fn create(&self, post_id: i64, user_id: i64, content: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, user_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, user_id, content, created_at, updated_at
            )
            SELECT i.id, i.post_id, i.user_id, u.username, i.content, i.created_at, i.updated_at
            FROM inserted i JOIN users u ON u.id = i.user_id
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== 收藏 ====================

    pub async fn is_bookmarked(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM bookmarks WHERE user_id = $1 AND post_id = $2)",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// 已收藏时不插入，返回 None
    pub async fn add_bookmark(&self, user_id: i64, post_id: i64) -> Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            RETURNING id, user_id, post_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(bookmark)
    }

    pub async fn remove_bookmark(&self, user_id: i64, post_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_bookmarks(&self, user_id: i64) -> Result<Vec<Bookmark>> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, post_id, created_at
            FROM bookmarks
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookmarks)
    }
}
