//! 博客仓储

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Blog, NewBlog};

const BLOG_COLUMNS: &str =
    "id, author_id, title, content, image, tags, published_at, created_at, updated_at";

pub struct BlogRepository {
    pool: PgPool,
}

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 最新发布的在前
    pub async fn list(&self, limit: i64) -> Result<Vec<Blog>> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY published_at DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(blogs)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    pub async fn create(&self, author_id: i64, blog: &NewBlog) -> Result<Blog> {
        let created = sqlx::query_as::<_, Blog>(&format!(
            r#"
            INSERT INTO blogs (author_id, title, content, image, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(author_id)
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.image.as_deref())
        .bind(&blog.tags)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// 写回可编辑字段，文章已被删除时返回 None
    pub async fn save(&self, blog: &Blog) -> Result<Option<Blog>> {
        let saved = sqlx::query_as::<_, Blog>(&format!(
            r#"
            UPDATE blogs SET
                title = $2,
                content = $3,
                image = $4,
                tags = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        ))
        .bind(blog.id)
        .bind(&blog.title)
        .bind(&blog.content)
        .bind(blog.image.as_deref())
        .bind(&blog.tags)
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
