//! 帖子仓储
//!
//! 募捐金额相关的写入只在事务内进行，先 `lock_for_update` 取得行锁，
//! 同一帖子的并发捐赠因此串行执行。

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{NewPost, Post, PostStatus, PostType, PostUpdate};

const POST_COLUMNS: &str = "id, user_id, post_type, title, description, pet_type, pet_age, \
                            pet_size, pet_species, donation_goal, current_amount, status, \
                            donations_enabled, created_at, updated_at";

pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn find(&self, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    /// 按状态与类型筛选，最新的在前
    pub async fn list(
        &self,
        status: PostStatus,
        post_type: Option<PostType>,
        limit: i64,
    ) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            r#"
            SELECT {POST_COLUMNS} FROM posts
            WHERE status = $1 AND ($2::varchar IS NULL OR post_type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(status)
        .bind(post_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// 后台列表，不限状态
    pub async fn list_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    // ==================== 写入操作 ====================

    pub async fn create(&self, owner_id: i64, post: &NewPost) -> Result<Post> {
        let created = sqlx::query_as::<_, Post>(&format!(
            r#"
            INSERT INTO posts (user_id, post_type, title, description, pet_type, pet_age,
                               pet_size, pet_species, donation_goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(post.post_type)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.pet_type.as_deref())
        .bind(post.pet_age)
        .bind(post.pet_size)
        .bind(post.pet_species.as_deref())
        .bind(post.donation_goal)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== 事务内操作 ====================

    /// 锁定帖子行（SELECT ... FOR UPDATE）
    pub async fn lock_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(post)
    }

    /// 写回帖子全部可变字段，调用方须已持有行锁
    pub async fn save(conn: &mut PgConnection, post: &Post) -> Result<Post> {
        let saved = sqlx::query_as::<_, Post>(&format!(
            r#"
            UPDATE posts SET
                post_type = $2,
                title = $3,
                description = $4,
                pet_type = $5,
                pet_age = $6,
                pet_size = $7,
                pet_species = $8,
                donation_goal = $9,
                current_amount = $10,
                status = $11,
                donations_enabled = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#
        ))
        .bind(post.id)
        .bind(post.post_type)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.pet_type.as_deref())
        .bind(post.pet_age)
        .bind(post.pet_size)
        .bind(post.pet_species.as_deref())
        .bind(post.donation_goal)
        .bind(post.current_amount)
        .bind(post.status)
        .bind(post.donations_enabled)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }

    // ==================== 进展更新 ====================

    pub async fn add_update(&self, post_id: i64, user_id: i64, text: &str) -> Result<PostUpdate> {
        let update = sqlx::query_as::<_, PostUpdate>(
            r#"
            INSERT INTO post_updates (post_id, user_id, update_text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, update_text, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;

        Ok(update)
    }

    pub async fn list_updates(&self, post_id: i64) -> Result<Vec<PostUpdate>> {
        let updates = sqlx::query_as::<_, PostUpdate>(
            r#"
            SELECT id, post_id, user_id, update_text, created_at
            FROM post_updates
            WHERE post_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(updates)
    }
}
