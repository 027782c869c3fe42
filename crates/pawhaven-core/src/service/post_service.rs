//! 帖子服务
//!
//! 帖子、进展更新、评论与收藏。编辑在事务内锁定帖子行，
//! 与捐赠计入串行，编辑后重新检查募捐目标。

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{
    Actor, Bookmark, Comment, NewPost, Post, PostPatch, PostStatus, PostType, PostUpdate,
    ensure_storable,
};
use crate::repository::{CommentRepository, PostRepository};
use crate::service::dto::{BookmarkState, PostView};

/// 默认列表条数
pub const DEFAULT_POST_LIMIT: i64 = 20;

const MAX_TITLE_LEN: usize = 255;
const MAX_COMMENT_LEN: usize = 1000;

fn validate_new_post(post: &mut NewPost) -> Result<()> {
    post.title = post.title.trim().to_string();
    if post.title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if post.title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    validate_pet_age(post.pet_age)?;
    validate_goal(post.donation_goal)?;

    // 领养帖没有募捐目标
    if post.post_type != PostType::Donation {
        post.donation_goal = None;
    }
    Ok(())
}

fn validate_patch(patch: &PostPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        if title.trim().chars().count() > MAX_TITLE_LEN {
            return Err(CoreError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
    }
    validate_pet_age(patch.pet_age)?;
    validate_goal(patch.donation_goal)
}

fn validate_pet_age(age: Option<i32>) -> Result<()> {
    if age.is_some_and(|a| a < 0) {
        return Err(CoreError::Validation("Pet age must not be negative".to_string()));
    }
    Ok(())
}

fn validate_goal(goal: Option<Decimal>) -> Result<()> {
    let Some(goal) = goal else {
        return Ok(());
    };
    if goal < Decimal::ZERO {
        return Err(CoreError::Validation(
            "Donation goal must not be negative".to_string(),
        ));
    }
    ensure_storable(goal, "donation_goal")
}

fn validate_comment(content: &str) -> Result<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CoreError::Validation("Comment content is required".to_string()));
    }
    if content.chars().count() > MAX_COMMENT_LEN {
        return Err(CoreError::Validation(format!(
            "Comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(content.to_string())
}

fn ensure_staff(actor: &Actor) -> Result<()> {
    if !actor.is_staff {
        return Err(CoreError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

pub struct PostService {
    pool: PgPool,
    post_repo: Arc<PostRepository>,
    comment_repo: Arc<CommentRepository>,
}

impl PostService {
    pub fn new(
        pool: PgPool,
        post_repo: Arc<PostRepository>,
        comment_repo: Arc<CommentRepository>,
    ) -> Self {
        Self {
            pool,
            post_repo,
            comment_repo,
        }
    }

    // ==================== 帖子 ====================

    pub async fn list(
        &self,
        post_type: Option<PostType>,
        status: Option<PostStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<PostView>> {
        let limit = limit.unwrap_or(DEFAULT_POST_LIMIT).clamp(1, 100);
        let posts = self
            .post_repo
            .list(status.unwrap_or_default(), post_type, limit)
            .await?;
        Ok(posts.into_iter().map(PostView::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<PostView> {
        Ok(PostView::from(self.find(id).await?))
    }

    #[instrument(skip(self, post), fields(post_type = ?post.post_type))]
    pub async fn create(&self, owner_id: i64, mut post: NewPost) -> Result<PostView> {
        validate_new_post(&mut post)?;
        let created = self.post_repo.create(owner_id, &post).await?;
        info!(post_id = created.id, "帖子已发布");
        Ok(PostView::from(created))
    }

    /// 作者或运营编辑帖子
    #[instrument(skip(self, patch))]
    pub async fn edit(&self, actor: Actor, id: i64, patch: PostPatch) -> Result<PostView> {
        validate_patch(&patch)?;

        let mut tx = self.pool.begin().await?;
        let mut post = PostRepository::lock_for_update(&mut tx, id)
            .await?
            .ok_or(CoreError::PostNotFound(id))?;
        if !actor.can_manage(post.user_id) {
            return Err(CoreError::Forbidden(
                "You can only edit your own posts".to_string(),
            ));
        }

        patch.apply_to(&mut post);
        let saved = PostRepository::save(&mut tx, &post).await?;
        tx.commit().await?;

        info!(post_id = id, status = ?saved.status, "帖子已编辑");
        Ok(PostView::from(saved))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        let post = self.find(id).await?;
        if !actor.can_manage(post.user_id) {
            return Err(CoreError::Forbidden(
                "You can only delete your own posts".to_string(),
            ));
        }
        if !self.post_repo.delete(id).await? {
            return Err(CoreError::PostNotFound(id));
        }
        info!(post_id = id, by = actor.user_id, "帖子已删除");
        Ok(())
    }

    /// 运营查看全部帖子，不限状态
    pub async fn list_all(
        &self,
        actor: &Actor,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<PostView>> {
        ensure_staff(actor)?;
        let posts = self
            .post_repo
            .list_all(limit.unwrap_or(50).clamp(1, 200), offset.unwrap_or(0).max(0))
            .await?;
        Ok(posts.into_iter().map(PostView::from).collect())
    }

    // ==================== 进展更新 ====================

    /// 只有作者可以发布进展
    pub async fn add_update(&self, actor: Actor, id: i64, text: &str) -> Result<PostUpdate> {
        let post = self.find(id).await?;
        if post.user_id != actor.user_id {
            return Err(CoreError::Forbidden(
                "Only the post owner can add updates".to_string(),
            ));
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(CoreError::Validation("Update text is required".to_string()));
        }
        self.post_repo.add_update(id, actor.user_id, text).await
    }

    pub async fn list_updates(&self, id: i64) -> Result<Vec<PostUpdate>> {
        self.find(id).await?;
        self.post_repo.list_updates(id).await
    }

    // ==================== 评论 ====================

    pub async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
        self.find(post_id).await?;
        self.comment_repo.list_for_post(post_id).await
    }

    pub async fn add_comment(&self, user_id: i64, post_id: i64, content: &str) -> Result<Comment> {
        let content = validate_comment(content)?;
        self.find(post_id).await?;
        self.comment_repo.create(post_id, user_id, &content).await
    }

    /// 评论作者或运营可删除
    pub async fn delete_comment(&self, actor: Actor, comment_id: i64) -> Result<()> {
        let comment = self
            .comment_repo
            .find(comment_id)
            .await?
            .ok_or(CoreError::CommentNotFound(comment_id))?;
        if !actor.can_manage(comment.user_id) {
            return Err(CoreError::Forbidden(
                "You can only delete your own comments".to_string(),
            ));
        }
        self.comment_repo.delete(comment_id).await?;
        Ok(())
    }

    pub async fn list_all_comments(
        &self,
        actor: &Actor,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Comment>> {
        ensure_staff(actor)?;
        self.comment_repo
            .list_all(limit.unwrap_or(50).clamp(1, 200), offset.unwrap_or(0).max(0))
            .await
    }

    // ==================== 收藏 ====================

    /// 切换收藏状态，返回切换后的状态
    pub async fn toggle_bookmark(&self, user_id: i64, post_id: i64) -> Result<BookmarkState> {
        self.find(post_id).await?;
        if self.comment_repo.add_bookmark(user_id, post_id).await?.is_some() {
            return Ok(BookmarkState { bookmarked: true });
        }
        self.comment_repo.remove_bookmark(user_id, post_id).await?;
        Ok(BookmarkState { bookmarked: false })
    }

    pub async fn list_bookmarks(&self, user_id: i64) -> Result<Vec<Bookmark>> {
        self.comment_repo.list_bookmarks(user_id).await
    }

    /// 匿名用户视为未收藏
    pub async fn bookmark_status(&self, user_id: Option<i64>, post_id: i64) -> Result<BookmarkState> {
        let bookmarked = match user_id {
            Some(user_id) => self.comment_repo.is_bookmarked(user_id, post_id).await?,
            None => false,
        };
        Ok(BookmarkState { bookmarked })
    }

    async fn find(&self, id: i64) -> Result<Post> {
        self.post_repo
            .find(id)
            .await?
            .ok_or(CoreError::PostNotFound(id))
    }
}
