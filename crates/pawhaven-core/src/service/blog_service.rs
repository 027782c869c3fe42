//! 博客服务
//!
//! 登录用户可发布，编辑与删除只对运营开放。

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{Actor, Blog, BlogPatch, NewBlog, normalize_tags};
use crate::repository::BlogRepository;

/// 默认列表条数
pub const DEFAULT_BLOG_LIMIT: i64 = 20;

const MAX_TITLE_LEN: usize = 255;
const MAX_IMAGE_LEN: usize = 255;

fn validate_title(title: &str) -> Result<()> {
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_image(image: Option<&str>) -> Result<()> {
    if image.is_some_and(|path| path.chars().count() > MAX_IMAGE_LEN) {
        return Err(CoreError::Validation(format!(
            "Image path must be at most {MAX_IMAGE_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_new_blog(blog: &mut NewBlog) -> Result<()> {
    blog.title = blog.title.trim().to_string();
    if blog.title.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    validate_title(&blog.title)?;
    if blog.content.trim().is_empty() {
        return Err(CoreError::Validation("Content is required".to_string()));
    }
    validate_image(blog.image.as_deref())?;
    blog.tags = normalize_tags(std::mem::take(&mut blog.tags));
    Ok(())
}

fn validate_patch(patch: &BlogPatch) -> Result<()> {
    if let Some(title) = &patch.title {
        validate_title(title.trim())?;
    }
    validate_image(patch.image.as_deref())
}

fn ensure_staff(actor: &Actor) -> Result<()> {
    if !actor.is_staff {
        return Err(CoreError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

pub struct BlogService {
    blog_repo: Arc<BlogRepository>,
}

impl BlogService {
    pub fn new(blog_repo: Arc<BlogRepository>) -> Self {
        Self { blog_repo }
    }

    pub async fn list(&self, limit: Option<i64>) -> Result<Vec<Blog>> {
        let limit = limit.unwrap_or(DEFAULT_BLOG_LIMIT).clamp(1, 100);
        self.blog_repo.list(limit).await
    }

    pub async fn get(&self, id: i64) -> Result<Blog> {
        self.blog_repo
            .find(id)
            .await?
            .ok_or(CoreError::BlogNotFound(id))
    }

    #[instrument(skip(self, blog))]
    pub async fn create(&self, author_id: i64, mut blog: NewBlog) -> Result<Blog> {
        validate_new_blog(&mut blog)?;
        let created = self.blog_repo.create(author_id, &blog).await?;
        info!(blog_id = created.id, tags = created.tags.len(), "博客已发布");
        Ok(created)
    }

    /// 运营部分更新
    #[instrument(skip(self, patch))]
    pub async fn update(&self, actor: Actor, id: i64, patch: BlogPatch) -> Result<Blog> {
        ensure_staff(&actor)?;
        validate_patch(&patch)?;

        let mut blog = self.get(id).await?;
        patch.apply_to(&mut blog);
        let saved = self
            .blog_repo
            .save(&blog)
            .await?
            .ok_or(CoreError::BlogNotFound(id))?;

        info!(blog_id = id, by = actor.user_id, "博客已编辑");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        ensure_staff(&actor)?;
        if !self.blog_repo.delete(id).await? {
            return Err(CoreError::BlogNotFound(id));
        }
        info!(blog_id = id, by = actor.user_id, "博客已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_blog() -> NewBlog {
        NewBlog {
            title: "  Fostering kittens ".to_string(),
            content: "Keep them warm.".to_string(),
            image: Some("media/blogs/kittens.jpg".to_string()),
            tags: vec!["cats".to_string(), " ".to_string(), "foster".to_string()],
        }
    }

    #[test]
    fn test_new_blog_trims_title_and_tags() {
        let mut blog = new_blog();
        validate_new_blog(&mut blog).unwrap();
        assert_eq!(blog.title, "Fostering kittens");
        assert_eq!(blog.tags, vec!["cats", "foster"]);
    }

    #[test]
    fn test_new_blog_requires_title_and_content() {
        let mut blog = new_blog();
        blog.title = "   ".to_string();
        assert!(matches!(validate_new_blog(&mut blog), Err(CoreError::Validation(_))));

        let mut blog = new_blog();
        blog.content = "\n".to_string();
        assert!(validate_new_blog(&mut blog).is_err());

        let mut blog = new_blog();
        blog.title = "t".repeat(MAX_TITLE_LEN + 1);
        assert!(validate_new_blog(&mut blog).is_err());
    }

    #[test]
    fn test_image_path_length() {
        let mut blog = new_blog();
        blog.image = Some("p".repeat(MAX_IMAGE_LEN + 1));
        assert!(validate_new_blog(&mut blog).is_err());

        let patch = BlogPatch {
            image: Some("p".repeat(MAX_IMAGE_LEN)),
            ..Default::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_only_staff_manage_blogs() {
        let err = ensure_staff(&Actor { user_id: 3, is_staff: false }).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
        assert_eq!(err.to_string(), "Admin access required");
    }
}
