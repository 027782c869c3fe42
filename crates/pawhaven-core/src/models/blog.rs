//! 博客实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 博客文章，配图以存储路径保存
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Blog {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 发布参数
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

/// 博客编辑，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl BlogPatch {
    /// 合并到已有文章，空白标题被忽略
    pub fn apply_to(self, blog: &mut Blog) {
        if let Some(title) = self.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            blog.title = title;
        }
        if let Some(content) = self.content {
            blog.content = content;
        }
        if self.image.is_some() {
            blog.image = self.image;
        }
        if let Some(tags) = self.tags {
            blog.tags = normalize_tags(tags);
        }
    }
}

/// 去掉首尾空白、空标签与重复标签，保留首次出现的顺序
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog() -> Blog {
        Blog {
            id: 1,
            author_id: 2,
            title: "Caring for senior dogs".to_string(),
            content: "Slow walks.".to_string(),
            image: None,
            tags: vec!["dogs".to_string()],
            published_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_normalize_tags() {
        let tags = [" cats ", "", "care", "cats"].map(String::from).to_vec();
        assert_eq!(normalize_tags(tags), vec!["cats", "care"]);
    }

    #[test]
    fn test_patch_keeps_untouched_fields() {
        let mut post = blog();
        BlogPatch {
            title: Some("  ".to_string()),
            tags: Some(vec!["senior".to_string(), " senior".to_string()]),
            ..Default::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "Caring for senior dogs");
        assert_eq!(post.content, "Slow walks.");
        assert_eq!(post.tags, vec!["senior"]);
    }

    #[test]
    fn test_patch_replaces_image_path() {
        let mut post = blog();
        BlogPatch {
            image: Some("media/blogs/1.jpg".to_string()),
            content: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut post);

        assert_eq!(post.image.as_deref(), Some("media/blogs/1.jpg"));
        assert_eq!(post.content, "");
    }
}
