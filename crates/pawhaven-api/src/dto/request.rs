//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构

use pawhaven_core::dto::{
    CreateDonation, CreateManualDonation, ReviewAction, VerifyAction,
};
use pawhaven_core::{
    BadgeCategory, BlogPatch, ContributionType, DonationStatus, ItemType, NewBlog,
    NewContribution, NewItem, NewPost, NewUser, NewVolunteerDonation, PetSize, PostPatch,
    PostStatus, PostType, ProfilePatch, VolunteerItemType, VolunteerStatus,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

// ==================== 账户 ====================

/// 注册请求
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
        }
    }
}

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// 资料更新，未提供的字段保持不变
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 150))]
    pub first_name: Option<String>,
    #[validate(length(max = 150))]
    pub last_name: Option<String>,
    #[validate(length(max = 100))]
    pub location: Option<String>,
    #[validate(length(max = 500))]
    pub bio: Option<String>,
}

impl From<UpdateProfileRequest> for ProfilePatch {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            location: req.location,
            bio: req.bio,
        }
    }
}

/// 修改密码
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

// ==================== 帖子 ====================

/// 发帖请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(rename = "type")]
    pub post_type: PostType,
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 50))]
    pub pet_type: Option<String>,
    #[validate(range(min = 0, message = "Pet age must not be negative"))]
    pub pet_age: Option<i32>,
    pub pet_size: Option<PetSize>,
    #[validate(length(max = 100))]
    pub pet_species: Option<String>,
    pub donation_goal: Option<Decimal>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            post_type: req.post_type,
            title: req.title,
            description: req.description,
            pet_type: req.pet_type,
            pet_age: req.pet_age,
            pet_size: req.pet_size,
            pet_species: req.pet_species,
            donation_goal: req.donation_goal,
        }
    }
}

/// 编辑帖子
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditPostRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    #[validate(length(max = 50))]
    pub pet_type: Option<String>,
    #[validate(range(min = 0, message = "Pet age must not be negative"))]
    pub pet_age: Option<i32>,
    pub pet_size: Option<PetSize>,
    #[validate(length(max = 100))]
    pub pet_species: Option<String>,
    pub donation_goal: Option<Decimal>,
}

impl From<EditPostRequest> for PostPatch {
    fn from(req: EditPostRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            post_type: req.post_type,
            pet_type: req.pet_type,
            pet_age: req.pet_age,
            pet_size: req.pet_size,
            pet_species: req.pet_species,
            donation_goal: req.donation_goal,
        }
    }
}

/// 帖子进展
#[derive(Debug, Deserialize, Validate)]
pub struct PostUpdateRequest {
    #[validate(length(min = 1, message = "Update text is required"))]
    pub update_text: String,
}

/// 发表评论
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 1000, message = "Comment must be 1-1000 characters"))]
    pub content: String,
}

/// 帖子列表筛选
#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    #[serde(rename = "type")]
    pub post_type: Option<PostType>,
    pub status: Option<PostStatus>,
    pub limit: Option<i64>,
}

// ==================== 捐赠 ====================

/// 在线捐赠
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDonationRequest {
    pub post_id: i64,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 50, message = "payment_method is required"))]
    pub payment_method: String,
    #[validate(length(min = 1, max = 100, message = "reference_id is required"))]
    pub reference_id: String,
    #[serde(default)]
    pub message: String,
}

impl From<CreateDonationRequest> for CreateDonation {
    fn from(req: CreateDonationRequest) -> Self {
        Self {
            post_id: req.post_id,
            amount: req.amount,
            payment_method: req.payment_method,
            reference_id: req.reference_id,
            message: req.message,
        }
    }
}

/// 线下捐赠，凭证以存储路径提交
#[derive(Debug, Deserialize, Validate)]
pub struct CreateManualDonationRequest {
    pub post_id: i64,
    pub amount: Decimal,
    #[validate(length(min = 1, message = "receipt_image is required"))]
    pub receipt_image: String,
    #[serde(default)]
    pub message: String,
}

impl From<CreateManualDonationRequest> for CreateManualDonation {
    fn from(req: CreateManualDonationRequest) -> Self {
        Self {
            post_id: req.post_id,
            amount: req.amount,
            receipt_image: req.receipt_image,
            message: req.message,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VerifyDonationRequest {
    pub action: VerifyAction,
}

#[derive(Debug, Deserialize)]
pub struct ReviewDonationRequest {
    pub action: ReviewAction,
    pub admin_notes: Option<String>,
}

/// 捐赠列表筛选，status=all 表示不限
#[derive(Debug, Default, Deserialize)]
pub struct DonationListQuery {
    pub post_id: Option<i64>,
    pub status: Option<String>,
    pub limit: Option<i64>,
}

impl DonationListQuery {
    pub fn status_filter(&self) -> Result<Option<DonationStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some("pending") => Ok(Some(DonationStatus::Pending)),
            Some("verified") => Ok(Some(DonationStatus::Verified)),
            Some("rejected") => Ok(Some(DonationStatus::Rejected)),
            Some(other) => Err(format!("Invalid donation status: {other}")),
        }
    }
}

// ==================== 徽章 ====================

#[derive(Debug, Default, Deserialize)]
pub struct BadgeListQuery {
    pub category: Option<BadgeCategory>,
    pub limit: Option<i64>,
}

/// 手动授予徽章
#[derive(Debug, Deserialize)]
pub struct AssignBadgeRequest {
    pub user_id: i64,
    pub badge_id: i64,
}

/// 记录贡献，用户取自当前登录身份
#[derive(Debug, Deserialize, Validate)]
pub struct RecordContributionRequest {
    pub contribution_type: ContributionType,
    #[validate(length(min = 1, max = 100, message = "contribution_id is required"))]
    pub contribution_id: String,
    #[serde(default, alias = "points_earned")]
    #[validate(range(min = 0, message = "points must not be negative"))]
    pub points: i32,
    #[serde(default)]
    pub description: String,
}

impl RecordContributionRequest {
    pub fn into_contribution(self, user_id: i64) -> NewContribution {
        NewContribution {
            user_id,
            contribution_type: self.contribution_type,
            contribution_id: self.contribution_id,
            points_earned: self.points,
            description: self.description,
        }
    }
}

// ==================== 博客 ====================

/// 标签既可以是 JSON 数组，也可以是逗号分隔的字符串
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl TagsInput {
    /// 字符串形如 `["a","b"]` 时按 JSON 解析，否则按逗号拆分
    pub fn into_tags(self) -> Vec<String> {
        match self {
            Self::List(tags) => tags,
            Self::Text(text) => {
                let text = text.trim();
                if text.starts_with('[') {
                    if let Ok(tags) = serde_json::from_str::<Vec<String>>(text) {
                        return tags;
                    }
                }
                text.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            }
        }
    }
}

/// 发布博客，配图以存储路径提交
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBlogRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(max = 255))]
    pub image: Option<String>,
    pub tags: Option<TagsInput>,
}

impl From<CreateBlogRequest> for NewBlog {
    fn from(req: CreateBlogRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            image: req.image,
            tags: req.tags.map(TagsInput::into_tags).unwrap_or_default(),
        }
    }
}

/// 编辑博客，未提供的字段保持不变
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateBlogRequest {
    #[validate(length(max = 255, message = "Title must be at most 255 characters"))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(length(max = 255))]
    pub image: Option<String>,
    pub tags: Option<TagsInput>,
}

impl From<UpdateBlogRequest> for BlogPatch {
    fn from(req: UpdateBlogRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            image: req.image,
            tags: req.tags.map(TagsInput::into_tags),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogListQuery {
    pub limit: Option<i64>,
}

// ==================== 物资 ====================

/// 发布物资
#[derive(Debug, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub item_type: ItemType,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub contact_info: String,
}

impl From<CreateItemRequest> for NewItem {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            item_type: req.item_type,
            location: req.location,
            contact_info: req.contact_info,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemListQuery {
    pub item_type: Option<ItemType>,
    pub limit: Option<i64>,
}

/// 登记上门取件
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVolunteerDonationRequest {
    pub item_type: VolunteerItemType,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub quantity: String,
    pub estimated_value: Option<Decimal>,
    #[validate(length(min = 1, max = 500, message = "pickup_location is required"))]
    pub pickup_location: String,
    #[validate(length(min = 1, max = 50, message = "contact_number is required"))]
    pub contact_number: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub available_times: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub special_instructions: String,
}

impl From<CreateVolunteerDonationRequest> for NewVolunteerDonation {
    fn from(req: CreateVolunteerDonationRequest) -> Self {
        Self {
            item_type: req.item_type,
            description: req.description,
            quantity: req.quantity,
            estimated_value: req.estimated_value,
            pickup_location: req.pickup_location,
            contact_number: req.contact_number,
            available_times: req.available_times,
            special_instructions: req.special_instructions,
        }
    }
}

/// 指派志愿者，缺省表示撤销指派
#[derive(Debug, Default, Deserialize)]
pub struct AssignVolunteerRequest {
    pub volunteer_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VolunteerStatusRequest {
    pub status: VolunteerStatus,
}

// ==================== 通用 ====================

/// 运营列表分页参数
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "luna_fan",
            "email": "not-an-email",
            "password": "short",
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("username"));
    }

    #[test]
    fn test_register_into_new_user() {
        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "username": "luna_fan",
            "email": "Luna@Example.com",
            "password": "long enough",
        }))
        .unwrap();
        assert!(req.validate().is_ok());
        let user = NewUser::from(req);
        assert_eq!(user.first_name, "");
        assert_eq!(user.email, "Luna@Example.com");
    }

    #[test]
    fn test_create_post_uses_type_key() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "type": "donation",
            "title": "Surgery for Max",
            "donation_goal": "250.00",
            "pet_age": -1,
        }))
        .unwrap();
        assert_eq!(req.post_type, PostType::Donation);
        assert_eq!(req.donation_goal, Some(Decimal::new(250_00, 2)));
        assert!(req.validate().unwrap_err().field_errors().contains_key("pet_age"));
    }

    #[test]
    fn test_comment_length() {
        let req = CommentRequest {
            content: "a".repeat(1001),
        };
        assert!(req.validate().is_err());
        let req = CommentRequest {
            content: "so cute".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_donation_status_filter() {
        let query = |status: Option<&str>| DonationListQuery {
            status: status.map(String::from),
            ..Default::default()
        };
        assert_eq!(query(None).status_filter(), Ok(None));
        assert_eq!(query(Some("all")).status_filter(), Ok(None));
        assert_eq!(
            query(Some("pending")).status_filter(),
            Ok(Some(DonationStatus::Pending))
        );
        assert!(query(Some("refunded")).status_filter().is_err());
    }

    #[test]
    fn test_contribution_accepts_points_alias() {
        let req: RecordContributionRequest = serde_json::from_value(serde_json::json!({
            "contribution_type": "volunteer",
            "contribution_id": "event-9",
            "points_earned": 15,
        }))
        .unwrap();
        let contribution = req.into_contribution(3);
        assert_eq!(contribution.user_id, 3);
        assert_eq!(contribution.points_earned, 15);
        assert_eq!(contribution.contribution_type, ContributionType::Volunteer);
    }

    #[test]
    fn test_review_request() {
        let req: ReviewDonationRequest = serde_json::from_value(serde_json::json!({
            "action": "approve",
            "admin_notes": "receipt checked",
        }))
        .unwrap();
        assert_eq!(req.action, ReviewAction::Approve);
        assert_eq!(req.admin_notes.as_deref(), Some("receipt checked"));
    }

    #[test]
    fn test_tags_accept_list_json_text_and_csv() {
        let parse = |value: serde_json::Value| {
            let req: CreateBlogRequest = serde_json::from_value(serde_json::json!({
                "title": "Adopting a senior cat",
                "content": "Patience pays off.",
                "tags": value,
            }))
            .unwrap();
            NewBlog::from(req).tags
        };
        assert_eq!(parse(serde_json::json!(["cats", "senior"])), vec!["cats", "senior"]);
        assert_eq!(parse(serde_json::json!("[\"cats\",\"senior\"]")), vec!["cats", "senior"]);
        assert_eq!(parse(serde_json::json!(" cats, senior ,,")), vec!["cats", "senior"]);
        assert_eq!(parse(serde_json::json!("[not json")), vec!["[not json"]);
        assert!(parse(serde_json::Value::Null).is_empty());
    }

    #[test]
    fn test_update_blog_leaves_missing_tags_alone() {
        let req: UpdateBlogRequest =
            serde_json::from_value(serde_json::json!({ "title": "New title" })).unwrap();
        let patch = BlogPatch::from(req);
        assert_eq!(patch.tags, None);
        assert_eq!(patch.title.as_deref(), Some("New title"));
    }

    #[test]
    fn test_volunteer_donation_validation() {
        let req: CreateVolunteerDonationRequest = serde_json::from_value(serde_json::json!({
            "item_type": "toys",
            "description": "",
            "pickup_location": "12 Elm St",
            "contact_number": "5".repeat(51),
            "estimated_value": "40.00",
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("contact_number"));
        assert!(!fields.contains_key("pickup_location"));
        assert_eq!(req.estimated_value, Some(Decimal::new(40_00, 2)));
    }

    #[test]
    fn test_assign_without_volunteer_unassigns() {
        let req: AssignVolunteerRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(req.volunteer_id, None);
        let req: VolunteerStatusRequest =
            serde_json::from_value(serde_json::json!({ "status": "collected" })).unwrap();
        assert_eq!(req.status, VolunteerStatus::Collected);
    }
}
