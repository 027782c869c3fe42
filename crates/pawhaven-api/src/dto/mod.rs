//! DTO 模块
//!
//! 包含所有请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    AssignBadgeRequest, AssignVolunteerRequest, BadgeListQuery, BlogListQuery,
    ChangePasswordRequest, CommentRequest, CreateBlogRequest, CreateDonationRequest,
    CreateItemRequest, CreateManualDonationRequest, CreatePostRequest,
    CreateVolunteerDonationRequest, DonationListQuery, EditPostRequest, ItemListQuery,
    LoginRequest, PaginationParams, PostListQuery, PostUpdateRequest, RecordContributionRequest,
    RegisterRequest, ReviewDonationRequest, TagsInput, UpdateBlogRequest, UpdateProfileRequest,
    VerifyDonationRequest, VolunteerStatusRequest,
};
pub use response::{ApiResponse, AuthPayload};
