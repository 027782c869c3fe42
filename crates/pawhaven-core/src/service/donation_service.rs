//! 捐赠服务
//!
//! 捐赠状态机：
//!
//! - 在线捐赠直接以 verified 创建，金额在同一事务内计入帖子
//! - 线下捐赠以 pending 创建，运营确认后变为 verified 并计入金额，或变为 rejected
//! - verified / rejected 为终态，rejected 不触碰帖子
//!
//! 所有状态变更先对帖子行加 `FOR UPDATE` 锁，再锁捐赠行，同一帖子的并发捐赠串行执行，
//! `current_amount`、`donations_enabled` 与 `status` 一次写回。

use std::sync::Arc;

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument};

use pawhaven_shared::observability::metrics;

use crate::error::{CoreError, Result};
use crate::models::{
    Actor, Donation, DonationStatus, MANUAL_PAYMENT_METHOD, NewDonation, Post,
    PostDonationSummary, PostType, ensure_storable, generate_reference,
};
use crate::repository::{DonationRepository, PostRepository};
use crate::service::dto::{CreateDonation, CreateManualDonation, ReviewAction, VerifyAction};

/// 默认列表条数
pub const DEFAULT_DONATION_LIMIT: i64 = 20;

const MANUAL_REFERENCE_PREFIX: &str = "MANUAL";

/// 帖子当前是否可以接收捐赠
pub fn ensure_accepting(post: &Post) -> Result<()> {
    if post.post_type != PostType::Donation {
        return Err(CoreError::Validation(
            "Donations are only accepted for donation posts".to_string(),
        ));
    }
    if !post.accepts_donations() {
        return Err(CoreError::DonationsClosed(post.id));
    }
    Ok(())
}

fn ensure_positive(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(CoreError::Validation(
            "Donation amount must be greater than zero".to_string(),
        ));
    }
    ensure_storable(amount, "amount")
}

fn require(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn ensure_staff(actor: &Actor) -> Result<()> {
    if !actor.is_staff {
        return Err(CoreError::Forbidden(
            "Only staff can review donations".to_string(),
        ));
    }
    Ok(())
}

pub struct DonationService {
    pool: PgPool,
    donation_repo: Arc<DonationRepository>,
    post_repo: Arc<PostRepository>,
}

impl DonationService {
    pub fn new(
        pool: PgPool,
        donation_repo: Arc<DonationRepository>,
        post_repo: Arc<PostRepository>,
    ) -> Self {
        Self {
            pool,
            donation_repo,
            post_repo,
        }
    }

    // ==================== 创建 ====================

    /// 在线捐赠，创建即确认
    #[instrument(skip(self, request), fields(post_id = request.post_id, amount = %request.amount))]
    pub async fn create(&self, donor_id: i64, request: CreateDonation) -> Result<Donation> {
        ensure_positive(request.amount)?;
        let payment_method = require(&request.payment_method, "payment_method")?;
        let reference_id = require(&request.reference_id, "reference_id")?;

        let mut tx = self.pool.begin().await?;
        let mut post = lock_accepting_post(&mut tx, request.post_id).await?;

        let donation = DonationRepository::insert(
            &mut tx,
            &NewDonation {
                post_id: post.id,
                donor_id,
                amount: request.amount,
                payment_method,
                reference_id,
                message: request.message,
                status: DonationStatus::Verified,
                receipt_image: None,
                is_manual: false,
            },
        )
        .await?;

        post.apply_verified_amount(donation.amount)?;
        let post = PostRepository::save(&mut tx, &post).await?;
        tx.commit().await?;

        metrics::record_donation("online", DonationStatus::Verified.as_str());
        info!(
            donation_id = donation.id,
            current_amount = %post.current_amount,
            status = ?post.status,
            "在线捐赠已计入"
        );
        Ok(donation)
    }

    /// 线下捐赠，待运营审核
    #[instrument(skip(self, request), fields(post_id = request.post_id, amount = %request.amount))]
    pub async fn create_manual(
        &self,
        donor_id: i64,
        request: CreateManualDonation,
    ) -> Result<Donation> {
        ensure_positive(request.amount)?;
        let receipt_image = require(&request.receipt_image, "receipt_image")?;

        let mut tx = self.pool.begin().await?;
        let post = lock_accepting_post(&mut tx, request.post_id).await?;

        let donation = DonationRepository::insert(
            &mut tx,
            &NewDonation {
                post_id: post.id,
                donor_id,
                amount: request.amount,
                payment_method: MANUAL_PAYMENT_METHOD.to_string(),
                reference_id: generate_reference(MANUAL_REFERENCE_PREFIX),
                message: request.message,
                status: DonationStatus::Pending,
                receipt_image: Some(receipt_image),
                is_manual: true,
            },
        )
        .await?;
        tx.commit().await?;

        metrics::record_donation("manual", DonationStatus::Pending.as_str());
        info!(donation_id = donation.id, reference = %donation.reference_id, "线下捐赠待审核");
        Ok(donation)
    }

    // ==================== 审核 ====================

    /// 确认或拒绝一笔待处理捐赠
    pub async fn verify(&self, reviewer: Actor, id: i64, action: VerifyAction) -> Result<Donation> {
        self.transition(reviewer, id, action.target_status(), None, false)
            .await
    }

    /// 审核线下捐赠，可附加备注
    pub async fn review(
        &self,
        reviewer: Actor,
        id: i64,
        action: ReviewAction,
        admin_notes: Option<&str>,
    ) -> Result<Donation> {
        self.transition(reviewer, id, action.target_status(), admin_notes, true)
            .await
    }

    #[instrument(skip(self, admin_notes), fields(reviewer = reviewer.user_id))]
    async fn transition(
        &self,
        reviewer: Actor,
        id: i64,
        target: DonationStatus,
        admin_notes: Option<&str>,
        manual_only: bool,
    ) -> Result<Donation> {
        ensure_staff(&reviewer)?;

        // 先锁帖子，再锁捐赠
        let mut tx = self.pool.begin().await?;
        let post_id = DonationRepository::post_id_of(&mut tx, id)
            .await?
            .ok_or(CoreError::DonationNotFound(id))?;
        let mut post = PostRepository::lock_for_update(&mut tx, post_id)
            .await?
            .ok_or(CoreError::PostNotFound(post_id))?;
        let donation = DonationRepository::lock_for_update(&mut tx, id)
            .await?
            .ok_or(CoreError::DonationNotFound(id))?;

        if manual_only && !donation.is_manual {
            return Err(CoreError::Validation(
                "Only manual donations can be reviewed".to_string(),
            ));
        }
        donation.ensure_transition(target)?;

        let message = donation.message_with_admin_notes(admin_notes);
        let updated =
            DonationRepository::record_review(&mut tx, id, target, reviewer.user_id, &message)
                .await?;

        // 帖子已完结时仍计入金额，保证每笔确认捐赠恰好计入一次
        if target == DonationStatus::Verified {
            post.apply_verified_amount(updated.amount)?;
            PostRepository::save(&mut tx, &post).await?;
        }
        tx.commit().await?;

        let kind = if updated.is_manual { "manual" } else { "online" };
        metrics::record_donation(kind, target.as_str());
        info!(donation_id = id, status = target.as_str(), "捐赠已审核");
        Ok(updated)
    }

    // ==================== 查询 ====================

    pub async fn get(&self, id: i64) -> Result<Donation> {
        self.donation_repo
            .find(id)
            .await?
            .ok_or(CoreError::DonationNotFound(id))
    }

    pub async fn list(
        &self,
        post_id: Option<i64>,
        status: Option<DonationStatus>,
        limit: Option<i64>,
    ) -> Result<Vec<Donation>> {
        let limit = limit.unwrap_or(DEFAULT_DONATION_LIMIT).clamp(1, 100);
        self.donation_repo.list(post_id, status, limit).await
    }

    pub async fn list_pending_manual(&self, reviewer: &Actor) -> Result<Vec<Donation>> {
        ensure_staff(reviewer)?;
        self.donation_repo.list_pending_manual().await
    }

    pub async fn list_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        self.donation_repo.list_by_donor(donor_id).await
    }

    /// 帖子的已确认捐赠及汇总
    pub async fn list_for_post(&self, post_id: i64) -> Result<PostDonationSummary> {
        if self.post_repo.find(post_id).await?.is_none() {
            return Err(CoreError::PostNotFound(post_id));
        }
        let donations = self.donation_repo.list_verified_for_post(post_id).await?;
        Ok(PostDonationSummary::from_verified(donations))
    }
}

async fn lock_accepting_post(conn: &mut PgConnection, post_id: i64) -> Result<Post> {
    let post = PostRepository::lock_for_update(conn, post_id)
        .await?
        .ok_or(CoreError::PostNotFound(post_id))?;
    ensure_accepting(&post)?;
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PostStatus;
    use chrono::Utc;

    fn post(post_type: PostType, status: PostStatus, donations_enabled: bool) -> Post {
        Post {
            id: 1,
            user_id: 2,
            post_type,
            title: "Help Luna".to_string(),
            description: String::new(),
            pet_type: None,
            pet_age: None,
            pet_size: None,
            pet_species: None,
            donation_goal: Some(Decimal::new(100_00, 2)),
            current_amount: Decimal::ZERO,
            status,
            donations_enabled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_ensure_accepting() {
        assert!(ensure_accepting(&post(PostType::Donation, PostStatus::Active, true)).is_ok());

        let err = ensure_accepting(&post(PostType::Adoption, PostStatus::Active, true)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err =
            ensure_accepting(&post(PostType::Donation, PostStatus::Completed, false)).unwrap_err();
        assert!(matches!(err, CoreError::DonationsClosed(1)));

        let err = ensure_accepting(&post(PostType::Donation, PostStatus::Active, false)).unwrap_err();
        assert!(matches!(err, CoreError::DonationsClosed(1)));
    }

    #[test]
    fn test_amount_must_be_positive() {
        assert!(ensure_positive(Decimal::new(1, 2)).is_ok());
        assert!(ensure_positive(Decimal::ZERO).is_err());
        assert!(ensure_positive(Decimal::new(-500, 2)).is_err());
    }

    #[test]
    fn test_amount_must_fit_column() {
        assert!(ensure_positive(Decimal::new(999_999_999_999, 2)).is_ok());

        let err = ensure_positive(Decimal::from(10_000_000_000_i64)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = ensure_positive(Decimal::new(1_005, 3)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_require_trims() {
        assert_eq!(require("  bkash ", "payment_method").unwrap(), "bkash");
        let err = require("   ", "reference_id").unwrap_err();
        assert_eq!(err.to_string(), "reference_id is required");
    }

    #[test]
    fn test_ensure_staff() {
        assert!(ensure_staff(&Actor { user_id: 1, is_staff: true }).is_ok());
        let err = ensure_staff(&Actor { user_id: 1, is_staff: false }).unwrap_err();
        assert!(matches!(err, CoreError::Forbidden(_)));
    }
}
