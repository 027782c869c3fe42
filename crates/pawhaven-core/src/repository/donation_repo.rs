//! 捐赠仓储
//!
//! 状态变更与金额计入必须在同一事务中完成，写入接口因此只接受连接参数

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{Donation, DonationStatus, NewDonation};

const DONATION_COLUMNS: &str = "id, post_id, donor_id, amount, payment_method, reference_id, \
                                message, status, verified_by, verified_at, receipt_image, \
                                is_manual, created_at";

pub struct DonationRepository {
    pool: PgPool,
}

impl DonationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 查询操作 ====================

    pub async fn find(&self, id: i64) -> Result<Option<Donation>> {
        let donation = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(donation)
    }

    pub async fn list(
        &self,
        post_id: Option<i64>,
        status: Option<DonationStatus>,
        limit: i64,
    ) -> Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(&format!(
            r#"
            SELECT {DONATION_COLUMNS} FROM donations
            WHERE ($1::bigint IS NULL OR post_id = $1)
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            "#
        ))
        .bind(post_id)
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    /// 待审核的手动捐赠
    pub async fn list_pending_manual(&self) -> Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(&format!(
            r#"
            SELECT {DONATION_COLUMNS} FROM donations
            WHERE is_manual AND status = 'pending'
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn list_by_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donor_id = $1 \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    pub async fn list_verified_for_post(&self, post_id: i64) -> Result<Vec<Donation>> {
        let donations = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE post_id = $1 AND status = 'verified' \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(donations)
    }

    // ==================== 事务内操作 ====================

    /// 新建捐赠；直接以 verified 创建时同时记录确认时间
    pub async fn insert(conn: &mut PgConnection, donation: &NewDonation) -> Result<Donation> {
        let verified_at = (donation.status == DonationStatus::Verified).then(Utc::now);

        let created = sqlx::query_as::<_, Donation>(&format!(
            r#"
            INSERT INTO donations (post_id, donor_id, amount, payment_method, reference_id,
                                   message, status, verified_at, receipt_image, is_manual)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(donation.post_id)
        .bind(donation.donor_id)
        .bind(donation.amount)
        .bind(&donation.payment_method)
        .bind(&donation.reference_id)
        .bind(&donation.message)
        .bind(donation.status)
        .bind(verified_at)
        .bind(donation.receipt_image.as_deref())
        .bind(donation.is_manual)
        .fetch_one(conn)
        .await?;
        Ok(created)
    }

    /// 捐赠所属帖子，加锁前定位帖子行
    pub async fn post_id_of(conn: &mut PgConnection, id: i64) -> Result<Option<i64>> {
        let post_id = sqlx::query_scalar::<_, i64>("SELECT post_id FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(post_id)
    }

    /// 锁定捐赠行，防止同一笔捐赠被并发审核两次
    pub async fn lock_for_update(conn: &mut PgConnection, id: i64) -> Result<Option<Donation>> {
        let donation = sqlx::query_as::<_, Donation>(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(donation)
    }

    /// 写入审核结果
    pub async fn record_review(
        conn: &mut PgConnection,
        id: i64,
        status: DonationStatus,
        reviewer_id: i64,
        message: &str,
    ) -> Result<Donation> {
        let donation = sqlx::query_as::<_, Donation>(&format!(
            r#"
            UPDATE donations
            SET status = $2, verified_by = $3, verified_at = NOW(), message = $4
            WHERE id = $1
            RETURNING {DONATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(reviewer_id)
        .bind(message)
        .fetch_one(conn)
        .await?;
        Ok(donation)
    }
}
