//! 物资与上门取件仓储
//!
//! 认领用带状态条件的 UPDATE 完成，并发认领只有一个能命中。
//! 上门取件的指派与进度变更在事务内先 `lock_volunteer_donation` 再写回。

use sqlx::{PgConnection, PgPool};

use crate::error::Result;
use crate::models::{Item, ItemType, NewItem, NewVolunteerDonation, VolunteerDonation};

const ITEM_COLUMNS: &str = "id, donor_id, title, description, item_type, location, contact_info, \
                            status, claimed_by, claimed_at, created_at, updated_at";

const VOLUNTEER_COLUMNS: &str = "id, donor_id, item_type, description, quantity, estimated_value, \
                                 pickup_location, contact_number, available_times, \
                                 special_instructions, status, assigned_volunteer, assigned_at, \
                                 collected_at, created_at, updated_at";

pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 物资 ====================

    /// 可认领的物资，最新的在前
    pub async fn list_available(
        &self,
        item_type: Option<ItemType>,
        limit: i64,
    ) -> Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(&format!(
            r#"
            SELECT {ITEM_COLUMNS} FROM items
            WHERE status = 'available' AND ($1::varchar IS NULL OR item_type = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        ))
        .bind(item_type)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn create(&self, donor_id: i64, item: &NewItem) -> Result<Item> {
        let created = sqlx::query_as::<_, Item>(&format!(
            r#"
            INSERT INTO items (donor_id, title, description, item_type, location, contact_info)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(donor_id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.item_type)
        .bind(&item.location)
        .bind(&item.contact_info)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// 认领仍为 available 的物资，已被认领或不存在时返回 None
    pub async fn claim(&self, id: i64, user_id: i64) -> Result<Option<Item>> {
        let claimed = sqlx::query_as::<_, Item>(&format!(
            r#"
            UPDATE items SET
                status = 'claimed',
                claimed_by = $2,
                claimed_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claimed)
    }

    // ==================== 上门取件 ====================

    /// 全部登记，运营视图
    pub async fn list_volunteer_donations(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VolunteerDonation>> {
        let donations = sqlx::query_as::<_, VolunteerDonation>(&format!(
            r#"
            SELECT {VOLUNTEER_COLUMNS} FROM volunteer_donations
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    /// 用户自己登记的以及指派给他的
    pub async fn list_volunteer_donations_for(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<VolunteerDonation>> {
        let donations = sqlx::query_as::<_, VolunteerDonation>(&format!(
            r#"
            SELECT {VOLUNTEER_COLUMNS} FROM volunteer_donations
            WHERE donor_id = $1 OR assigned_volunteer = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(donations)
    }

    pub async fn create_volunteer_donation(
        &self,
        donor_id: i64,
        donation: &NewVolunteerDonation,
    ) -> Result<VolunteerDonation> {
        let created = sqlx::query_as::<_, VolunteerDonation>(&format!(
            r#"
            INSERT INTO volunteer_donations (donor_id, item_type, description, quantity,
                                             estimated_value, pickup_location, contact_number,
                                             available_times, special_instructions)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {VOLUNTEER_COLUMNS}
            "#
        ))
        .bind(donor_id)
        .bind(donation.item_type)
        .bind(&donation.description)
        .bind(&donation.quantity)
        .bind(donation.estimated_value)
        .bind(&donation.pickup_location)
        .bind(&donation.contact_number)
        .bind(&donation.available_times)
        .bind(&donation.special_instructions)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// 锁定登记行（SELECT ... FOR UPDATE）
    pub async fn lock_volunteer_donation(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<VolunteerDonation>> {
        let donation = sqlx::query_as::<_, VolunteerDonation>(&format!(
            "SELECT {VOLUNTEER_COLUMNS} FROM volunteer_donations WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(donation)
    }

    /// 写回指派与进度字段，调用方须已持有行锁
    pub async fn save_volunteer_donation(
        conn: &mut PgConnection,
        donation: &VolunteerDonation,
    ) -> Result<VolunteerDonation> {
        let saved = sqlx::query_as::<_, VolunteerDonation>(&format!(
            r#"
            UPDATE volunteer_donations SET
                status = $2,
                assigned_volunteer = $3,
                assigned_at = $4,
                collected_at = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VOLUNTEER_COLUMNS}
            "#
        ))
        .bind(donation.id)
        .bind(donation.status)
        .bind(donation.assigned_volunteer)
        .bind(donation.assigned_at)
        .bind(donation.collected_at)
        .fetch_one(conn)
        .await?;

        Ok(saved)
    }
}
