//! 物资服务
//!
//! 物资发布与认领，上门取件登记、志愿者指派与进度更新。

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::error::{CoreError, Result};
use crate::models::{
    Actor, Item, ItemType, NewItem, NewVolunteerDonation, VolunteerDonation, VolunteerStatus,
    ensure_storable,
};
use crate::repository::{ItemRepository, UserRepository};

/// 默认列表条数
pub const DEFAULT_ITEM_LIMIT: i64 = 50;

fn check_len(value: &str, max: usize, field: &str) -> Result<()> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

fn required(value: &mut String, max: usize, field: &str) -> Result<()> {
    *value = value.trim().to_string();
    if value.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    check_len(value, max, field)
}

fn validate_new_item(item: &mut NewItem) -> Result<()> {
    required(&mut item.title, 255, "title")?;
    check_len(&item.location, 255, "location")?;
    check_len(&item.contact_info, 255, "contact_info")
}

fn validate_new_volunteer_donation(donation: &mut NewVolunteerDonation) -> Result<()> {
    required(&mut donation.description, usize::MAX, "description")?;
    required(&mut donation.pickup_location, 500, "pickup_location")?;
    required(&mut donation.contact_number, 50, "contact_number")?;
    check_len(&donation.quantity, 100, "quantity")?;
    check_len(&donation.available_times, 500, "available_times")?;
    check_len(&donation.special_instructions, 1000, "special_instructions")?;

    if let Some(value) = donation.estimated_value {
        if value < Decimal::ZERO {
            return Err(CoreError::Validation(
                "estimated_value must not be negative".to_string(),
            ));
        }
        ensure_storable(value, "estimated_value")?;
    }
    Ok(())
}

fn ensure_staff(actor: &Actor) -> Result<()> {
    if !actor.is_staff {
        return Err(CoreError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

pub struct ItemService {
    pool: PgPool,
    item_repo: Arc<ItemRepository>,
    user_repo: Arc<UserRepository>,
}

impl ItemService {
    pub fn new(
        pool: PgPool,
        item_repo: Arc<ItemRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            pool,
            item_repo,
            user_repo,
        }
    }

    // ==================== 物资 ====================

    pub async fn list_available(
        &self,
        item_type: Option<ItemType>,
        limit: Option<i64>,
    ) -> Result<Vec<Item>> {
        let limit = limit.unwrap_or(DEFAULT_ITEM_LIMIT).clamp(1, 200);
        self.item_repo.list_available(item_type, limit).await
    }

    #[instrument(skip(self, item), fields(item_type = ?item.item_type))]
    pub async fn create(&self, donor_id: i64, mut item: NewItem) -> Result<Item> {
        validate_new_item(&mut item)?;
        let created = self.item_repo.create(donor_id, &item).await?;
        info!(item_id = created.id, "物资已发布");
        Ok(created)
    }

    /// 认领物资，每件物资只能被认领一次
    #[instrument(skip(self))]
    pub async fn claim(&self, user_id: i64, id: i64) -> Result<Item> {
        if let Some(item) = self.item_repo.claim(id, user_id).await? {
            info!(item_id = id, claimed_by = user_id, "物资已被认领");
            return Ok(item);
        }
        match self.item_repo.find(id).await? {
            Some(_) => Err(CoreError::ItemAlreadyClaimed(id)),
            None => Err(CoreError::ItemNotFound(id)),
        }
    }

    // ==================== 上门取件 ====================

    /// 运营看到全部登记，其他用户看到自己登记或被指派的
    pub async fn list_volunteer_donations(
        &self,
        actor: &Actor,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<VolunteerDonation>> {
        let limit = limit.unwrap_or(DEFAULT_ITEM_LIMIT).clamp(1, 200);
        let offset = offset.unwrap_or(0).max(0);
        if actor.is_staff {
            self.item_repo.list_volunteer_donations(limit, offset).await
        } else {
            self.item_repo
                .list_volunteer_donations_for(actor.user_id, limit, offset)
                .await
        }
    }

    #[instrument(skip(self, donation), fields(item_type = ?donation.item_type))]
    pub async fn create_volunteer_donation(
        &self,
        donor_id: i64,
        mut donation: NewVolunteerDonation,
    ) -> Result<VolunteerDonation> {
        validate_new_volunteer_donation(&mut donation)?;
        let created = self
            .item_repo
            .create_volunteer_donation(donor_id, &donation)
            .await?;
        info!(volunteer_donation_id = created.id, "上门取件已登记");
        Ok(created)
    }

    /// 运营指派志愿者，`None` 撤销指派
    #[instrument(skip(self))]
    pub async fn assign_volunteer(
        &self,
        actor: Actor,
        id: i64,
        volunteer_id: Option<i64>,
    ) -> Result<VolunteerDonation> {
        ensure_staff(&actor)?;
        if let Some(volunteer_id) = volunteer_id {
            self.user_repo
                .find_by_id(volunteer_id)
                .await?
                .ok_or(CoreError::UserNotFound(volunteer_id))?;
        }

        let mut tx = self.pool.begin().await?;
        let mut donation = ItemRepository::lock_volunteer_donation(&mut tx, id)
            .await?
            .ok_or(CoreError::VolunteerDonationNotFound(id))?;
        donation.assign(volunteer_id, Utc::now());
        let saved = ItemRepository::save_volunteer_donation(&mut tx, &donation).await?;
        tx.commit().await?;

        info!(volunteer_donation_id = id, volunteer_id, "志愿者指派已更新");
        Ok(saved)
    }

    /// 运营或已指派的志愿者更新进度
    #[instrument(skip(self))]
    pub async fn update_volunteer_status(
        &self,
        actor: Actor,
        id: i64,
        status: VolunteerStatus,
    ) -> Result<VolunteerDonation> {
        let mut tx = self.pool.begin().await?;
        let mut donation = ItemRepository::lock_volunteer_donation(&mut tx, id)
            .await?
            .ok_or(CoreError::VolunteerDonationNotFound(id))?;
        if !donation.can_update_status(&actor) {
            return Err(CoreError::Forbidden(
                "Not authorized to update this donation".to_string(),
            ));
        }

        donation.set_status(status, Utc::now())?;
        let saved = ItemRepository::save_volunteer_donation(&mut tx, &donation).await?;
        tx.commit().await?;

        info!(volunteer_donation_id = id, status = ?saved.status, "上门取件进度已更新");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VolunteerItemType;

    fn new_item() -> NewItem {
        NewItem {
            title: " Dog bed ".to_string(),
            description: String::new(),
            item_type: ItemType::Accessory,
            location: "Downtown".to_string(),
            contact_info: String::new(),
        }
    }

    fn new_pickup() -> NewVolunteerDonation {
        NewVolunteerDonation {
            item_type: VolunteerItemType::Mixed,
            description: " Toys and a leash ".to_string(),
            quantity: "1 box".to_string(),
            estimated_value: Some(Decimal::new(25_00, 2)),
            pickup_location: "12 Elm St".to_string(),
            contact_number: "555-0100".to_string(),
            available_times: String::new(),
            special_instructions: String::new(),
        }
    }

    #[test]
    fn test_new_item_validation() {
        let mut item = new_item();
        validate_new_item(&mut item).unwrap();
        assert_eq!(item.title, "Dog bed");

        let mut item = new_item();
        item.title = " ".to_string();
        assert!(matches!(validate_new_item(&mut item), Err(CoreError::Validation(_))));

        let mut item = new_item();
        item.location = "l".repeat(256);
        assert!(validate_new_item(&mut item).is_err());
    }

    #[test]
    fn test_pickup_requires_contact_details() {
        let mut pickup = new_pickup();
        validate_new_volunteer_donation(&mut pickup).unwrap();
        assert_eq!(pickup.description, "Toys and a leash");

        for blank in ["description", "pickup_location", "contact_number"] {
            let mut pickup = new_pickup();
            match blank {
                "description" => pickup.description.clear(),
                "pickup_location" => pickup.pickup_location.clear(),
                _ => pickup.contact_number.clear(),
            }
            let err = validate_new_volunteer_donation(&mut pickup).unwrap_err();
            assert_eq!(err.to_string(), format!("{blank} is required"));
        }

        let mut pickup = new_pickup();
        pickup.contact_number = "5".repeat(51);
        assert!(validate_new_volunteer_donation(&mut pickup).is_err());
    }

    #[test]
    fn test_estimated_value_must_fit_column() {
        let mut pickup = new_pickup();
        pickup.estimated_value = None;
        assert!(validate_new_volunteer_donation(&mut pickup).is_ok());

        for value in [
            Decimal::new(-1_00, 2),
            Decimal::from(10_000_000_000_i64),
            Decimal::new(1_005, 3),
        ] {
            let mut pickup = new_pickup();
            pickup.estimated_value = Some(value);
            let err = validate_new_volunteer_donation(&mut pickup).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{value}");
        }
    }
}
