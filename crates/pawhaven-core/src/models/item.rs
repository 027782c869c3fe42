//! 物资与上门取件实体
//!
//! 物资由捐赠者发布、其他用户认领；上门取件由运营指派志愿者跟进。

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{ItemStatus, ItemType, VolunteerItemType, VolunteerStatus};
use super::user::Actor;
use crate::error::{CoreError, Result};

/// 待认领物资
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub donor_id: i64,
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub location: String,
    pub contact_info: String,
    pub status: ItemStatus,
    pub claimed_by: Option<i64>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 发布物资参数
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub location: String,
    pub contact_info: String,
}

/// 上门取件的物资捐赠
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VolunteerDonation {
    pub id: i64,
    pub donor_id: i64,
    pub item_type: VolunteerItemType,
    pub description: String,
    pub quantity: String,
    pub estimated_value: Option<Decimal>,
    pub pickup_location: String,
    pub contact_number: String,
    pub available_times: String,
    pub special_instructions: String,
    pub status: VolunteerStatus,
    pub assigned_volunteer: Option<i64>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub collected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerDonation {
    /// 指派或撤销志愿者
    ///
    /// 撤销后回到 pending 并清空指派时间。
    pub fn assign(&mut self, volunteer_id: Option<i64>, now: DateTime<Utc>) {
        match volunteer_id {
            Some(id) => {
                self.assigned_volunteer = Some(id);
                self.status = VolunteerStatus::Assigned;
                self.assigned_at = Some(now);
            }
            None => {
                self.assigned_volunteer = None;
                self.status = VolunteerStatus::Pending;
                self.assigned_at = None;
            }
        }
    }

    /// 运营或已指派的志愿者可更新进度
    pub fn can_update_status(&self, actor: &Actor) -> bool {
        actor.is_staff || self.assigned_volunteer == Some(actor.user_id)
    }

    /// 更新进度，进入 collected 时记录取件时间
    pub fn set_status(&mut self, status: VolunteerStatus, now: DateTime<Utc>) -> Result<()> {
        if status == VolunteerStatus::Assigned && self.assigned_volunteer.is_none() {
            return Err(CoreError::Validation(
                "Assign a volunteer before marking the donation as assigned".to_string(),
            ));
        }
        if status == VolunteerStatus::Collected {
            self.collected_at = Some(now);
        }
        self.status = status;
        Ok(())
    }
}

/// 上门取件登记参数
#[derive(Debug, Clone)]
pub struct NewVolunteerDonation {
    pub item_type: VolunteerItemType,
    pub description: String,
    pub quantity: String,
    pub estimated_value: Option<Decimal>,
    pub pickup_location: String,
    pub contact_number: String,
    pub available_times: String,
    pub special_instructions: String,
}
