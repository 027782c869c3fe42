//! 捐赠实体与状态流转

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::DonationStatus;
use crate::error::{CoreError, Result};

/// 手动捐赠的支付方式
pub const MANUAL_PAYMENT_METHOD: &str = "manual";

/// 捐赠记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: i64,
    pub post_id: i64,
    pub donor_id: i64,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_id: String,
    pub message: String,
    pub status: DonationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub receipt_image: Option<String>,
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// 校验状态流转是否合法
    ///
    /// 只允许 pending -> verified / rejected。
    pub fn ensure_transition(&self, to: DonationStatus) -> Result<()> {
        if self.status != DonationStatus::Pending || to == DonationStatus::Pending {
            return Err(CoreError::DonationAlreadyReviewed(self.id));
        }
        Ok(())
    }

    /// 运营审核时追加备注
    pub fn message_with_admin_notes(&self, notes: Option<&str>) -> String {
        match notes.map(str::trim).filter(|n| !n.is_empty()) {
            Some(notes) => format!("{}\n\nAdmin Notes: {}", self.message, notes),
            None => self.message.clone(),
        }
    }
}

/// 新建捐赠
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub post_id: i64,
    pub donor_id: i64,
    pub amount: Decimal,
    pub payment_method: String,
    pub reference_id: String,
    pub message: String,
    pub status: DonationStatus,
    pub receipt_image: Option<String>,
    pub is_manual: bool,
}

/// 生成带前缀的参考号，如 MANUAL_1A2B3C4D
pub fn generate_reference(prefix: &str) -> String {
    let simple = uuid::Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, simple[..8].to_uppercase())
}

/// 帖子的已确认捐赠汇总
#[derive(Debug, Clone, Serialize)]
pub struct PostDonationSummary {
    pub donations: Vec<Donation>,
    pub total_amount: Decimal,
    pub total_donations: usize,
}

impl PostDonationSummary {
    pub fn from_verified(donations: Vec<Donation>) -> Self {
        let total_amount = donations.iter().map(|d| d.amount).sum();
        let total_donations = donations.len();
        Self {
            donations,
            total_amount,
            total_donations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donation(status: DonationStatus) -> Donation {
        Donation {
            id: 3,
            post_id: 1,
            donor_id: 2,
            amount: Decimal::new(20_00, 2),
            payment_method: MANUAL_PAYMENT_METHOD.to_string(),
            reference_id: "MANUAL_ABCDEF12".to_string(),
            message: "For Luna".to_string(),
            status,
            verified_by: None,
            verified_at: None,
            receipt_image: Some("receipts/a.png".to_string()),
            is_manual: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_can_be_verified_or_rejected() {
        let d = donation(DonationStatus::Pending);
        assert!(d.ensure_transition(DonationStatus::Verified).is_ok());
        assert!(d.ensure_transition(DonationStatus::Rejected).is_ok());
        assert!(d.ensure_transition(DonationStatus::Pending).is_err());
    }

    #[test]
    fn test_terminal_states_are_final() {
        for status in [DonationStatus::Verified, DonationStatus::Rejected] {
            let d = donation(status);
            for to in [DonationStatus::Verified, DonationStatus::Rejected] {
                let err = d.ensure_transition(to).unwrap_err();
                assert!(matches!(err, CoreError::DonationAlreadyReviewed(3)));
            }
        }
    }

    #[test]
    fn test_admin_notes_are_appended() {
        let d = donation(DonationStatus::Pending);
        assert_eq!(
            d.message_with_admin_notes(Some("receipt checked")),
            "For Luna\n\nAdmin Notes: receipt checked"
        );
        assert_eq!(d.message_with_admin_notes(Some("  ")), "For Luna");
        assert_eq!(d.message_with_admin_notes(None), "For Luna");
    }

    #[test]
    fn test_generate_reference() {
        let reference = generate_reference("MANUAL");
        assert!(reference.starts_with("MANUAL_"));
        let suffix = &reference["MANUAL_".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_post_summary_totals() {
        let summary = PostDonationSummary::from_verified(vec![
            donation(DonationStatus::Verified),
            donation(DonationStatus::Verified),
        ]);
        assert_eq!(summary.total_donations, 2);
        assert_eq!(summary.total_amount, Decimal::new(40_00, 2));
    }
}
