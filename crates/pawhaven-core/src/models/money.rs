//! 金额约束
//!
//! 金额列为 `NUMERIC(12, 2)`：整数部分最多 10 位，小数最多 2 位。

use rust_decimal::Decimal;

use crate::error::{CoreError, Result};

/// 小数位上限
pub const MONEY_SCALE: u32 = 2;

/// 金额上限（不含），10^10
pub fn money_ceiling() -> Decimal {
    Decimal::from(10_000_000_000_i64)
}

/// 检查金额能否写入金额列
///
/// 末尾的零不计入小数位，`10.500` 视为 `10.5`。
pub fn ensure_storable(value: Decimal, field: &str) -> Result<()> {
    if value.abs() >= money_ceiling() {
        return Err(CoreError::Validation(format!(
            "{field} must be less than 10000000000"
        )));
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(CoreError::Validation(format!(
            "{field} must have at most {MONEY_SCALE} decimal places"
        )));
    }
    Ok(())
}
