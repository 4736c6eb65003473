//! Reward rule: the reporter's payout is a percentage of the challan fine.

use chrono::{DateTime, Utc};

use crate::features::reports::models::ReportRecord;

/// `round(fine_amount * percentage / 100)`, rounding halves up.
///
/// Integer arithmetic keeps the result exact. Negative fines are treated as
/// zero so the reward is never negative.
pub fn compute_reward(fine_amount: i64, percentage: u32) -> i64 {
    let fine = fine_amount.max(0) as i128;
    let scaled = fine * percentage as i128;
    let rounded = (scaled + 50) / 100;
    rounded.min(i64::MAX as i128) as i64
}

/// Derive `reward.amount` from the challan fine the first time a fine exists.
///
/// Returns `true` when the reward was set by this call. Once derived the
/// amount is frozen, even when it came out as 0 or the fine changes later.
pub fn apply_reward(record: &mut ReportRecord, percentage: u32, now: DateTime<Utc>) -> bool {
    if record.reward.computed_at.is_some() || record.reward.amount != 0 {
        return false;
    }

    let Some(fine_amount) = record.fine_amount() else {
        return false;
    };

    record.reward.amount = compute_reward(fine_amount, percentage);
    record.reward.computed_at = Some(now);
    true
}
