//! Status, overdue days and surcharge for a single billing period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use fracc_shared::types::round_money;

use super::period::PeriodKey;
use super::types::{BillingParameters, BillingPeriod, PaymentRecord, PeriodStatus};

/// Length of one surcharge block in days.
pub const SURCHARGE_BLOCK_DAYS: i64 = 30;

/// Classifies billing periods.
pub struct StatusClassifier;

impl StatusClassifier {
    /// Produces the ledger line for `period`.
    ///
    /// Order of rules:
    /// 1. A record already marked paid keeps its status, with no surcharge.
    /// 2. A record with nothing left to pay: `Paid` (exact) or
    ///    `PaidWithSurplus`.
    /// 3. Past the deadline plus grace: `Overdue` with a surcharge of
    ///    `due × rate% × ceil(days / 30)`.
    /// 4. Some payment on record: `Partial`.
    /// 5. Otherwise `Pending`.
    ///
    /// Advance periods never accrue overdue days, so they never reach rule 3.
    #[must_use]
    pub fn classify(
        period: PeriodKey,
        record: Option<&PaymentRecord>,
        today: NaiveDate,
        params: &BillingParameters,
        advance: bool,
    ) -> BillingPeriod {
        let due_date = period.due_date();
        let due_amount =
            record.map_or_else(|| params.fee_schedule.fee_for(period), |r| r.due_amount);
        let amount_paid = record.map_or(Decimal::ZERO, |r| r.amount_paid);

        let line = BillingPeriod {
            period,
            due_amount,
            amount_paid,
            status: PeriodStatus::Pending,
            due_date,
            days_overdue: 0,
            surcharge: Decimal::ZERO,
            source_record_id: record.map(|r| r.id),
            es_adelanto: advance,
        };

        if let Some(recorded) = record.map(|r| r.status).filter(PeriodStatus::is_settled) {
            return BillingPeriod {
                status: recorded,
                ..line
            };
        }

        let remaining = due_amount - amount_paid;
        if record.is_some() && remaining <= Decimal::ZERO {
            let status = if remaining.is_zero() {
                PeriodStatus::Paid
            } else {
                PeriodStatus::PaidWithSurplus
            };
            return BillingPeriod { status, ..line };
        }

        let days_overdue = if advance {
            0
        } else {
            Self::days_overdue(due_date, today, params.grace_period_days)
        };

        if days_overdue > 0 {
            return BillingPeriod {
                status: PeriodStatus::Overdue,
                days_overdue,
                surcharge: Self::surcharge(due_amount, params.surcharge_rate_percent, days_overdue),
                ..line
            };
        }

        let status = if record.is_some() && amount_paid > Decimal::ZERO {
            PeriodStatus::Partial
        } else {
            PeriodStatus::Pending
        };
        BillingPeriod { status, ..line }
    }

    /// Whole days past `due_date`, minus the grace period, floored at zero.
    #[must_use]
    pub fn days_overdue(due_date: NaiveDate, today: NaiveDate, grace_period_days: u32) -> i64 {
        let late = (today - due_date).num_days() - i64::from(grace_period_days);
        late.max(0)
    }

    /// Penalty for `days_overdue` days: one full rate per started 30-day block.
    #[must_use]
    pub fn surcharge(due_amount: Decimal, rate_percent: Decimal, days_overdue: i64) -> Decimal {
        if days_overdue <= 0 {
            return Decimal::ZERO;
        }
        let blocks = (days_overdue + SURCHARGE_BLOCK_DAYS - 1) / SURCHARGE_BLOCK_DAYS;
        round_money(due_amount * rate_percent / Decimal::ONE_HUNDRED * Decimal::from(blocks))
    }
}
