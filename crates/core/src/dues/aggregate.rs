//! Dashboard totals over a dues ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{BillingPeriod, PeriodStatus};

/// Number of periods per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Paid exactly.
    pub paid: usize,
    /// Paid with surplus.
    pub paid_with_surplus: usize,
    /// Partially paid.
    pub partial: usize,
    /// Pending.
    pub pending: usize,
    /// Overdue.
    pub overdue: usize,
}

impl StatusCounts {
    fn bump(&mut self, status: PeriodStatus) {
        match status {
            PeriodStatus::Paid => self.paid += 1,
            PeriodStatus::PaidWithSurplus => self.paid_with_surplus += 1,
            PeriodStatus::Partial => self.partial += 1,
            PeriodStatus::Pending => self.pending += 1,
            PeriodStatus::Overdue => self.overdue += 1,
        }
    }
}

/// Totals for the summary cards.
///
/// Principal and surcharge are kept apart: `total_overdue` never includes
/// `total_surcharge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    /// Σ amount paid over paid periods.
    pub total_paid: Decimal,
    /// Σ unpaid principal over pending periods.
    pub total_pending: Decimal,
    /// Σ unpaid principal over partial periods.
    pub total_partial_remaining: Decimal,
    /// Σ unpaid principal over overdue periods.
    pub total_overdue: Decimal,
    /// Σ surcharge.
    pub total_surcharge: Decimal,
    /// Σ amount paid over every period, whatever its status.
    pub total_collected: Decimal,
    /// Everything still owed, surcharge included.
    pub balance_due: Decimal,
    /// Periods per status.
    pub counts: StatusCounts,
    /// Number of periods folded.
    pub period_count: usize,
}

impl LedgerSummary {
    /// Folds a ledger into totals. The result does not depend on the order of
    /// `periods`.
    #[must_use]
    pub fn from_periods(periods: &[BillingPeriod]) -> Self {
        let mut summary = periods.iter().fold(Self::default(), |mut acc, p| {
            acc.counts.bump(p.status);
            acc.period_count += 1;
            acc.total_collected += p.amount_paid;
            acc.total_surcharge += p.surcharge;

            let unpaid = p.due_amount - p.amount_paid;
            match p.status {
                PeriodStatus::Paid | PeriodStatus::PaidWithSurplus => {
                    acc.total_paid += p.amount_paid;
                }
                PeriodStatus::Pending => acc.total_pending += unpaid,
                PeriodStatus::Partial => acc.total_partial_remaining += unpaid,
                PeriodStatus::Overdue => acc.total_overdue += unpaid,
            }
            acc
        });

        summary.balance_due = summary.total_pending
            + summary.total_partial_remaining
            + summary.total_overdue
            + summary.total_surcharge;
        summary
    }

    /// Number of periods with something still owed.
    #[must_use]
    pub const fn unpaid_count(&self) -> usize {
        self.counts.partial + self.counts.pending + self.counts.overdue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dues::period::PeriodKey;
    use rust_decimal_macros::dec;

    fn line(month: u32, paid: Decimal, status: PeriodStatus, surcharge: Decimal) -> BillingPeriod {
        let period = PeriodKey::new(2024, month).unwrap();
        BillingPeriod {
            period,
            due_amount: dec!(200),
            amount_paid: paid,
            status,
            due_date: period.due_date(),
            days_overdue: 0,
            surcharge,
            source_record_id: None,
            es_adelanto: false,
        }
    }

    #[test]
    fn test_totals_by_bucket() {
        let periods = vec![
            line(1, dec!(200), PeriodStatus::Paid, dec!(0)),
            line(2, dec!(250), PeriodStatus::PaidWithSurplus, dec!(0)),
            line(3, dec!(50), PeriodStatus::Overdue, dec!(40)),
            line(4, dec!(0), PeriodStatus::Overdue, dec!(20)),
            line(5, dec!(120), PeriodStatus::Partial, dec!(0)),
            line(6, dec!(0), PeriodStatus::Pending, dec!(0)),
        ];

        let summary = LedgerSummary::from_periods(&periods);

        assert_eq!(summary.total_paid, dec!(450));
        assert_eq!(summary.total_overdue, dec!(350));
        assert_eq!(summary.total_surcharge, dec!(60));
        assert_eq!(summary.total_partial_remaining, dec!(80));
        assert_eq!(summary.total_pending, dec!(200));
        assert_eq!(summary.total_collected, dec!(620));
        assert_eq!(summary.balance_due, dec!(690));
        assert_eq!(summary.period_count, 6);
        assert_eq!(
            summary.counts,
            StatusCounts {
                paid: 1,
                paid_with_surplus: 1,
                partial: 1,
                pending: 1,
                overdue: 2,
            }
        );
        assert_eq!(summary.unpaid_count(), 4);
    }

    #[test]
    fn test_empty_ledger() {
        let summary = LedgerSummary::from_periods(&[]);
        assert_eq!(summary, LedgerSummary::default());
        assert_eq!(summary.balance_due, dec!(0));
    }
}
