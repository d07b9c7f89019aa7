//! Account statement for one resident.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fracc_shared::types::{Currency, Money, ResidentId};

use crate::dues::{BillingPeriod, LedgerSummary, PeriodKey};

/// A resident's ledger with its totals, as of a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStatement {
    /// Report type identifier.
    pub report_type: String,
    /// Resident the statement belongs to.
    pub resident_id: ResidentId,
    /// Day the ledger was evaluated on.
    pub as_of: NaiveDate,
    /// Ledger lines, oldest first.
    pub periods: Vec<BillingPeriod>,
    /// Totals over `periods`.
    pub summary: LedgerSummary,
    /// Oldest month with something still owed.
    pub oldest_unpaid: Option<PeriodKey>,
    /// Everything still owed, surcharge included.
    pub balance_due: Money,
}

impl AccountStatement {
    /// Builds the statement. Lines are sorted by period whatever their input
    /// order.
    #[must_use]
    pub fn new(
        resident_id: ResidentId,
        mut periods: Vec<BillingPeriod>,
        as_of: NaiveDate,
        currency: Currency,
    ) -> Self {
        periods.sort_by_key(|p| p.period);
        let summary = LedgerSummary::from_periods(&periods);
        let oldest_unpaid = periods.iter().find(|p| !p.is_settled()).map(|p| p.period);
        let balance_due = Money::new(summary.balance_due, currency);

        Self {
            report_type: "account_statement".to_string(),
            resident_id,
            as_of,
            periods,
            summary,
            oldest_unpaid,
            balance_due,
        }
    }

    /// Returns true when nothing is owed.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.oldest_unpaid.is_none()
    }
}
