//! Planning a single payment across several selected periods.
//!
//! The plan is computed locally before any network call so that input
//! errors never reach the backend, and so the operator can preview which
//! periods the tender will clear.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_shared::types::PaymentRecordId;

use super::error::SettlementError;
use super::period::PeriodKey;
use super::types::{BillingPeriod, NewPaymentRecord, PeriodStatus, Resident};

/// The payment handed over by the resident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Payment method (cash, transfer, card...).
    pub method: String,
    /// Bank or receipt reference.
    pub reference: Option<String>,
    /// Total amount handed over.
    pub amount: Decimal,
}

/// How much of the tender lands on one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodAllocation {
    /// The ledger line as selected.
    pub line: BillingPeriod,
    /// Remaining principal plus surcharge before this payment.
    pub owed: Decimal,
    /// Part of the tender applied to principal.
    pub principal_applied: Decimal,
    /// Part of the tender applied to surcharge.
    pub surcharge_applied: Decimal,
    /// Status the period will have once the payment is applied.
    pub resulting_status: PeriodStatus,
}

impl PeriodAllocation {
    /// Total applied to this period.
    #[must_use]
    pub fn applied(&self) -> Decimal {
        self.principal_applied + self.surcharge_applied
    }
}

/// Result of planning a multi-period payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPlan {
    /// Tender being applied.
    pub tender: Tender,
    /// One allocation per selected period, oldest first.
    pub allocations: Vec<PeriodAllocation>,
    /// Σ owed over the selection.
    pub total_owed: Decimal,
    /// Σ applied over the selection.
    pub total_applied: Decimal,
    /// Tender left over after every selected period is cleared.
    pub excedente: Decimal,
}

impl SettlementPlan {
    /// Records that must exist before the payment can be applied, one per
    /// selected period with no backing record.
    #[must_use]
    pub fn missing_records(&self, resident: &Resident) -> Vec<NewPaymentRecord> {
        self.allocations
            .iter()
            .filter(|a| a.line.source_record_id.is_none())
            .map(|a| NewPaymentRecord::pending_for(resident, &a.line))
            .collect()
    }

    /// Periods the payment targets, oldest first, paired with their record
    /// if one exists.
    #[must_use]
    pub fn slots(&self) -> Vec<(PeriodKey, Option<PaymentRecordId>)> {
        self.allocations
            .iter()
            .map(|a| (a.line.period, a.line.source_record_id))
            .collect()
    }

    /// Part of the tender that goes to principal.
    #[must_use]
    pub fn principal_applied(&self) -> Decimal {
        self.allocations.iter().map(|a| a.principal_applied).sum()
    }

    /// Part of the tender that goes to surcharge. The backend books it apart
    /// from principal, so it must travel with the payment.
    #[must_use]
    pub fn surcharge_applied(&self) -> Decimal {
        self.allocations.iter().map(|a| a.surcharge_applied).sum()
    }

    /// Returns true when the tender clears every selected period.
    #[must_use]
    pub fn settles_everything(&self) -> bool {
        self.total_applied >= self.total_owed
    }
}

/// Plans multi-period payments.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Spreads `tender` over `selected`, oldest period first.
    ///
    /// Within a period the principal is cleared before the surcharge. Any
    /// amount beyond the total owed is reported as `excedente`.
    ///
    /// # Errors
    ///
    /// Input errors, raised before anything is sent to the backend:
    /// - `SettlementError::NoPeriodsSelected`
    /// - `SettlementError::NonPositiveAmount`
    /// - `SettlementError::MissingPaymentMethod`
    /// - `SettlementError::DuplicateSelection`
    /// - `SettlementError::AlreadySettled`
    pub fn plan(
        selected: &[BillingPeriod],
        tender: &Tender,
    ) -> Result<SettlementPlan, SettlementError> {
        if selected.is_empty() {
            return Err(SettlementError::NoPeriodsSelected);
        }
        if tender.amount <= Decimal::ZERO {
            return Err(SettlementError::NonPositiveAmount(tender.amount));
        }
        if tender.method.trim().is_empty() {
            return Err(SettlementError::MissingPaymentMethod);
        }

        let mut seen = BTreeSet::new();
        for line in selected {
            if !seen.insert(line.period) {
                return Err(SettlementError::DuplicateSelection(line.period));
            }
            if line.is_settled() {
                return Err(SettlementError::AlreadySettled(line.period));
            }
        }

        let mut ordered: Vec<&BillingPeriod> = selected.iter().collect();
        ordered.sort_by_key(|line| line.period);

        let mut left = tender.amount;
        let mut allocations = Vec::with_capacity(ordered.len());
        for line in ordered {
            let principal = line.remaining_principal();
            let principal_applied = left.min(principal);
            left -= principal_applied;
            let surcharge_applied = left.min(line.surcharge);
            left -= surcharge_applied;

            let resulting_status = if principal_applied >= principal {
                PeriodStatus::Paid
            } else if principal_applied > Decimal::ZERO || line.amount_paid > Decimal::ZERO {
                PeriodStatus::Partial
            } else {
                line.status
            };

            allocations.push(PeriodAllocation {
                line: line.clone(),
                owed: principal + line.surcharge,
                principal_applied,
                surcharge_applied,
                resulting_status,
            });
        }

        let total_owed: Decimal = allocations.iter().map(|a| a.owed).sum();
        let total_applied: Decimal = allocations.iter().map(PeriodAllocation::applied).sum();

        Ok(SettlementPlan {
            tender: tender.clone(),
            allocations,
            total_owed,
            total_applied,
            excedente: left,
        })
    }
}
