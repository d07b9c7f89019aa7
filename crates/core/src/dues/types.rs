//! Dues ledger domain types.
//!
//! Wire shapes (`PaymentRecord`, `Resident`, `BillingConfig`,
//! `NewPaymentRecord`) mirror the REST backend's camelCase JSON. The ledger
//! output (`BillingPeriod`) is derived on every read and never persisted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_shared::types::{HousingUnitId, PaymentRecordId, ResidentId};

use super::error::DuesError;
use super::period::PeriodKey;

/// Payment status of a billing period.
///
/// Accepts the Spanish labels the backend stores alongside the canonical
/// snake_case names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    /// Paid exactly.
    #[serde(alias = "pagado")]
    Paid,
    /// Paid with more than the amount due.
    #[serde(alias = "pagado_excedente", alias = "pagado_con_excedente")]
    PaidWithSurplus,
    /// Partially paid, not yet past the deadline.
    #[serde(alias = "parcial")]
    Partial,
    /// Nothing paid, not yet past the deadline.
    #[serde(alias = "pendiente")]
    Pending,
    /// Past the deadline (and any grace period) with a balance left.
    #[serde(alias = "vencido", alias = "atrasado")]
    Overdue,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::PaidWithSurplus => "paid_with_surplus",
            Self::Partial => "partial",
            Self::Pending => "pending",
            Self::Overdue => "overdue",
        }
    }

    /// Returns true if nothing is owed for the period.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Paid | Self::PaidWithSurplus)
    }
}

impl std::fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which window of months a ledger covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Elapsed months from move-in up to (not including) the current month.
    Arrears,
    /// Current month through December, for paying ahead.
    Advance,
}

/// One derived line of a resident's dues ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriod {
    /// Calendar month this line covers.
    pub period: PeriodKey,
    /// Fee owed for the period (snapshot of the fee in effect).
    pub due_amount: Decimal,
    /// Amount applied to the period so far.
    pub amount_paid: Decimal,
    /// Computed status.
    pub status: PeriodStatus,
    /// Last day of the month.
    pub due_date: NaiveDate,
    /// Days past the deadline after the grace period. Zero unless unpaid.
    pub days_overdue: i64,
    /// Late-payment penalty, reported apart from the principal.
    pub surcharge: Decimal,
    /// Backing record, absent when the period still has to be created.
    pub source_record_id: Option<PaymentRecordId>,
    /// True for periods offered for advance payment.
    pub es_adelanto: bool,
}

impl BillingPeriod {
    /// Returns true if nothing is owed for the period.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status.is_settled()
    }

    /// Unpaid principal, never negative.
    #[must_use]
    pub fn remaining_principal(&self) -> Decimal {
        (self.due_amount - self.amount_paid).max(Decimal::ZERO)
    }

    /// Principal plus surcharge still owed.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        if self.is_settled() {
            Decimal::ZERO
        } else {
            self.remaining_principal() + self.surcharge
        }
    }
}

/// Payment record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Record id.
    pub id: PaymentRecordId,
    /// Resident the record is billed to.
    pub resident_id: ResidentId,
    /// Housing unit the fee belongs to.
    pub housing_unit_id: HousingUnitId,
    /// Calendar month, 1-based.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Fee owed for the period.
    pub due_amount: Decimal,
    /// Amount paid so far.
    pub amount_paid: Decimal,
    /// Status stored by the backend.
    pub status: PeriodStatus,
    /// Date the payment was received.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    /// Payment method (cash, transfer, card...).
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Bank or receipt reference.
    #[serde(default)]
    pub reference: Option<String>,
    /// Deadline stored by the backend.
    pub due_date: NaiveDate,
}

impl PaymentRecord {
    /// The period this record covers.
    pub fn period(&self) -> Result<PeriodKey, DuesError> {
        PeriodKey::new(self.year, self.month)
    }
}

/// Housing unit with its maintenance fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HousingUnit {
    /// Unit id.
    pub id: HousingUnitId,
    /// Monthly maintenance fee.
    pub maintenance_fee: Decimal,
}

/// Resident as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    /// Resident id.
    pub id: ResidentId,
    /// Start of tenancy; no period is owed before this month.
    pub move_in_date: NaiveDate,
    /// Unit the resident lives in.
    pub housing_unit: HousingUnit,
}

/// Global billing parameters published by the backend's configuration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingConfig {
    /// Days after the deadline before overdue days accrue.
    #[serde(default, alias = "diasGraciaPago")]
    pub grace_period_days: Option<u32>,
    /// Surcharge per started 30-day block, in percent.
    #[serde(default, alias = "porcentajeRecargo")]
    pub surcharge_rate_percent: Option<Decimal>,
}

/// Payload for creating a missing payment record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRecord {
    /// Resident the record is billed to.
    pub resident_id: ResidentId,
    /// Housing unit the fee belongs to.
    pub housing_unit_id: HousingUnitId,
    /// Calendar month, 1-based.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Fee owed for the period.
    #[serde(with = "rust_decimal::serde::float")]
    pub due_amount: Decimal,
    /// Always zero on creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    /// Always `Pending` on creation.
    pub status: PeriodStatus,
    /// Last day of the month.
    pub due_date: NaiveDate,
}

impl NewPaymentRecord {
    /// Builds the pending record for a ledger line that has no backing record.
    #[must_use]
    pub fn pending_for(resident: &Resident, period: &BillingPeriod) -> Self {
        Self {
            resident_id: resident.id,
            housing_unit_id: resident.housing_unit.id,
            month: period.period.month(),
            year: period.period.year(),
            due_amount: period.due_amount,
            amount_paid: Decimal::ZERO,
            status: PeriodStatus::Pending,
            due_date: period.due_date,
        }
    }

    /// The period this record will cover.
    pub fn period(&self) -> Result<PeriodKey, DuesError> {
        PeriodKey::new(self.year, self.month)
    }
}

/// A fee change taking effect from a given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeChange {
    /// First month the fee applies to.
    pub effective_from: PeriodKey,
    /// Monthly fee.
    pub amount: Decimal,
}

/// Maintenance fee over time.
///
/// Entries are sorted and unique by `effective_from`. Months before the
/// first entry use the first entry's fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeSchedule {
    entries: Vec<FeeChange>,
}

impl FeeSchedule {
    /// A schedule with one fee for every month.
    #[must_use]
    pub fn flat(amount: Decimal) -> Self {
        Self {
            entries: vec![FeeChange {
                effective_from: PeriodKey::from_date(NaiveDate::MIN),
                amount,
            }],
        }
    }

    /// Builds a schedule from fee changes in any order.
    ///
    /// # Errors
    ///
    /// Returns `DuesError::InvalidParameters` if the list is empty, a fee is
    /// negative, or two changes share a month.
    pub fn new(mut entries: Vec<FeeChange>) -> Result<Self, DuesError> {
        if entries.is_empty() {
            return Err(DuesError::InvalidParameters(
                "fee schedule is empty".to_string(),
            ));
        }
        if let Some(negative) = entries.iter().find(|c| c.amount < Decimal::ZERO) {
            return Err(DuesError::InvalidParameters(format!(
                "negative fee {} from {}",
                negative.amount, negative.effective_from
            )));
        }
        entries.sort_by_key(|c| c.effective_from);
        if let Some(pair) = entries
            .windows(2)
            .find(|w| w[0].effective_from == w[1].effective_from)
        {
            return Err(DuesError::InvalidParameters(format!(
                "two fees take effect in {}",
                pair[0].effective_from
            )));
        }
        Ok(Self { entries })
    }

    /// The fee in effect for `period`.
    #[must_use]
    pub fn fee_for(&self, period: PeriodKey) -> Decimal {
        self.entries
            .iter()
            .rev()
            .find(|c| c.effective_from <= period)
            .or_else(|| self.entries.first())
            .map_or(Decimal::ZERO, |c| c.amount)
    }

    /// Fee changes in chronological order.
    #[must_use]
    pub fn entries(&self) -> &[FeeChange] {
        &self.entries
    }
}

/// Parameters the status classifier needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingParameters {
    /// Maintenance fee over time.
    pub fee_schedule: FeeSchedule,
    /// Days after the deadline before overdue days accrue.
    pub grace_period_days: u32,
    /// Surcharge per started 30-day block, in percent of the due amount.
    pub surcharge_rate_percent: Decimal,
}

impl BillingParameters {
    /// Parameters with a flat monthly fee.
    #[must_use]
    pub fn flat(
        monthly_fee: Decimal,
        grace_period_days: u32,
        surcharge_rate_percent: Decimal,
    ) -> Self {
        Self {
            fee_schedule: FeeSchedule::flat(monthly_fee),
            grace_period_days,
            surcharge_rate_percent,
        }
    }

    /// Parameters for a resident's unit, taking grace and rate from the
    /// backend configuration and falling back to local defaults.
    #[must_use]
    pub fn for_resident(
        resident: &Resident,
        config: &BillingConfig,
        default_grace_days: u32,
        default_rate_percent: Decimal,
    ) -> Self {
        Self::flat(
            resident.housing_unit.maintenance_fee,
            config.grace_period_days.unwrap_or(default_grace_days),
            config.surcharge_rate_percent.unwrap_or(default_rate_percent),
        )
    }

    /// Checks the parameters before any period is classified.
    ///
    /// # Errors
    ///
    /// Returns `DuesError::InvalidParameters` for a negative surcharge rate
    /// or a negative fee.
    pub fn validate(&self) -> Result<(), DuesError> {
        if self.surcharge_rate_percent < Decimal::ZERO {
            return Err(DuesError::InvalidParameters(format!(
                "negative surcharge rate {}",
                self.surcharge_rate_percent
            )));
        }
        if self
            .fee_schedule
            .entries()
            .iter()
            .any(|c| c.amount < Decimal::ZERO)
        {
            return Err(DuesError::InvalidParameters("negative fee".to_string()));
        }
        Ok(())
    }
}
