//! Lifecycle of a multi-period payment.
//!
//! Paying several months takes several round-trips: one record creation per
//! period without a backing record, then a single multi-payment call. None of
//! it is atomic. The states below make the partial-effect window explicit.
//!
//! Valid transitions:
//! - Selecting → CreatingMissingRecords (plan confirmed, some records missing)
//! - Selecting → ApplyingPayment (plan confirmed, every record exists)
//! - CreatingMissingRecords → CreatingMissingRecords (record created, more missing)
//! - CreatingMissingRecords → ApplyingPayment (last missing record created)
//! - CreatingMissingRecords → Failed (creation failed; earlier creations stay)
//! - ApplyingPayment → Done (payment applied)
//! - ApplyingPayment → Failed (payment call failed; every creation stays)
//!
//! `Done` and `Failed` are terminal. Records created before a failure are
//! never rolled back; the next ledger load shows them as pending.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_shared::types::PaymentRecordId;

use super::error::SettlementError;
use super::period::PeriodKey;
use super::settlement::SettlementPlan;

/// A period targeted by the payment and its record, once known.
pub type Slot = (PeriodKey, Option<PaymentRecordId>);

/// Step that was running when a settlement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStage {
    /// Creating records for periods that had none.
    CreatingMissingRecords,
    /// Submitting the multi-period payment.
    ApplyingPayment,
}

/// State of a multi-period payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SettlementState {
    /// Operator is still choosing periods.
    #[default]
    Selecting,
    /// Creating the missing records, oldest first.
    CreatingMissingRecords {
        /// Every targeted period, oldest first.
        slots: Vec<Slot>,
        /// Records created so far.
        created: Vec<PaymentRecordId>,
    },
    /// Every targeted period has a record; the payment is in flight.
    ApplyingPayment {
        /// Records the payment applies to, oldest period first.
        record_ids: Vec<PaymentRecordId>,
        /// Records created by this settlement.
        created: Vec<PaymentRecordId>,
    },
    /// Payment applied.
    Done {
        /// Records the payment was applied to.
        record_ids: Vec<PaymentRecordId>,
        /// Records created by this settlement.
        created: Vec<PaymentRecordId>,
        /// Tender left over, as reported by the backend.
        excedente: Decimal,
    },
    /// A step failed. `created` lists records that now exist regardless.
    Failed {
        /// Step that failed.
        stage: SettlementStage,
        /// Records created before the failure.
        created: Vec<PaymentRecordId>,
        /// Failure description.
        reason: String,
    },
}

/// Something that happened during a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettlementEvent {
    /// Operator confirmed the plan.
    PlanConfirmed {
        /// Targeted periods, oldest first.
        slots: Vec<Slot>,
    },
    /// Backend created a record.
    RecordCreated {
        /// Period of the new record.
        period: PeriodKey,
        /// Id assigned by the backend.
        id: PaymentRecordId,
    },
    /// Backend applied the payment.
    PaymentApplied {
        /// Tender left over.
        excedente: Decimal,
    },
    /// The running step failed.
    StepFailed {
        /// Failure description.
        reason: String,
    },
}

impl SettlementEvent {
    /// Confirmation event for a computed plan.
    #[must_use]
    pub fn confirmed(plan: &SettlementPlan) -> Self {
        Self::PlanConfirmed {
            slots: plan.slots(),
        }
    }

    /// Returns the string representation of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlanConfirmed { .. } => "plan_confirmed",
            Self::RecordCreated { .. } => "record_created",
            Self::PaymentApplied { .. } => "payment_applied",
            Self::StepFailed { .. } => "step_failed",
        }
    }
}

impl SettlementState {
    /// Returns the string representation of the state.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Selecting => "selecting",
            Self::CreatingMissingRecords { .. } => "creating_missing_records",
            Self::ApplyingPayment { .. } => "applying_payment",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Failed { .. })
    }

    /// Records created so far by this settlement.
    #[must_use]
    pub fn created(&self) -> &[PaymentRecordId] {
        match self {
            Self::Selecting => &[],
            Self::CreatingMissingRecords { created, .. }
            | Self::ApplyingPayment { created, .. }
            | Self::Done { created, .. }
            | Self::Failed { created, .. } => created,
        }
    }

    /// The next period waiting for a record, if any.
    #[must_use]
    pub fn next_missing(&self) -> Option<PeriodKey> {
        match self {
            Self::CreatingMissingRecords { slots, .. } => slots
                .iter()
                .find(|(_, id)| id.is_none())
                .map(|(period, _)| *period),
            _ => None,
        }
    }

    /// Applies `event` and returns the next state.
    ///
    /// # Errors
    ///
    /// - `SettlementError::InvalidTransition` if `event` does not apply here
    /// - `SettlementError::NoPeriodsSelected` for a confirmation with no slots
    /// - `SettlementError::UnexpectedRecord` if a created record matches no
    ///   period awaiting creation
    pub fn advance(self, event: SettlementEvent) -> Result<Self, SettlementError> {
        match (self, event) {
            (Self::Selecting, SettlementEvent::PlanConfirmed { slots }) => {
                if slots.is_empty() {
                    return Err(SettlementError::NoPeriodsSelected);
                }
                Ok(Self::after_creation(slots, Vec::new()))
            }

            (
                Self::CreatingMissingRecords { mut slots, mut created },
                SettlementEvent::RecordCreated { period, id },
            ) => {
                let slot = slots
                    .iter_mut()
                    .find(|(p, existing)| *p == period && existing.is_none())
                    .ok_or(SettlementError::UnexpectedRecord { period, record: id })?;
                slot.1 = Some(id);
                created.push(id);
                Ok(Self::after_creation(slots, created))
            }

            (
                Self::CreatingMissingRecords { created, .. },
                SettlementEvent::StepFailed { reason },
            ) => Ok(Self::Failed {
                stage: SettlementStage::CreatingMissingRecords,
                created,
                reason,
            }),

            (
                Self::ApplyingPayment { record_ids, created },
                SettlementEvent::PaymentApplied { excedente },
            ) => Ok(Self::Done {
                record_ids,
                created,
                excedente,
            }),

            (Self::ApplyingPayment { created, .. }, SettlementEvent::StepFailed { reason }) => {
                Ok(Self::Failed {
                    stage: SettlementStage::ApplyingPayment,
                    created,
                    reason,
                })
            }

            (state, event) => Err(SettlementError::InvalidTransition {
                from: state.name(),
                event: event.name(),
            }),
        }
    }

    fn after_creation(slots: Vec<Slot>, created: Vec<PaymentRecordId>) -> Self {
        if slots.iter().any(|(_, id)| id.is_none()) {
            return Self::CreatingMissingRecords { slots, created };
        }
        let record_ids = slots.into_iter().filter_map(|(_, id)| id).collect();
        Self::ApplyingPayment {
            record_ids,
            created,
        }
    }
}
