//! Paying several months in one go against the backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use fracc_core::dues::{
    BillingPeriod, DuesError, NewPaymentRecord, PeriodKey, Resident, SettlementError,
    SettlementEvent, SettlementPlan, SettlementPlanner, SettlementState, Tender,
};
use fracc_shared::types::PaymentRecordId;

use crate::backend::{BillingBackend, MultiPaymentReceipt, MultiPaymentRequest};
use crate::error::ClientError;

/// A completed multi-period payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementOutcome {
    /// Plan computed before any call was made.
    pub plan: SettlementPlan,
    /// Final state, always `Done`.
    pub state: SettlementState,
    /// Backend receipt.
    pub receipt: MultiPaymentReceipt,
}

/// Drives the settlement state machine against a backend.
pub struct PaymentWorkflow<B: ?Sized> {
    backend: Arc<B>,
}

impl<B: BillingBackend + ?Sized> PaymentWorkflow<B> {
    /// Creates a workflow.
    pub const fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Pays `selected` with `tender`.
    ///
    /// Input errors are returned before any call. Missing records are then
    /// created one by one, oldest first, and the payment is applied to every
    /// selected record in a single call, together with the part of the
    /// tender the plan assigned to surcharges. Nothing is retried or rolled
    /// back.
    ///
    /// # Errors
    ///
    /// - `ClientError::Settlement` for input errors
    /// - `ClientError::PartialSettlement` if a call fails after at least one
    ///   record was created
    /// - the backend error itself if a call fails before anything was created
    pub async fn execute(
        &self,
        resident: &Resident,
        selected: &[BillingPeriod],
        tender: &Tender,
    ) -> Result<SettlementOutcome, ClientError> {
        let plan = SettlementPlanner::plan(selected, tender)?;
        let mut pending = plan
            .missing_records(resident)
            .into_iter()
            .map(|record| Ok((record.period()?, record)))
            .collect::<Result<BTreeMap<PeriodKey, NewPaymentRecord>, DuesError>>()?;

        let mut state = SettlementState::Selecting.advance(SettlementEvent::confirmed(&plan))?;
        info!(
            resident_id = %resident.id,
            periods = plan.allocations.len(),
            missing = pending.len(),
            amount = %tender.amount,
            "Settlement confirmed"
        );

        while let Some(period) = state.next_missing() {
            let record = pending
                .remove(&period)
                .ok_or(SettlementError::InvalidTransition {
                    from: state.name(),
                    event: "record_created",
                })?;
            match self.backend.create_payment_record(&record).await {
                Ok(created) => {
                    info!(
                        resident_id = %resident.id,
                        period = %period,
                        record_id = %created.id,
                        "Missing record created"
                    );
                    state = state.advance(SettlementEvent::RecordCreated {
                        period,
                        id: created.id,
                    })?;
                }
                Err(err) => return Err(Self::fail(state, err)?),
            }
        }

        let record_ids = match &state {
            SettlementState::ApplyingPayment { record_ids, .. } => record_ids.clone(),
            other => {
                return Err(SettlementError::InvalidTransition {
                    from: other.name(),
                    event: "payment_applied",
                }
                .into());
            }
        };

        let request = MultiPaymentRequest {
            record_ids,
            method: tender.method.clone(),
            reference: tender.reference.clone(),
            amount_paid: tender.amount,
            surcharge_paid: plan.surcharge_applied(),
        };
        match self.backend.apply_multi_payment(&request).await {
            Ok(receipt) => {
                if receipt.excedente != plan.excedente {
                    warn!(
                        resident_id = %resident.id,
                        planned = %plan.excedente,
                        received = %receipt.excedente,
                        "Backend excedente differs from plan"
                    );
                }
                state = state.advance(SettlementEvent::PaymentApplied {
                    excedente: receipt.excedente,
                })?;
                info!(
                    resident_id = %resident.id,
                    total_pagado = %receipt.total_pagado,
                    recargo_pagado = %receipt.recargo_pagado,
                    excedente = %receipt.excedente,
                    "Settlement done"
                );
                Ok(SettlementOutcome {
                    plan,
                    state,
                    receipt,
                })
            }
            Err(err) => Err(Self::fail(state, err)?),
        }
    }

    /// Moves `state` to `Failed` and wraps `err` if records were left behind.
    fn fail(state: SettlementState, err: ClientError) -> Result<ClientError, ClientError> {
        let failed = state.advance(SettlementEvent::StepFailed {
            reason: err.to_string(),
        })?;
        let created: Vec<PaymentRecordId> = failed.created().to_vec();
        if created.is_empty() {
            error!(state = failed.name(), error = %err, "Settlement failed with no side effects");
            return Ok(err);
        }
        warn!(
            created = ?created,
            error = %err,
            "Settlement failed after creating records; they remain pending"
        );
        Ok(ClientError::PartialSettlement {
            created,
            source: Box::new(err),
        })
    }
}
