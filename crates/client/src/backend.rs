//! The REST backend as seen by the ledger.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_core::dues::{BillingConfig, NewPaymentRecord, PaymentRecord, Resident};
use fracc_shared::types::{PaymentRecordId, ResidentId};

use crate::error::ClientError;

/// Payload for applying one payment to several records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPaymentRequest {
    /// Records to pay, oldest period first.
    pub record_ids: Vec<PaymentRecordId>,
    /// Payment method.
    pub method: String,
    /// Bank or receipt reference.
    pub reference: Option<String>,
    /// Total amount tendered.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_paid: Decimal,
    /// Part of `amount_paid` that settles surcharges rather than principal.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub surcharge_paid: Decimal,
}

/// Backend answer to a multi-period payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiPaymentReceipt {
    /// Records as updated by the payment.
    pub pagos: Vec<PaymentRecord>,
    /// Amount applied to principal.
    pub total_pagado: Decimal,
    /// Amount booked as surcharge.
    #[serde(default)]
    pub recargo_pagado: Decimal,
    /// Amount left over.
    #[serde(default)]
    pub excedente: Decimal,
}

/// Operations the ledger needs from the backend.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    /// Fetches a resident with their housing unit.
    async fn get_resident(&self, id: ResidentId) -> Result<Resident, ClientError>;

    /// Lists every payment record billed to a resident.
    async fn list_payment_records(
        &self,
        resident_id: ResidentId,
    ) -> Result<Vec<PaymentRecord>, ClientError>;

    /// Fetches the global billing configuration.
    async fn get_billing_config(&self) -> Result<BillingConfig, ClientError>;

    /// Creates a payment record and returns it with its new id.
    async fn create_payment_record(
        &self,
        record: &NewPaymentRecord,
    ) -> Result<PaymentRecord, ClientError>;

    /// Applies one payment across several existing records.
    async fn apply_multi_payment(
        &self,
        request: &MultiPaymentRequest,
    ) -> Result<MultiPaymentReceipt, ClientError>;
}
