//! In-memory backend for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use fracc_core::dues::{
    BillingConfig, HousingUnit, NewPaymentRecord, PaymentRecord, PeriodStatus, Resident,
};
use fracc_shared::types::{HousingUnitId, PaymentRecordId, ResidentId};

use crate::backend::{BillingBackend, MultiPaymentReceipt, MultiPaymentRequest};
use crate::error::ClientError;

/// Backend holding one resident and their records in memory.
pub struct FakeBackend {
    pub resident: Resident,
    pub config: BillingConfig,
    pub records: Mutex<Vec<PaymentRecord>>,
    /// Number of record creations that succeed before the rest fail.
    pub creations_before_failure: Option<usize>,
    pub fail_payment: bool,
    pub calls: Mutex<Vec<&'static str>>,
    created: AtomicUsize,
}

impl FakeBackend {
    pub fn new(move_in: NaiveDate, fee: Decimal) -> Self {
        Self {
            resident: Resident {
                id: ResidentId(1),
                move_in_date: move_in,
                housing_unit: HousingUnit {
                    id: HousingUnitId(10),
                    maintenance_fee: fee,
                },
            },
            config: BillingConfig {
                grace_period_days: None,
                surcharge_rate_percent: None,
            },
            records: Mutex::new(Vec::new()),
            creations_before_failure: None,
            fail_payment: false,
            calls: Mutex::new(Vec::new()),
            created: AtomicUsize::new(0),
        }
    }

    pub fn with_record(self, id: i64, year: i32, month: u32, amount_paid: Decimal) -> Self {
        let fee = self.resident.housing_unit.maintenance_fee;
        let due_date = fracc_core::dues::PeriodKey::new(year, month)
            .map(|p| p.due_date())
            .unwrap_or(NaiveDate::MIN);
        self.records.lock().unwrap().push(PaymentRecord {
            id: PaymentRecordId(id),
            resident_id: self.resident.id,
            housing_unit_id: self.resident.housing_unit.id,
            month,
            year,
            due_amount: fee,
            amount_paid,
            status: PeriodStatus::Pending,
            payment_date: None,
            payment_method: None,
            reference: None,
            due_date,
        });
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<PaymentRecord> {
        self.records.lock().unwrap().clone()
    }

    fn log(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> ClientError {
        ClientError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }
}

#[async_trait]
impl BillingBackend for FakeBackend {
    async fn get_resident(&self, id: ResidentId) -> Result<Resident, ClientError> {
        self.log("get_resident");
        if id == self.resident.id {
            Ok(self.resident.clone())
        } else {
            Err(ClientError::Status {
                status: 404,
                body: format!("resident {id} not found"),
            })
        }
    }

    async fn list_payment_records(
        &self,
        resident_id: ResidentId,
    ) -> Result<Vec<PaymentRecord>, ClientError> {
        self.log("list_payment_records");
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.resident_id == resident_id)
            .collect())
    }

    async fn get_billing_config(&self) -> Result<BillingConfig, ClientError> {
        self.log("get_billing_config");
        Ok(self.config.clone())
    }

    async fn create_payment_record(
        &self,
        record: &NewPaymentRecord,
    ) -> Result<PaymentRecord, ClientError> {
        self.log("create_payment_record");
        if self
            .creations_before_failure
            .is_some_and(|limit| self.created.load(Ordering::SeqCst) >= limit)
        {
            return Err(Self::unavailable());
        }
        self.created.fetch_add(1, Ordering::SeqCst);

        let mut records = self.records.lock().unwrap();
        let id = records.iter().map(|r| r.id.into_inner()).max().unwrap_or(0) + 1;
        let stored = PaymentRecord {
            id: PaymentRecordId(id),
            resident_id: record.resident_id,
            housing_unit_id: record.housing_unit_id,
            month: record.month,
            year: record.year,
            due_amount: record.due_amount,
            amount_paid: record.amount_paid,
            status: record.status,
            payment_date: None,
            payment_method: None,
            reference: None,
            due_date: record.due_date,
        };
        records.push(stored.clone());
        Ok(stored)
    }

    async fn apply_multi_payment(
        &self,
        request: &MultiPaymentRequest,
    ) -> Result<MultiPaymentReceipt, ClientError> {
        self.log("apply_multi_payment");
        if self.fail_payment {
            return Err(Self::unavailable());
        }

        let mut records = self.records.lock().unwrap();
        // Surcharge is booked first; only the rest reaches the records.
        let recargo_pagado = request.surcharge_paid.clamp(Decimal::ZERO, request.amount_paid);
        let principal = request.amount_paid - recargo_pagado;
        let mut left = principal;
        let mut pagos = Vec::new();
        for id in &request.record_ids {
            let record = records
                .iter_mut()
                .find(|r| r.id == *id)
                .ok_or(ClientError::Status {
                    status: 404,
                    body: format!("record {id} not found"),
                })?;
            let applied = left.min(record.due_amount - record.amount_paid);
            left -= applied;
            record.amount_paid += applied;
            record.status = if record.amount_paid >= record.due_amount {
                PeriodStatus::Paid
            } else if record.amount_paid > Decimal::ZERO {
                PeriodStatus::Partial
            } else {
                record.status
            };
            record.payment_method = Some(request.method.clone());
            record.reference.clone_from(&request.reference);
            pagos.push(record.clone());
        }

        Ok(MultiPaymentReceipt {
            pagos,
            total_pagado: principal - left,
            recargo_pagado,
            excedente: left,
        })
    }
}
