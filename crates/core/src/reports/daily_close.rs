//! Cash-register close: payments received, grouped by method.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fracc_shared::types::Currency;

use super::error::ReportError;
use crate::dues::PaymentRecord;

/// Label for records with no payment method.
pub const UNSPECIFIED_METHOD: &str = "unspecified";

/// Payments received with one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    /// Payment method.
    pub method: String,
    /// Number of payments.
    pub count: usize,
    /// Amount received.
    pub total: Decimal,
}

/// Payments received over a range of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyClose {
    /// Report type identifier.
    pub report_type: String,
    /// First day covered.
    pub start: NaiveDate,
    /// Last day covered, inclusive.
    pub end: NaiveDate,
    /// Currency of every amount.
    pub currency: Currency,
    /// Totals per method, ordered by method name.
    pub methods: Vec<MethodTotal>,
    /// Number of payments.
    pub payment_count: usize,
    /// Amount received.
    pub total_collected: Decimal,
}

impl DailyClose {
    /// Close for a single day.
    #[must_use]
    pub fn for_date(records: &[PaymentRecord], date: NaiveDate, currency: Currency) -> Self {
        Self::collect(records, date, date, currency)
    }

    /// Close for `start..=end`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` if `start` is after `end`.
    pub fn for_range(
        records: &[PaymentRecord],
        start: NaiveDate,
        end: NaiveDate,
        currency: Currency,
    ) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(Self::collect(records, start, end, currency))
    }

    fn collect(
        records: &[PaymentRecord],
        start: NaiveDate,
        end: NaiveDate,
        currency: Currency,
    ) -> Self {
        let mut by_method: BTreeMap<&str, MethodTotal> = BTreeMap::new();
        for record in records {
            let Some(paid_on) = record.payment_date else {
                continue;
            };
            if paid_on < start || paid_on > end || record.amount_paid <= Decimal::ZERO {
                continue;
            }
            let method = record
                .payment_method
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(UNSPECIFIED_METHOD);
            let entry = by_method.entry(method).or_insert_with(|| MethodTotal {
                method: method.to_string(),
                count: 0,
                total: Decimal::ZERO,
            });
            entry.count += 1;
            entry.total += record.amount_paid;
        }

        let methods: Vec<MethodTotal> = by_method.into_values().collect();
        let payment_count = methods.iter().map(|m| m.count).sum();
        let total_collected = methods.iter().map(|m| m.total).sum();

        Self {
            report_type: "daily_close".to_string(),
            start,
            end,
            currency,
            methods,
            payment_count,
            total_collected,
        }
    }
}
