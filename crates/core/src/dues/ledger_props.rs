//! Property-based tests for ledger derivation.
//!
//! Covers determinism, gap-free coverage, conservation of principal,
//! surcharge monotonicity, advance immunity and order-independent totals.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use fracc_shared::types::{HousingUnitId, PaymentRecordId, ResidentId};

use super::aggregate::LedgerSummary;
use super::classifier::StatusClassifier;
use super::ledger::DuesLedger;
use super::period::PeriodKey;
use super::types::{
    BillingMode, BillingParameters, HousingUnit, PaymentRecord, PeriodStatus, Resident,
};

/// Strategy for a date between 2018 and 2027.
fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or(NaiveDate::MIN) + Duration::days(offset)
    })
}

/// Strategy for a monthly fee from 1.00 to 5,000.00.
fn fee_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a surcharge rate from 0% to 25% in quarter steps.
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=100).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

fn resident(move_in: NaiveDate, fee: Decimal) -> Resident {
    Resident {
        id: ResidentId(1),
        move_in_date: move_in,
        housing_unit: HousingUnit {
            id: HousingUnitId(1),
            maintenance_fee: fee,
        },
    }
}

/// Builds one record per month in `paid_flags`, either untouched or paid in
/// full, for months before `today`'s month.
fn all_or_nothing_records(
    move_in: NaiveDate,
    today: NaiveDate,
    fee: Decimal,
    paid_flags: &[bool],
) -> Vec<PaymentRecord> {
    let first = PeriodKey::from_date(move_in);
    let current = PeriodKey::from_date(today);
    if first >= current {
        return Vec::new();
    }
    first
        .through(current.prev())
        .zip(paid_flags.iter())
        .enumerate()
        .filter_map(|(i, (period, &paid))| {
            // Every other month has no record at all.
            (i % 2 == 0).then(|| PaymentRecord {
                id: PaymentRecordId(i64::try_from(i).unwrap_or(0) + 1),
                resident_id: ResidentId(1),
                housing_unit_id: HousingUnitId(1),
                month: period.month(),
                year: period.year(),
                due_amount: fee,
                amount_paid: if paid { fee } else { Decimal::ZERO },
                status: PeriodStatus::Pending,
                payment_date: None,
                payment_method: None,
                reference: None,
                due_date: period.due_date(),
            })
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The same inputs always produce the same ledger.
    #[test]
    fn prop_build_is_deterministic(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
        rate in rate_strategy(),
        grace in 0u32..15,
        paid in prop::collection::vec(any::<bool>(), 0..120),
    ) {
        let r = resident(move_in, fee);
        let records = all_or_nothing_records(move_in, today, fee, &paid);
        let params = BillingParameters::flat(fee, grace, rate);

        for mode in [BillingMode::Arrears, BillingMode::Advance] {
            let first = DuesLedger::build(&r, &records, today, &params, mode).unwrap();
            let second = DuesLedger::build(&r, &records, today, &params, mode).unwrap();
            prop_assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }

    /// Arrears ledgers run from move-in to the month before today with no
    /// gaps or duplicates.
    #[test]
    fn prop_arrears_coverage_is_contiguous(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
    ) {
        let ledger = DuesLedger::build(
            &resident(move_in, fee),
            &[],
            today,
            &BillingParameters::flat(fee, 0, Decimal::TEN),
            BillingMode::Arrears,
        )
        .unwrap();

        let first = PeriodKey::from_date(move_in);
        let current = PeriodKey::from_date(today);
        if first >= current {
            prop_assert!(ledger.is_empty());
        } else {
            prop_assert_eq!(ledger.first().map(|p| p.period), Some(first));
            prop_assert_eq!(ledger.last().map(|p| p.period), Some(current.prev()));
            for pair in ledger.windows(2) {
                prop_assert_eq!(pair[0].period.next(), pair[1].period);
            }
        }
    }

    /// No ledger ever lists the same month twice.
    #[test]
    fn prop_no_duplicate_periods(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
        paid in prop::collection::vec(any::<bool>(), 0..120),
    ) {
        let records = all_or_nothing_records(move_in, today, fee, &paid);
        for mode in [BillingMode::Arrears, BillingMode::Advance] {
            let ledger = DuesLedger::build(
                &resident(move_in, fee),
                &records,
                today,
                &BillingParameters::flat(fee, 0, Decimal::TEN),
                mode,
            )
            .unwrap();
            let unique: BTreeSet<PeriodKey> = ledger.iter().map(|p| p.period).collect();
            prop_assert_eq!(unique.len(), ledger.len());
        }
    }

    /// With all-or-nothing payments, paid + pending + overdue principal equals
    /// the total due over elapsed periods.
    #[test]
    fn prop_principal_is_conserved(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
        rate in rate_strategy(),
        grace in 0u32..15,
        paid in prop::collection::vec(any::<bool>(), 0..120),
    ) {
        let records = all_or_nothing_records(move_in, today, fee, &paid);
        let ledger = DuesLedger::build(
            &resident(move_in, fee),
            &records,
            today,
            &BillingParameters::flat(fee, grace, rate),
            BillingMode::Arrears,
        )
        .unwrap();
        let summary = LedgerSummary::from_periods(&ledger);

        let due: Decimal = ledger
            .iter()
            .filter(|p| !p.es_adelanto && p.due_date <= today)
            .map(|p| p.due_amount)
            .sum();
        prop_assert_eq!(summary.total_paid + summary.total_pending + summary.total_overdue, due);
        prop_assert_eq!(summary.total_partial_remaining, Decimal::ZERO);
    }

    /// Surcharge never decreases as lateness grows, and is zero when on time.
    #[test]
    fn prop_surcharge_is_monotonic(
        fee in fee_strategy(),
        rate in rate_strategy(),
        days in 0i64..2000,
        extra in 0i64..400,
    ) {
        let base = StatusClassifier::surcharge(fee, rate, days);
        let later = StatusClassifier::surcharge(fee, rate, days + extra);
        prop_assert!(later >= base);
        prop_assert_eq!(StatusClassifier::surcharge(fee, rate, 0), Decimal::ZERO);
    }

    /// Advance lines carry no surcharge and no overdue days, whatever the date.
    #[test]
    fn prop_advance_lines_are_immune(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
        rate in rate_strategy(),
        months_late in 0i64..36,
    ) {
        let ledger = DuesLedger::build(
            &resident(move_in, fee),
            &[],
            today,
            &BillingParameters::flat(fee, 0, rate),
            BillingMode::Advance,
        )
        .unwrap();
        for line in &ledger {
            prop_assert!(line.es_adelanto);
            prop_assert_eq!(line.surcharge, Decimal::ZERO);
            prop_assert_eq!(line.days_overdue, 0);

            let much_later = today + Duration::days(months_late * 31);
            let reclassified = StatusClassifier::classify(
                line.period,
                None,
                much_later,
                &BillingParameters::flat(fee, 0, rate),
                true,
            );
            prop_assert_eq!(reclassified.surcharge, Decimal::ZERO);
            prop_assert_eq!(reclassified.days_overdue, 0);
        }
    }

    /// Totals do not depend on the order of the ledger.
    #[test]
    fn prop_summary_ignores_order(
        move_in in date_strategy(),
        today in date_strategy(),
        fee in fee_strategy(),
        rate in rate_strategy(),
        paid in prop::collection::vec(any::<bool>(), 0..120),
        seed in any::<u64>(),
    ) {
        let records = all_or_nothing_records(move_in, today, fee, &paid);
        let ledger = DuesLedger::build(
            &resident(move_in, fee),
            &records,
            today,
            &BillingParameters::flat(fee, 0, rate),
            BillingMode::Arrears,
        )
        .unwrap();

        let mut shuffled = ledger.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let len = shuffled.len();
            let pivot = usize::try_from(seed % len as u64).unwrap_or(0);
            shuffled.rotate_left(pivot);
        }

        prop_assert_eq!(
            LedgerSummary::from_periods(&ledger),
            LedgerSummary::from_periods(&shuffled)
        );
    }
}
