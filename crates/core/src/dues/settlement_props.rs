//! Property-based tests for multi-period payment planning.

use proptest::prelude::*;
use rust_decimal::Decimal;

use fracc_shared::types::PaymentRecordId;

use super::period::PeriodKey;
use super::settlement::{SettlementPlanner, Tender};
use super::state::{SettlementEvent, SettlementState};
use super::types::{BillingPeriod, PeriodStatus};

/// Strategy for an amount from 0.01 to 10,000.00.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for an unpaid ledger line in 2024 with an optional record.
fn line_strategy() -> impl Strategy<Value = BillingPeriod> {
    (
        1u32..=12,
        amount_strategy(),
        0i64..100,
        0i64..50_000,
        any::<bool>(),
    )
        .prop_map(|(month, due, paid_pct, surcharge_cents, has_record)| {
            let period = PeriodKey::new(2024, month).unwrap();
            let amount_paid = (due * Decimal::new(paid_pct, 2)).round_dp(2);
            BillingPeriod {
                period,
                due_amount: due,
                amount_paid,
                status: if amount_paid.is_zero() {
                    PeriodStatus::Overdue
                } else {
                    PeriodStatus::Partial
                },
                due_date: period.due_date(),
                days_overdue: 10,
                surcharge: Decimal::new(surcharge_cents, 2),
                source_record_id: has_record.then(|| PaymentRecordId(i64::from(month))),
                es_adelanto: false,
            }
        })
}

/// Strategy for a selection with distinct months.
fn selection_strategy() -> impl Strategy<Value = Vec<BillingPeriod>> {
    prop::collection::vec(line_strategy(), 1..12).prop_map(|mut lines| {
        lines.sort_by_key(|l| l.period);
        lines.dedup_by_key(|l| l.period);
        lines
    })
}

fn tender(amount: Decimal) -> Tender {
    Tender {
        method: "efectivo".to_string(),
        reference: None,
        amount,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every cent of the tender is either applied or reported as excedente.
    #[test]
    fn prop_tender_is_fully_accounted(
        selected in selection_strategy(),
        amount in amount_strategy(),
    ) {
        let plan = SettlementPlanner::plan(&selected, &tender(amount)).unwrap();

        prop_assert_eq!(plan.total_applied + plan.excedente, amount);
        prop_assert_eq!(plan.principal_applied() + plan.surcharge_applied(), plan.total_applied);
        prop_assert!(plan.total_applied <= plan.total_owed);
        prop_assert!(plan.excedente >= Decimal::ZERO);
        if plan.excedente > Decimal::ZERO {
            prop_assert_eq!(plan.total_applied, plan.total_owed);
        }
    }

    /// Allocations are oldest first and a later period only receives money
    /// once every earlier one is cleared.
    #[test]
    fn prop_oldest_first(
        selected in selection_strategy(),
        amount in amount_strategy(),
    ) {
        let plan = SettlementPlanner::plan(&selected, &tender(amount)).unwrap();

        for pair in plan.allocations.windows(2) {
            prop_assert!(pair[0].line.period < pair[1].line.period);
            if pair[1].applied() > Decimal::ZERO {
                prop_assert_eq!(pair[0].applied(), pair[0].owed);
            }
        }
        for a in &plan.allocations {
            prop_assert!(a.applied() <= a.owed);
            // Principal is cleared before any surcharge is paid.
            if a.surcharge_applied > Decimal::ZERO {
                prop_assert_eq!(a.principal_applied, a.line.remaining_principal());
            }
        }
    }

    /// Feeding every created record through the state machine ends with one
    /// record id per selected period, in chronological order.
    #[test]
    fn prop_state_machine_collects_every_record(
        selected in selection_strategy(),
        amount in amount_strategy(),
    ) {
        let plan = SettlementPlanner::plan(&selected, &tender(amount)).unwrap();
        let missing = plan.missing_records(&super::types::Resident {
            id: fracc_shared::types::ResidentId(1),
            move_in_date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            housing_unit: super::types::HousingUnit {
                id: fracc_shared::types::HousingUnitId(1),
                maintenance_fee: Decimal::ONE_HUNDRED,
            },
        });

        let mut state = SettlementState::Selecting
            .advance(SettlementEvent::confirmed(&plan))
            .unwrap();
        let mut next_id = 1000;
        while let Some(period) = state.next_missing() {
            state = state
                .advance(SettlementEvent::RecordCreated { period, id: PaymentRecordId(next_id) })
                .unwrap();
            next_id += 1;
        }

        match state {
            SettlementState::ApplyingPayment { record_ids, created } => {
                prop_assert_eq!(record_ids.len(), selected.len());
                prop_assert_eq!(created.len(), missing.len());
            }
            other => prop_assert!(false, "unexpected state {}", other.name()),
        }
    }
}
