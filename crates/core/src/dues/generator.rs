//! Billing period enumeration.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::period::PeriodKey;
use super::types::BillingMode;

/// Enumerates the months a resident can owe dues for.
pub struct PeriodGenerator;

impl PeriodGenerator {
    /// Lists billing periods in ascending order with no gaps or duplicates.
    ///
    /// - `Arrears`: move-in month through the month before `today`'s month.
    ///   Empty when move-in is in the current month or later. `covered` is
    ///   ignored.
    /// - `Advance`: from the later of the current month and the move-in
    ///   month through December of `today`'s year, skipping every month in
    ///   `covered` (months that already have a record).
    #[must_use]
    pub fn generate(
        move_in: NaiveDate,
        today: NaiveDate,
        mode: BillingMode,
        covered: &BTreeSet<PeriodKey>,
    ) -> Vec<PeriodKey> {
        let first = PeriodKey::from_date(move_in);
        let current = PeriodKey::from_date(today);

        match mode {
            BillingMode::Arrears => {
                if first >= current {
                    return Vec::new();
                }
                first.through(current.prev()).collect()
            }
            BillingMode::Advance => first
                .max(current)
                .through(current.end_of_year())
                .filter(|p| !covered.contains(p))
                .collect(),
        }
    }
}
