//! Period and VAT report aggregates
//!
//! Report builders turn a categorised [`Transactions`] into per-period
//! figures. Uncategorised money is always reported as its own figure so it
//! can be chased down, never folded into another total.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::date::{AccountingMonth, AccountingYear, DateRange, Day};
use crate::models::PayeeCategory;
use crate::transactions::Transactions;

/// Category totals for one period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub first_day: Day,
    pub last_day: Day,
    /// Totals for every category present in the period, including `Uncategorised`
    pub totals: BTreeMap<PayeeCategory, Decimal>,
    pub uncategorised: Decimal,
    pub total: Decimal,
}

impl PeriodSummary {
    pub fn for_range(label: impl Into<String>, range: &dyn DateRange, transactions: &Transactions) -> Self {
        let within = transactions.restrict_to_period(range);
        Self {
            label: label.into(),
            first_day: range.first_day(),
            last_day: range.last_day(),
            totals: within.totals_by_category(),
            uncategorised: within.uncategorised_total(),
            total: within.total_amount(),
        }
    }

    pub fn total_for(&self, category: PayeeCategory) -> Decimal {
        self.totals.get(&category).copied().unwrap_or(Decimal::ZERO)
    }
}

/// One summary per accounting month of `year`
pub fn accounting_year_report(transactions: &Transactions, year: AccountingYear) -> Vec<PeriodSummary> {
    year.months()
        .iter()
        .map(|month| PeriodSummary::for_range(month.to_string(), month, transactions))
        .collect()
}

/// One summary per week of an accounting month
pub fn weekly_report(transactions: &Transactions, month: AccountingMonth) -> Vec<PeriodSummary> {
    month
        .weeks()
        .iter()
        .map(|week| PeriodSummary::for_range(week.to_string(), week, transactions))
        .collect()
}

/// Money in and out over a range, split by VAT treatment.
///
/// Payments to and from HMRC for VAT itself, internal transfers and
/// uncategorised rows are kept out of the four VAT buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VatSummary {
    pub first_day: Day,
    pub last_day: Day,
    pub vatable_income: Decimal,
    pub exempt_income: Decimal,
    pub vatable_expenditure: Decimal,
    pub exempt_expenditure: Decimal,
    /// Net paid to (negative) or refunded by (positive) HMRC
    pub vat_settled: Decimal,
    pub uncategorised: Decimal,
}

/// Categories that never count towards VAT-able or exempt turnover
const OUTSIDE_VAT_BUCKETS: [PayeeCategory; 4] = [
    PayeeCategory::Vat,
    PayeeCategory::VatRefund,
    PayeeCategory::InternalTransfer,
    PayeeCategory::Uncategorised,
];

impl VatSummary {
    pub fn for_range(range: &dyn DateRange, transactions: &Transactions) -> Self {
        let within = transactions.restrict_to_period(range);

        let bucket = |vatable: bool, credit: bool| -> Decimal {
            let categories: Vec<PayeeCategory> = PayeeCategory::ALL
                .into_iter()
                .filter(|c| !OUTSIDE_VAT_BUCKETS.contains(c))
                .filter(|c| c.is_subject_to_vat() == vatable && c.is_credit() == credit)
                .collect();
            within.total_for(&categories)
        };

        Self {
            first_day: range.first_day(),
            last_day: range.last_day(),
            vatable_income: bucket(true, true),
            exempt_income: bucket(false, true),
            vatable_expenditure: bucket(true, false),
            exempt_expenditure: bucket(false, false),
            vat_settled: within.total_for(&[PayeeCategory::Vat, PayeeCategory::VatRefund]),
            uncategorised: within.uncategorised_total(),
        }
    }

    /// VAT contained in VAT-able income at the standard 20% rate
    pub fn output_vat(&self) -> Decimal {
        (self.vatable_income / Decimal::from(6)).round_dp(2)
    }

    /// VAT contained in VAT-able expenditure at the standard 20% rate, as a positive figure
    pub fn input_vat(&self) -> Decimal {
        (-self.vatable_expenditure / Decimal::from(6)).round_dp(2)
    }
}
