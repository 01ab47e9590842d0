use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use super::distribution::DistributionSummary;
use super::indicator::NumericField;
use super::{MetricResult, MetricValue};
use crate::domain::credit::types::ApplicationRecord;

pub const DEFAULT_RATE: &str = "default_rate";
pub const INCOME_TO_LOAN: &str = "income_to_loan_ratio";

/// Categorical dimension for grouped aggregations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Gender,
    FamilyStatus,
    Education,
    Housing,
    ContractType,
    Occupation,
}

impl GroupField {
    pub fn name(&self) -> &'static str {
        match self {
            GroupField::Gender => "gender",
            GroupField::FamilyStatus => "family_status",
            GroupField::Education => "education",
            GroupField::Housing => "housing",
            GroupField::ContractType => "contract_type",
            GroupField::Occupation => "occupation",
        }
    }

    /// Group key for a record; `None` when the dimension is missing, which
    /// excludes the record from the grouping entirely.
    fn key(&self, record: &ApplicationRecord) -> Option<String> {
        match self {
            GroupField::Gender => record.gender.map(|g| g.as_str().to_string()),
            GroupField::FamilyStatus => record.family_status.map(|f| f.as_str().to_string()),
            GroupField::Education => record.education.map(|e| e.as_str().to_string()),
            GroupField::Housing => record.housing.map(|h| h.as_str().to_string()),
            GroupField::ContractType => record.contract_type.map(|c| c.as_str().to_string()),
            GroupField::Occupation => record.occupation.clone(),
        }
    }
}

/// Default rate over the whole record set: count(defaulted) over
/// count(target present). Records without a target do not dilute the rate.
pub fn default_rate(records: &[ApplicationRecord]) -> MetricResult {
    let mut eligible = 0usize;
    let mut defaults = 0usize;

    for record in records {
        if let Some(defaulted) = record.defaulted() {
            eligible += 1;
            if defaulted {
                defaults += 1;
            }
        }
    }

    if eligible == 0 {
        return MetricResult::empty(DEFAULT_RATE);
    }
    MetricResult::scalar(DEFAULT_RATE, defaults as f64 / eligible as f64, eligible)
}

/// Default rate per category of the given dimension, in a single pass.
///
/// Running (defaults, eligible) accumulators are kept per group and the
/// final ratios emitted at the end. Groups whose members all lack a target
/// report `value = None, count = 0` rather than failing on the division.
pub fn default_rate_by(
    records: &[ApplicationRecord],
    field: GroupField,
) -> BTreeMap<String, MetricResult> {
    let mut acc: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for record in records {
        let Some(key) = field.key(record) else {
            continue;
        };
        let entry = acc.entry(key).or_insert((0, 0));
        if let Some(defaulted) = record.defaulted() {
            entry.1 += 1;
            if defaulted {
                entry.0 += 1;
            }
        }
    }

    acc.into_iter()
        .map(|(key, (defaults, eligible))| {
            let result = if eligible == 0 {
                MetricResult::empty(DEFAULT_RATE)
            } else {
                MetricResult::scalar(DEFAULT_RATE, defaults as f64 / eligible as f64, eligible)
            };
            (key, result)
        })
        .collect()
}

/// Default rate by family status. The dashboards read this as the
/// family-status risk correlation table.
pub fn family_status_breakdown(
    records: &[ApplicationRecord],
) -> BTreeMap<String, MetricResult> {
    default_rate_by(records, GroupField::FamilyStatus)
}

/// Population count per category of the given dimension.
pub fn category_counts(
    records: &[ApplicationRecord],
    field: GroupField,
) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(key) = field.key(record) {
            *counts.entry(key).or_default() += 1;
        }
    }
    counts
}

/// Distribution outcome of a per-record ratio computation.
///
/// `metric.count` is the number of valid ratios; `invalid_count` tracks
/// records excluded for a non-positive denominator. Records missing either
/// side never enter the computation.
#[derive(Debug, Clone, Serialize)]
pub struct RatioReport {
    pub metric: MetricResult,
    pub invalid_count: usize,
}

impl RatioReport {
    pub fn valid_count(&self) -> usize {
        self.metric.count
    }
}

/// Income-to-loan ratio (income / credit amount) across the portfolio.
pub fn income_to_loan_ratio(records: &[ApplicationRecord]) -> RatioReport {
    ratio_distribution(
        records,
        NumericField::IncomeTotal,
        NumericField::CreditAmount,
        INCOME_TO_LOAN,
    )
}

/// Per-record ratio of two numeric fields, summarized as a distribution.
/// Denominators at or below zero are excluded silently and counted as
/// invalid.
pub fn ratio_distribution(
    records: &[ApplicationRecord],
    numerator: NumericField,
    denominator: NumericField,
    name: &str,
) -> RatioReport {
    let mut ratios = Vec::new();
    let mut invalid = 0usize;

    for record in records {
        let (Some(num), Some(den)) = (numerator.extract(record), denominator.extract(record))
        else {
            continue;
        };
        if den <= 0.0 {
            invalid += 1;
            continue;
        }
        ratios.push(num / den);
    }

    let count = ratios.len();
    let metric = match DistributionSummary::from_values(ratios) {
        Some(summary) => MetricResult::distribution(name, summary, count),
        None => MetricResult::empty(name),
    };

    RatioReport {
        metric,
        invalid_count: invalid,
    }
}

/// Distribution summary of a single numeric field over the records where
/// it is present.
pub fn field_distribution(records: &[ApplicationRecord], field: NumericField) -> MetricResult {
    let values: Vec<f64> = records.iter().filter_map(|r| field.extract(r)).collect();
    let count = values.len();
    match DistributionSummary::from_values(values) {
        Some(summary) => MetricResult::distribution(field.name(), summary, count),
        None => MetricResult::empty(field.name()),
    }
}

/// Default rates for the populations above and at-or-below a ratio
/// threshold (e.g. loan-to-income beyond an affordability line). Returns
/// (above, at_or_below).
pub fn rate_split_by_ratio(
    records: &[ApplicationRecord],
    numerator: NumericField,
    denominator: NumericField,
    threshold: f64,
    name: &str,
) -> (MetricResult, MetricResult) {
    // (defaults, eligible) for each side of the threshold
    let mut above = (0usize, 0usize);
    let mut below = (0usize, 0usize);

    for record in records {
        let (Some(num), Some(den)) = (numerator.extract(record), denominator.extract(record))
        else {
            continue;
        };
        if den <= 0.0 {
            continue;
        }
        let Some(defaulted) = record.defaulted() else {
            continue;
        };

        let side = if num / den > threshold {
            &mut above
        } else {
            &mut below
        };
        side.1 += 1;
        if defaulted {
            side.0 += 1;
        }
    }

    let emit = |label: String, (defaults, eligible): (usize, usize)| {
        if eligible == 0 {
            MetricResult::empty(label)
        } else {
            MetricResult::scalar(label, defaults as f64 / eligible as f64, eligible)
        }
    };

    (
        emit(format!("{name}_above"), above),
        emit(format!("{name}_at_or_below"), below),
    )
}

/// Share of records whose field value exceeds a threshold, over the
/// records where the field is present.
pub fn share_above(
    records: &[ApplicationRecord],
    field: NumericField,
    threshold: Decimal,
    name: &str,
) -> MetricResult {
    let threshold = threshold.to_f64().unwrap_or(0.0);
    let mut present = 0usize;
    let mut above = 0usize;

    for record in records {
        if let Some(value) = field.extract(record) {
            present += 1;
            if value > threshold {
                above += 1;
            }
        }
    }

    if present == 0 {
        return MetricResult::empty(name);
    }
    MetricResult::scalar(name, above as f64 / present as f64, present)
}

/// Weighted mean of grouped scalar results; used to cross-check that a
/// partition of the record set reproduces the ungrouped rate.
pub fn weighted_mean(results: &BTreeMap<String, MetricResult>) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total = 0usize;
    for result in results.values() {
        if let Some(MetricValue::Scalar(v)) = &result.value {
            weighted += v * result.count as f64;
            total += result.count;
        }
    }
    if total == 0 {
        return None;
    }
    Some(weighted / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credit::types::{FamilyStatus, Gender, Target};
    use rust_decimal_macros::dec;

    fn record(id: u64) -> ApplicationRecord {
        ApplicationRecord {
            id,
            target: None,
            income_total: None,
            credit_amount: None,
            annuity_amount: None,
            goods_price: None,
            days_birth: None,
            days_employed: None,
            gender: None,
            family_status: None,
            education: None,
            housing: None,
            contract_type: None,
            occupation: None,
            children_count: None,
            family_members: None,
        }
    }

    fn with_target(id: u64, target: Target) -> ApplicationRecord {
        ApplicationRecord {
            target: Some(target),
            ..record(id)
        }
    }

    #[test]
    fn test_default_rate_bounds() {
        let records = vec![
            with_target(1, Target::Default),
            with_target(2, Target::Repaid),
            with_target(3, Target::Repaid),
            with_target(4, Target::Repaid),
        ];

        let result = default_rate(&records);
        let rate = result.as_scalar().unwrap();
        assert!((0.0..=1.0).contains(&rate));
        assert!((rate - 0.25).abs() < 1e-9);
        assert_eq!(result.count, 4);
    }

    #[test]
    fn test_default_rate_excludes_missing_target() {
        let records = vec![
            with_target(1, Target::Default),
            with_target(2, Target::Repaid),
            record(3),
        ];

        let result = default_rate(&records);
        assert_eq!(result.count, 2);
        assert!((result.as_scalar().unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_default_rate_empty_input_reports_null() {
        let result = default_rate(&[]);
        assert!(result.value.is_none());
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_default_rate_all_targets_missing_reports_null() {
        let records = vec![record(1), record(2)];
        let result = default_rate(&records);
        assert!(result.value.is_none());
        assert_eq!(result.count, 0);
    }

    #[test]
    fn test_grouped_rates_match_weighted_average() {
        let mut records = Vec::new();
        for i in 0..10u64 {
            let mut r = with_target(
                i,
                if i % 3 == 0 { Target::Default } else { Target::Repaid },
            );
            r.gender = Some(if i % 2 == 0 { Gender::Female } else { Gender::Male });
            records.push(r);
        }

        let overall = default_rate(&records).as_scalar().unwrap();
        let grouped = default_rate_by(&records, GroupField::Gender);
        let weighted = weighted_mean(&grouped).unwrap();

        assert!((overall - weighted).abs() < 1e-9);
    }

    #[test]
    fn test_family_status_breakdown_example() {
        let mut married_default = with_target(1, Target::Default);
        married_default.family_status = Some(FamilyStatus::Married);
        let mut married_repaid = with_target(2, Target::Repaid);
        married_repaid.family_status = Some(FamilyStatus::Married);
        let mut single_default = with_target(3, Target::Default);
        single_default.family_status = Some(FamilyStatus::SingleNotMarried);

        let records = vec![married_default, married_repaid, single_default];
        let breakdown = family_status_breakdown(&records);

        let married = &breakdown["Married"];
        assert!((married.as_scalar().unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(married.count, 2);

        let single = &breakdown["Single / not married"];
        assert!((single.as_scalar().unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(single.count, 1);
    }

    #[test]
    fn test_zero_eligible_group_reports_null_not_panic() {
        let mut no_target = record(1);
        no_target.family_status = Some(FamilyStatus::Widow);

        let breakdown = family_status_breakdown(&[no_target]);
        let widow = &breakdown["Widow"];
        assert!(widow.value.is_none());
        assert_eq!(widow.count, 0);
    }

    #[test]
    fn test_income_to_loan_excludes_non_positive_credit() {
        let mut valid = record(1);
        valid.income_total = Some(dec!(1000));
        valid.credit_amount = Some(dec!(500));
        let mut invalid = record(2);
        invalid.income_total = Some(dec!(2000));
        invalid.credit_amount = Some(dec!(0));

        let report = income_to_loan_ratio(&[valid, invalid]);
        assert_eq!(report.valid_count(), 1);
        assert_eq!(report.invalid_count, 1);

        let summary = report.metric.as_distribution().unwrap();
        assert!((summary.mean - 2.0).abs() < 1e-9);
        assert!((summary.min - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_income_to_loan_empty_input() {
        let report = income_to_loan_ratio(&[]);
        assert!(report.metric.value.is_none());
        assert_eq!(report.metric.count, 0);
        assert_eq!(report.invalid_count, 0);
    }

    #[test]
    fn test_rate_split_by_ratio_threshold() {
        // LTI 4.0 defaulting, LTI 1.0 repaying
        let mut stretched = with_target(1, Target::Default);
        stretched.income_total = Some(dec!(100_000));
        stretched.credit_amount = Some(dec!(400_000));
        let mut comfortable = with_target(2, Target::Repaid);
        comfortable.income_total = Some(dec!(100_000));
        comfortable.credit_amount = Some(dec!(100_000));

        let (above, below) = rate_split_by_ratio(
            &[stretched, comfortable],
            NumericField::CreditAmount,
            NumericField::IncomeTotal,
            2.0,
            "loan_to_income",
        );

        assert!((above.as_scalar().unwrap() - 1.0).abs() < 1e-9);
        assert!((below.as_scalar().unwrap() - 0.0).abs() < 1e-9);
        assert_eq!(above.name, "loan_to_income_above");
        assert_eq!(below.name, "loan_to_income_at_or_below");
    }

    #[test]
    fn test_share_above_threshold() {
        let mut small = record(1);
        small.credit_amount = Some(dec!(400_000));
        let mut large = record(2);
        large.credit_amount = Some(dec!(1_500_000));

        let share = share_above(
            &[small, large],
            NumericField::CreditAmount,
            dec!(1_000_000),
            "high_credit_share",
        );
        assert!((share.as_scalar().unwrap() - 0.5).abs() < 1e-9);
        assert_eq!(share.count, 2);
    }

    #[test]
    fn test_category_counts() {
        let mut a = record(1);
        a.gender = Some(Gender::Female);
        let mut b = record(2);
        b.gender = Some(Gender::Female);
        let mut c = record(3);
        c.gender = Some(Gender::Male);
        let d = record(4); // missing dimension, excluded

        let counts = category_counts(&[a, b, c, d], GroupField::Gender);
        assert_eq!(counts["Female"], 2);
        assert_eq!(counts["Male"], 1);
        assert_eq!(counts.len(), 2);
    }
}
