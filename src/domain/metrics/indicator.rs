use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::MetricResult;
use crate::domain::credit::types::ApplicationRecord;
use crate::domain::errors::MetricsError;

/// Numeric record fields an indicator may aggregate over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericField {
    IncomeTotal,
    CreditAmount,
    AnnuityAmount,
    GoodsPrice,
    AgeYears,
    EmploymentYears,
    ChildrenCount,
    FamilyMembers,
}

impl NumericField {
    pub const ALL: [NumericField; 8] = [
        NumericField::IncomeTotal,
        NumericField::CreditAmount,
        NumericField::AnnuityAmount,
        NumericField::GoodsPrice,
        NumericField::AgeYears,
        NumericField::EmploymentYears,
        NumericField::ChildrenCount,
        NumericField::FamilyMembers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumericField::IncomeTotal => "income_total",
            NumericField::CreditAmount => "credit_amount",
            NumericField::AnnuityAmount => "annuity_amount",
            NumericField::GoodsPrice => "goods_price",
            NumericField::AgeYears => "age_years",
            NumericField::EmploymentYears => "employment_years",
            NumericField::ChildrenCount => "children_count",
            NumericField::FamilyMembers => "family_members",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == s)
    }

    /// Field value as f64, `None` when absent on the record.
    pub fn extract(&self, record: &ApplicationRecord) -> Option<f64> {
        match self {
            NumericField::IncomeTotal => record.income_total.and_then(|v| v.to_f64()),
            NumericField::CreditAmount => record.credit_amount.and_then(|v| v.to_f64()),
            NumericField::AnnuityAmount => record.annuity_amount.and_then(|v| v.to_f64()),
            NumericField::GoodsPrice => record.goods_price.and_then(|v| v.to_f64()),
            NumericField::AgeYears => record.age_years(),
            NumericField::EmploymentYears => record.employment_years(),
            NumericField::ChildrenCount => record.children_count.map(|v| v as f64),
            NumericField::FamilyMembers => record.family_members,
        }
    }
}

/// Supported aggregation kinds for financial indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
    Rate,
    Count,
}

impl Aggregation {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sum" => Some(Aggregation::Sum),
            "mean" => Some(Aggregation::Mean),
            "rate" => Some(Aggregation::Rate),
            "count" => Some(Aggregation::Count),
            _ => None,
        }
    }
}

/// Optional record predicate narrowing an indicator to a segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordFilter {
    DefaultedOnly,
    RepaidOnly,
    FieldAtLeast { field: NumericField, threshold: f64 },
    FieldBelow { field: NumericField, threshold: f64 },
}

impl RecordFilter {
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        match self {
            RecordFilter::DefaultedOnly => record.defaulted() == Some(true),
            RecordFilter::RepaidOnly => record.defaulted() == Some(false),
            RecordFilter::FieldAtLeast { field, threshold } => {
                field.extract(record).is_some_and(|v| v >= *threshold)
            }
            RecordFilter::FieldBelow { field, threshold } => {
                field.extract(record).is_some_and(|v| v < *threshold)
            }
        }
    }
}

/// Recognized options for a financial indicator. `field` and `aggregation`
/// are free-form strings validated at computation time so that
/// configuration can come straight from the environment or a file.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub field: String,
    pub aggregation: String,
    pub filter: Option<RecordFilter>,
}

impl IndicatorConfig {
    pub fn new(field: impl Into<String>, aggregation: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            aggregation: aggregation.into(),
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Indicator names the engine recognizes. Requests outside this registry
/// are programming errors, surfaced immediately.
pub const KNOWN_INDICATORS: &[&str] = &[
    "total_income_sum",
    "avg_income",
    "avg_credit",
    "avg_annuity",
    "avg_goods_price",
    "avg_age",
    "avg_employment_years",
    "avg_family_size",
    "avg_income_defaulters",
    "avg_credit_defaulters",
    "avg_annuity_defaulters",
    "avg_employment_defaulters",
    "avg_age_defaulters",
    "avg_income_repaid",
    "avg_credit_repaid",
    "avg_annuity_repaid",
    "avg_employment_repaid",
    "avg_age_repaid",
    "default_rate",
    "applicants_with_income",
];

/// Generic entry point for indicators expressible as a named aggregation
/// over a configurable field with an optional filter predicate.
///
/// Unknown indicator names and unrecognized fields raise
/// [`MetricsError::UnknownIndicator`]; unsupported aggregation kinds raise
/// [`MetricsError::InvalidAggregation`]. Data absence is reported as a
/// null-valued, zero-count result, never an error.
pub fn financial_indicator(
    records: &[ApplicationRecord],
    indicator_name: &str,
    config: &IndicatorConfig,
) -> Result<MetricResult, MetricsError> {
    if !KNOWN_INDICATORS.contains(&indicator_name) {
        return Err(MetricsError::UnknownIndicator {
            name: indicator_name.to_string(),
        });
    }
    let field = NumericField::parse(&config.field).ok_or_else(|| MetricsError::UnknownIndicator {
        name: config.field.clone(),
    })?;
    let aggregation =
        Aggregation::parse(&config.aggregation).ok_or_else(|| MetricsError::InvalidAggregation {
            kind: config.aggregation.clone(),
        })?;

    let mut sum = 0.0;
    let mut present = 0usize;
    let mut defaults = 0usize;
    let mut eligible = 0usize;

    for record in records {
        if let Some(filter) = &config.filter {
            if !filter.matches(record) {
                continue;
            }
        }
        match aggregation {
            Aggregation::Rate => {
                if let Some(defaulted) = record.defaulted() {
                    eligible += 1;
                    if defaulted {
                        defaults += 1;
                    }
                }
            }
            _ => {
                if let Some(value) = field.extract(record) {
                    sum += value;
                    present += 1;
                }
            }
        }
    }

    let result = match aggregation {
        Aggregation::Sum if present > 0 => MetricResult::scalar(indicator_name, sum, present),
        Aggregation::Mean if present > 0 => {
            MetricResult::scalar(indicator_name, sum / present as f64, present)
        }
        Aggregation::Count if present > 0 => {
            MetricResult::scalar(indicator_name, present as f64, present)
        }
        Aggregation::Rate if eligible > 0 => {
            MetricResult::scalar(indicator_name, defaults as f64 / eligible as f64, eligible)
        }
        _ => MetricResult::empty(indicator_name),
    };
    Ok(result)
}
