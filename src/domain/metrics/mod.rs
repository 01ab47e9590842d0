// Employment-tenure bucket table
pub mod buckets;

// Pearson correlations over numeric fields
pub mod correlation;

// Distribution summaries (percentiles, moments)
pub mod distribution;

// Core aggregations: default rates, ratio distributions
pub mod engine;

// Generic named financial indicators
pub mod indicator;

// Missing-data assessment
pub mod quality;

use serde::Serialize;

pub use buckets::{EmploymentBucket, employment_buckets};
pub use distribution::DistributionSummary;
pub use engine::{
    GroupField, RatioReport, category_counts, default_rate, default_rate_by,
    family_status_breakdown, field_distribution, income_to_loan_ratio,
};
pub use indicator::{Aggregation, IndicatorConfig, NumericField, RecordFilter, financial_indicator};

/// The engine's uniform output unit: a named value plus the record count
/// it was computed from. `value = None` with `count = 0` is the reportable
/// "no data" state.
#[derive(Debug, Clone, Serialize)]
pub struct MetricResult {
    pub name: String,
    pub value: Option<MetricValue>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(f64),
    Distribution(DistributionSummary),
    Buckets(Vec<EmploymentBucket>),
}

impl MetricResult {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            count: 0,
        }
    }

    pub fn scalar(name: impl Into<String>, value: f64, count: usize) -> Self {
        Self {
            name: name.into(),
            value: Some(MetricValue::Scalar(value)),
            count,
        }
    }

    pub fn distribution(name: impl Into<String>, summary: DistributionSummary, count: usize) -> Self {
        Self {
            name: name.into(),
            value: Some(MetricValue::Distribution(summary)),
            count,
        }
    }

    pub fn buckets(name: impl Into<String>, buckets: Vec<EmploymentBucket>, count: usize) -> Self {
        Self {
            name: name.into(),
            value: Some(MetricValue::Buckets(buckets)),
            count,
        }
    }

    /// Scalar payload, if this result carries one.
    pub fn as_scalar(&self) -> Option<f64> {
        match &self.value {
            Some(MetricValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    /// Distribution payload, if this result carries one.
    pub fn as_distribution(&self) -> Option<&DistributionSummary> {
        match &self.value {
            Some(MetricValue::Distribution(d)) => Some(d),
            _ => None,
        }
    }
}
