use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::domain::credit::types::ApplicationRecord;
use crate::domain::errors::MetricsError;
use crate::domain::metrics::correlation::{
    TargetCorrelation, field_correlation, target_correlation, target_correlations,
};
use crate::domain::metrics::engine::{
    self, GroupField, RatioReport, rate_split_by_ratio, share_above,
};
use crate::domain::metrics::indicator::{IndicatorConfig, NumericField, RecordFilter};
use crate::domain::metrics::quality::{self, DataQualityReport};
use crate::domain::metrics::{MetricResult, employment_buckets, financial_indicator};

/// Portfolio-level KPI block.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewSection {
    pub total_applicants: usize,
    pub default_rate: MetricResult,
    pub repaid_rate: MetricResult,
    pub median_age: Option<f64>,
    pub median_income: Option<f64>,
    pub avg_credit: MetricResult,
    pub income: MetricResult,
    pub credit: MetricResult,
}

/// Mean profile of one repayment segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentAverages {
    pub income: MetricResult,
    pub credit: MetricResult,
    pub annuity: MetricResult,
    pub employment_years: MetricResult,
    pub age: MetricResult,
}

/// Default rates across categorical dimensions plus the defaulter/repaid
/// mean-profile contrast.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentationSection {
    pub by_dimension: BTreeMap<String, BTreeMap<String, MetricResult>>,
    pub population: BTreeMap<String, BTreeMap<String, usize>>,
    pub defaulters: SegmentAverages,
    pub repaid: SegmentAverages,
    pub income_gap: Option<f64>,
    pub credit_gap: Option<f64>,
}

/// Affordability ratios and their threshold splits.
#[derive(Debug, Clone, Serialize)]
pub struct AffordabilitySection {
    pub income_to_loan: RatioReport,
    pub debt_to_income: RatioReport,
    pub loan_to_income: RatioReport,
    pub default_rate_high_dti: MetricResult,
    pub default_rate_low_dti: MetricResult,
    pub default_rate_high_lti: MetricResult,
    pub default_rate_low_lti: MetricResult,
    pub high_credit_share: MetricResult,
}

/// Fixed correlation panel plus the ranked corr-with-target table.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationSection {
    pub income_credit: Option<f64>,
    pub age_target: Option<f64>,
    pub employment_target: Option<f64>,
    pub family_size_target: Option<f64>,
    pub with_target: Vec<TargetCorrelation>,
}

/// Everything a risk dashboard needs to render, computed in one shot from
/// an immutable record collection. Pure: same input, same report.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    pub overview: OverviewSection,
    pub segmentation: SegmentationSection,
    pub affordability: AffordabilitySection,
    pub employment: MetricResult,
    pub correlations: CorrelationSection,
    pub quality: DataQualityReport,
}

const SEGMENT_DIMENSIONS: [GroupField; 6] = [
    GroupField::Gender,
    GroupField::FamilyStatus,
    GroupField::Education,
    GroupField::Housing,
    GroupField::ContractType,
    GroupField::Occupation,
];

fn segment_averages(
    records: &[ApplicationRecord],
    filter: RecordFilter,
    suffix: &str,
) -> Result<SegmentAverages, MetricsError> {
    let mean_of = |field: NumericField, name: String| {
        financial_indicator(
            records,
            &name,
            &IndicatorConfig::new(field.name(), "mean").with_filter(filter),
        )
    };

    Ok(SegmentAverages {
        income: mean_of(NumericField::IncomeTotal, format!("avg_income_{suffix}"))?,
        credit: mean_of(NumericField::CreditAmount, format!("avg_credit_{suffix}"))?,
        annuity: mean_of(NumericField::AnnuityAmount, format!("avg_annuity_{suffix}"))?,
        employment_years: mean_of(
            NumericField::EmploymentYears,
            format!("avg_employment_{suffix}"),
        )?,
        age: mean_of(NumericField::AgeYears, format!("avg_age_{suffix}"))?,
    })
}

impl PortfolioReport {
    pub fn build(
        records: &[ApplicationRecord],
        config: &AnalysisConfig,
    ) -> Result<Self, MetricsError> {
        let default_rate = engine::default_rate(records);
        let repaid_rate = match default_rate.as_scalar() {
            Some(rate) => MetricResult::scalar("repaid_rate", 1.0 - rate, default_rate.count),
            None => MetricResult::empty("repaid_rate"),
        };

        let age = engine::field_distribution(records, NumericField::AgeYears);
        let income = engine::field_distribution(records, NumericField::IncomeTotal);
        let credit = engine::field_distribution(records, NumericField::CreditAmount);

        let overview = OverviewSection {
            total_applicants: records.len(),
            median_age: age.as_distribution().map(|d| d.median),
            median_income: income.as_distribution().map(|d| d.median),
            avg_credit: financial_indicator(
                records,
                "avg_credit",
                &IndicatorConfig::new(NumericField::CreditAmount.name(), "mean"),
            )?,
            default_rate,
            repaid_rate,
            income,
            credit,
        };

        // Each dimension is an independent single-pass aggregation over the
        // shared immutable records, so they fan out across the thread pool.
        let by_dimension: BTreeMap<String, BTreeMap<String, MetricResult>> = SEGMENT_DIMENSIONS
            .par_iter()
            .map(|dim| (dim.name().to_string(), engine::default_rate_by(records, *dim)))
            .collect();
        let population: BTreeMap<String, BTreeMap<String, usize>> = SEGMENT_DIMENSIONS
            .par_iter()
            .map(|dim| (dim.name().to_string(), engine::category_counts(records, *dim)))
            .collect();

        let defaulters = segment_averages(records, RecordFilter::DefaultedOnly, "defaulters")?;
        let repaid = segment_averages(records, RecordFilter::RepaidOnly, "repaid")?;
        let gap = |a: &MetricResult, b: &MetricResult| match (a.as_scalar(), b.as_scalar()) {
            (Some(x), Some(y)) => Some(x - y),
            _ => None,
        };

        let segmentation = SegmentationSection {
            by_dimension,
            population,
            income_gap: gap(&repaid.income, &defaulters.income),
            credit_gap: gap(&repaid.credit, &defaulters.credit),
            defaulters,
            repaid,
        };

        let (default_rate_high_dti, default_rate_low_dti) = rate_split_by_ratio(
            records,
            NumericField::AnnuityAmount,
            NumericField::IncomeTotal,
            config.dti_threshold,
            "debt_to_income",
        );
        let (default_rate_high_lti, default_rate_low_lti) = rate_split_by_ratio(
            records,
            NumericField::CreditAmount,
            NumericField::IncomeTotal,
            config.lti_threshold,
            "loan_to_income",
        );

        let affordability = AffordabilitySection {
            income_to_loan: engine::income_to_loan_ratio(records),
            debt_to_income: engine::ratio_distribution(
                records,
                NumericField::AnnuityAmount,
                NumericField::IncomeTotal,
                "debt_to_income",
            ),
            loan_to_income: engine::ratio_distribution(
                records,
                NumericField::CreditAmount,
                NumericField::IncomeTotal,
                "loan_to_income",
            ),
            default_rate_high_dti,
            default_rate_low_dti,
            default_rate_high_lti,
            default_rate_low_lti,
            high_credit_share: share_above(
                records,
                NumericField::CreditAmount,
                config.high_credit_threshold,
                "high_credit_share",
            ),
        };

        let buckets = employment_buckets(records, &config.employment_bucket_years);
        let employment = if records.is_empty() {
            MetricResult::empty("employment_buckets")
        } else {
            MetricResult::buckets("employment_buckets", buckets, records.len())
        };

        let correlations = CorrelationSection {
            income_credit: field_correlation(
                records,
                NumericField::IncomeTotal,
                NumericField::CreditAmount,
            ),
            age_target: target_correlation(records, NumericField::AgeYears),
            employment_target: target_correlation(records, NumericField::EmploymentYears),
            family_size_target: target_correlation(records, NumericField::FamilyMembers),
            with_target: target_correlations(records),
        };

        Ok(Self {
            overview,
            segmentation,
            affordability,
            employment,
            correlations,
            quality: quality::assess(records),
        })
    }
}
