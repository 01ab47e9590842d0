use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::path::PathBuf;

/// Analysis parameters for the report CLI. The metrics engine itself takes
/// everything as plain arguments; this layer only exists so the binary can
/// be tuned without recompiling.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub data_path: PathBuf,
    pub employment_bucket_years: Vec<f64>,
    pub lti_threshold: f64,
    pub dti_threshold: f64,
    pub high_credit_threshold: Decimal,
}

impl AnalysisConfig {
    pub fn from_env() -> Result<Self> {
        let data_path = PathBuf::from(
            env::var("DATA_PATH").unwrap_or_else(|_| "data/applications.csv".to_string()),
        );

        let buckets_str =
            env::var("EMPLOYMENT_BUCKET_YEARS").unwrap_or_else(|_| "0,1,3,5,10,20".to_string());
        let employment_bucket_years: Vec<f64> = buckets_str
            .split(',')
            .map(|s| {
                s.trim()
                    .parse::<f64>()
                    .with_context(|| format!("Failed to parse EMPLOYMENT_BUCKET_YEARS entry '{s}'"))
            })
            .collect::<Result<_>>()?;
        if employment_bucket_years.is_empty() {
            anyhow::bail!("EMPLOYMENT_BUCKET_YEARS must contain at least one edge");
        }

        let lti_threshold = env::var("LTI_THRESHOLD")
            .unwrap_or_else(|_| "4.0".to_string())
            .parse::<f64>()
            .context("Failed to parse LTI_THRESHOLD")?;

        let dti_threshold = env::var("DTI_THRESHOLD")
            .unwrap_or_else(|_| "0.35".to_string())
            .parse::<f64>()
            .context("Failed to parse DTI_THRESHOLD")?;

        let high_credit_threshold = env::var("HIGH_CREDIT_THRESHOLD")
            .unwrap_or_else(|_| "1000000".to_string())
            .parse::<Decimal>()
            .context("Failed to parse HIGH_CREDIT_THRESHOLD")?;

        Ok(Self {
            data_path,
            employment_bucket_years,
            lti_threshold,
            dti_threshold,
            high_credit_threshold,
        })
    }
}
