use serde::Serialize;
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

/// Summary of a numeric sample: extremes, quartiles, tail percentiles and
/// moments. The p99 tail mirrors the outlier cut the dashboards apply to
/// income and credit amounts before display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DistributionSummary {
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub mean: f64,
    pub p75: f64,
    pub p90: f64,
    pub p99: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl DistributionSummary {
    /// Summarize a sample. Returns `None` for an empty sample; a singleton
    /// collapses min, median, mean and max onto the single value with a
    /// zero standard deviation.
    pub fn from_values(values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut data = Data::new(values);
        let mean = data.mean()?;
        // Sample std dev is undefined for n < 2
        let std_dev = data.std_dev().unwrap_or(0.0);

        Some(Self {
            min: data.min(),
            p25: data.percentile(25),
            median: data.median(),
            mean,
            p75: data.percentile(75),
            p90: data.percentile(90),
            p99: data.percentile(99),
            max: data.max(),
            std_dev,
        })
    }
}
