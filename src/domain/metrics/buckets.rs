use serde::Serialize;

use crate::domain::credit::types::ApplicationRecord;

pub const UNKNOWN_BUCKET_LABEL: &str = "unemployed/unknown";

/// One row of the employment-tenure bucket table.
#[derive(Debug, Clone, Serialize)]
pub struct EmploymentBucket {
    pub label: String,
    pub count: usize,
    pub default_rate: Option<f64>,
}

/// Buckets the portfolio by employment tenure (years) and reports each
/// bucket's population and within-bucket default rate.
///
/// Caller-supplied edges are sorted and deduplicated internally. Intervals
/// are half-open and lower-inclusive: a tenure exactly on an edge counts
/// toward the bucket opening at that edge. The last bucket is open-ended.
/// Records with unknown tenure form a distinguished bucket that is always
/// first in the output, ahead of the numeric buckets in ascending order.
pub fn employment_buckets(
    records: &[ApplicationRecord],
    bucket_edges_years: &[f64],
) -> Vec<EmploymentBucket> {
    let mut edges: Vec<f64> = bucket_edges_years.to_vec();
    edges.sort_by(|a, b| a.total_cmp(b));
    edges.dedup();
    if edges.is_empty() {
        edges.push(0.0);
    }

    // Slot 0 is the unknown bucket; numeric buckets follow in edge order.
    // Each slot holds (population, defaults, eligible).
    let mut slots = vec![(0usize, 0usize, 0usize); edges.len() + 1];

    for record in records {
        let slot = match record.employment_years() {
            None => 0,
            Some(years) => {
                // Index of the bucket whose lower edge is the last edge <= years.
                // Tenures below the lowest edge land in the first numeric bucket.
                let position = edges.partition_point(|edge| *edge <= years);
                1 + position.saturating_sub(1)
            }
        };

        slots[slot].0 += 1;
        if let Some(defaulted) = record.defaulted() {
            slots[slot].2 += 1;
            if defaulted {
                slots[slot].1 += 1;
            }
        }
    }

    let label_for = |index: usize| -> String {
        if index == 0 {
            return UNKNOWN_BUCKET_LABEL.to_string();
        }
        let lower = edges[index - 1];
        match edges.get(index) {
            Some(upper) => format!("[{lower}, {upper})"),
            None => format!("[{lower}, inf)"),
        }
    };

    slots
        .into_iter()
        .enumerate()
        .map(|(index, (count, defaults, eligible))| EmploymentBucket {
            label: label_for(index),
            count,
            default_rate: if eligible == 0 {
                None
            } else {
                Some(defaults as f64 / eligible as f64)
            },
        })
        .collect()
}
