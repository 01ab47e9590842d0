use serde::Serialize;

use crate::domain::credit::types::ApplicationRecord;

/// Missing-value profile of one record field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldCompleteness {
    pub field: String,
    pub missing_count: usize,
    pub missing_pct: f64,
}

/// Portfolio-level data-quality assessment: per-field missingness plus an
/// overall completeness figure.
#[derive(Debug, Clone, Serialize)]
pub struct DataQualityReport {
    pub record_count: usize,
    pub fields: Vec<FieldCompleteness>,
    pub fields_with_missing: usize,
    pub completeness_pct: f64,
}

type Presence = (&'static str, fn(&ApplicationRecord) -> bool);

const TRACKED_FIELDS: &[Presence] = &[
    ("target", |r| r.target.is_some()),
    ("income_total", |r| r.income_total.is_some()),
    ("credit_amount", |r| r.credit_amount.is_some()),
    ("annuity_amount", |r| r.annuity_amount.is_some()),
    ("goods_price", |r| r.goods_price.is_some()),
    ("days_birth", |r| r.days_birth.is_some()),
    ("days_employed", |r| r.days_employed.is_some()),
    ("gender", |r| r.gender.is_some()),
    ("family_status", |r| r.family_status.is_some()),
    ("education", |r| r.education.is_some()),
    ("housing", |r| r.housing.is_some()),
    ("contract_type", |r| r.contract_type.is_some()),
    ("occupation", |r| r.occupation.is_some()),
    ("children_count", |r| r.children_count.is_some()),
    ("family_members", |r| r.family_members.is_some()),
];

/// Assess missing values across the tracked record fields. Fields are
/// reported worst-first. An empty record set is fully complete.
pub fn assess(records: &[ApplicationRecord]) -> DataQualityReport {
    let record_count = records.len();
    let mut missing = vec![0usize; TRACKED_FIELDS.len()];

    for record in records {
        for (slot, (_, present)) in TRACKED_FIELDS.iter().enumerate() {
            if !present(record) {
                missing[slot] += 1;
            }
        }
    }

    let mut fields: Vec<FieldCompleteness> = TRACKED_FIELDS
        .iter()
        .zip(missing.iter())
        .map(|((name, _), &missing_count)| FieldCompleteness {
            field: name.to_string(),
            missing_count,
            missing_pct: if record_count == 0 {
                0.0
            } else {
                missing_count as f64 / record_count as f64 * 100.0
            },
        })
        .collect();
    fields.sort_by(|a, b| b.missing_pct.total_cmp(&a.missing_pct));

    let fields_with_missing = fields.iter().filter(|f| f.missing_count > 0).count();
    let total_cells = record_count * TRACKED_FIELDS.len();
    let total_missing: usize = missing.iter().sum();
    let completeness_pct = if total_cells == 0 {
        100.0
    } else {
        (1.0 - total_missing as f64 / total_cells as f64) * 100.0
    };

    DataQualityReport {
        record_count,
        fields,
        fields_with_missing,
        completeness_pct,
    }
}
