use serde::Serialize;

use super::indicator::NumericField;
use crate::domain::credit::types::ApplicationRecord;

/// Pearson correlation coefficient between two equally long samples.
/// Returns `None` for fewer than two points or when either sample has
/// (near-)zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = xs[..n].iter().sum::<f64>() / n_f;
    let mean_y = ys[..n].iter().sum::<f64>() / n_f;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 1e-12 || var_y <= 1e-12 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Correlation between two numeric fields with pairwise deletion: only
/// records where both fields are present contribute.
pub fn field_correlation(
    records: &[ApplicationRecord],
    a: NumericField,
    b: NumericField,
) -> Option<f64> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for record in records {
        if let (Some(x), Some(y)) = (a.extract(record), b.extract(record)) {
            xs.push(x);
            ys.push(y);
        }
    }
    pearson(&xs, &ys)
}

/// Correlation between a numeric field and the default target encoded as
/// 0/1, over records carrying both.
pub fn target_correlation(records: &[ApplicationRecord], field: NumericField) -> Option<f64> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for record in records {
        if let (Some(x), Some(defaulted)) = (field.extract(record), record.defaulted()) {
            xs.push(x);
            ys.push(if defaulted { 1.0 } else { 0.0 });
        }
    }
    pearson(&xs, &ys)
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetCorrelation {
    pub field: String,
    pub r: f64,
}

/// Correlation of every numeric field with the target, ranked by absolute
/// strength. Fields without a defined correlation are omitted.
pub fn target_correlations(records: &[ApplicationRecord]) -> Vec<TargetCorrelation> {
    let mut panel: Vec<TargetCorrelation> = NumericField::ALL
        .iter()
        .filter_map(|field| {
            target_correlation(records, *field).map(|r| TargetCorrelation {
                field: field.name().to_string(),
                r,
            })
        })
        .collect();
    panel.sort_by(|a, b| b.r.abs().total_cmp(&a.r.abs()));
    panel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credit::types::Target;
    use rust_decimal::Decimal;

    #[test]
    fn test_pearson_self_correlation_is_one() {
        let xs = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let r = pearson(&xs, &xs).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_perfect_inverse() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![3.0, 2.0, 1.0];
        let r = pearson(&xs, &ys).unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_constant_input_is_undefined() {
        let xs = vec![1.0, 2.0, 3.0];
        let ys = vec![7.0, 7.0, 7.0];
        assert!(pearson(&xs, &ys).is_none());
        assert!(pearson(&[], &[]).is_none());
        assert!(pearson(&[1.0], &[1.0]).is_none());
    }

    fn record(id: u64, income: f64, credit: f64, target: Option<Target>) -> ApplicationRecord {
        ApplicationRecord {
            id,
            target,
            income_total: Decimal::from_f64_retain(income),
            credit_amount: Decimal::from_f64_retain(credit),
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

    #[test]
    fn test_field_correlation_pairwise_deletion() {
        let mut records = vec![
            record(1, 100.0, 200.0, None),
            record(2, 200.0, 400.0, None),
            record(3, 300.0, 600.0, None),
        ];
        // A record missing credit must not poison the pairing.
        let mut partial = record(4, 1_000_000.0, 0.0, None);
        partial.credit_amount = None;
        records.push(partial);

        let r = field_correlation(
            &records,
            NumericField::IncomeTotal,
            NumericField::CreditAmount,
        )
        .unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_target_correlation_sign() {
        // Higher income, fewer defaults: negative correlation expected.
        let records = vec![
            record(1, 50_000.0, 0.0, Some(Target::Default)),
            record(2, 60_000.0, 0.0, Some(Target::Default)),
            record(3, 200_000.0, 0.0, Some(Target::Repaid)),
            record(4, 250_000.0, 0.0, Some(Target::Repaid)),
        ];

        let r = target_correlation(&records, NumericField::IncomeTotal).unwrap();
        assert!(r < -0.8);
    }

    #[test]
    fn test_target_correlations_ranked_by_strength() {
        let records = vec![
            record(1, 50_000.0, 500_000.0, Some(Target::Default)),
            record(2, 60_000.0, 90_000.0, Some(Target::Repaid)),
            record(3, 200_000.0, 80_000.0, Some(Target::Repaid)),
            record(4, 250_000.0, 70_000.0, Some(Target::Repaid)),
        ];

        let panel = target_correlations(&records);
        assert!(!panel.is_empty());
        for window in panel.windows(2) {
            assert!(window[0].r.abs() >= window[1].r.abs());
        }
    }
}
