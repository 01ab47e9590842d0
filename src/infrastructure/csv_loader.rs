use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::credit::types::{
    ApplicationRecord, ContractType, Education, FamilyStatus, Gender, HousingType, Target,
};
use crate::domain::ports::ApplicationSource;

/// Raw CSV row under the dataset's original header names. Everything
/// except the key is optional; empty cells deserialize to `None`.
#[derive(Debug, Deserialize)]
struct RawApplicationRow {
    #[serde(rename = "SK_ID_CURR")]
    id: u64,
    #[serde(rename = "TARGET")]
    target: Option<i64>,
    #[serde(rename = "AMT_INCOME_TOTAL")]
    income_total: Option<Decimal>,
    #[serde(rename = "AMT_CREDIT")]
    credit_amount: Option<Decimal>,
    #[serde(rename = "AMT_ANNUITY")]
    annuity_amount: Option<Decimal>,
    #[serde(rename = "AMT_GOODS_PRICE")]
    goods_price: Option<Decimal>,
    #[serde(rename = "DAYS_BIRTH")]
    days_birth: Option<i32>,
    #[serde(rename = "DAYS_EMPLOYED")]
    days_employed: Option<i32>,
    #[serde(rename = "CODE_GENDER")]
    gender: Option<String>,
    #[serde(rename = "NAME_FAMILY_STATUS")]
    family_status: Option<String>,
    #[serde(rename = "NAME_EDUCATION_TYPE")]
    education: Option<String>,
    #[serde(rename = "NAME_HOUSING_TYPE")]
    housing: Option<String>,
    #[serde(rename = "NAME_CONTRACT_TYPE")]
    contract_type: Option<String>,
    #[serde(rename = "OCCUPATION_TYPE")]
    occupation: Option<String>,
    #[serde(rename = "CNT_CHILDREN")]
    children_count: Option<u32>,
    #[serde(rename = "CNT_FAM_MEMBERS")]
    family_members: Option<f64>,
}

impl RawApplicationRow {
    fn into_record(self) -> ApplicationRecord {
        let target = match self.target {
            Some(flag) => {
                let target = Target::from_flag(flag);
                if target.is_none() {
                    warn!("Row {}: target flag {} is not binary, treated as missing", self.id, flag);
                }
                target
            }
            None => None,
        };

        // Non-negative employment offsets are the dataset's unemployed
        // sentinel; the record type only carries real tenures.
        let days_employed = self.days_employed.filter(|d| *d < 0);

        // Unknown category labels (e.g. the XNA gender code) map to missing.
        fn parse_category<T: FromStr>(raw: Option<String>) -> Option<T> {
            raw.and_then(|s| T::from_str(&s).ok())
        }

        ApplicationRecord {
            id: self.id,
            target,
            income_total: self.income_total,
            credit_amount: self.credit_amount,
            annuity_amount: self.annuity_amount,
            goods_price: self.goods_price,
            days_birth: self.days_birth,
            days_employed,
            gender: parse_category::<Gender>(self.gender),
            family_status: parse_category::<FamilyStatus>(self.family_status),
            education: parse_category::<Education>(self.education),
            housing: parse_category::<HousingType>(self.housing),
            contract_type: parse_category::<ContractType>(self.contract_type),
            occupation: self.occupation.filter(|s| !s.trim().is_empty()),
            children_count: self.children_count,
            family_members: self.family_members,
        }
    }
}

/// CSV-backed implementation of the engine's input port. Unparseable rows
/// are skipped with a warning; the loader never fails on dirty data, only
/// on an unreadable file.
pub struct CsvApplicationLoader {
    path: PathBuf,
}

impl CsvApplicationLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ApplicationSource for CsvApplicationLoader {
    fn load_applications(&self) -> Result<Vec<ApplicationRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open dataset at {}", self.path.display()))?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<RawApplicationRow>() {
            match row {
                Ok(raw) => records.push(raw.into_record()),
                Err(err) => {
                    skipped += 1;
                    warn!("Skipping malformed row: {err}");
                }
            }
        }

        info!(
            "Loaded {} application records from {} ({} rows skipped)",
            records.len(),
            self.path.display(),
            skipped
        );
        Ok(records)
    }
}
