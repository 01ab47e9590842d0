use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Loan repayment outcome for a closed observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Repaid,
    Default,
}

impl Target {
    /// Maps the dataset's binary flag (0 = repaid, 1 = default).
    /// Any other value is not a valid target.
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            0 => Some(Target::Repaid),
            1 => Some(Target::Default),
            _ => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Target::Default)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
}

impl std::str::FromStr for Gender {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "F" => Ok(Gender::Female),
            "M" => Ok(Gender::Male),
            _ => anyhow::bail!("Invalid gender code: {}", s),
        }
    }
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilyStatus {
    Married,
    SingleNotMarried,
    CivilMarriage,
    Separated,
    Widow,
}

impl std::str::FromStr for FamilyStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Married" => Ok(FamilyStatus::Married),
            "Single / not married" => Ok(FamilyStatus::SingleNotMarried),
            "Civil marriage" => Ok(FamilyStatus::CivilMarriage),
            "Separated" => Ok(FamilyStatus::Separated),
            "Widow" => Ok(FamilyStatus::Widow),
            _ => anyhow::bail!("Invalid family status: {}", s),
        }
    }
}

impl FamilyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyStatus::Married => "Married",
            FamilyStatus::SingleNotMarried => "Single / not married",
            FamilyStatus::CivilMarriage => "Civil marriage",
            FamilyStatus::Separated => "Separated",
            FamilyStatus::Widow => "Widow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Education {
    LowerSecondary,
    Secondary,
    IncompleteHigher,
    Higher,
    AcademicDegree,
}

impl std::str::FromStr for Education {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Lower secondary" => Ok(Education::LowerSecondary),
            "Secondary / secondary special" => Ok(Education::Secondary),
            "Incomplete higher" => Ok(Education::IncompleteHigher),
            "Higher education" => Ok(Education::Higher),
            "Academic degree" => Ok(Education::AcademicDegree),
            _ => anyhow::bail!("Invalid education level: {}", s),
        }
    }
}

impl Education {
    pub fn as_str(&self) -> &'static str {
        match self {
            Education::LowerSecondary => "Lower secondary",
            Education::Secondary => "Secondary / secondary special",
            Education::IncompleteHigher => "Incomplete higher",
            Education::Higher => "Higher education",
            Education::AcademicDegree => "Academic degree",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HousingType {
    HouseApartment,
    WithParents,
    MunicipalApartment,
    RentedApartment,
    OfficeApartment,
    CoOpApartment,
}

impl std::str::FromStr for HousingType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "House / apartment" => Ok(HousingType::HouseApartment),
            "With parents" => Ok(HousingType::WithParents),
            "Municipal apartment" => Ok(HousingType::MunicipalApartment),
            "Rented apartment" => Ok(HousingType::RentedApartment),
            "Office apartment" => Ok(HousingType::OfficeApartment),
            "Co-op apartment" => Ok(HousingType::CoOpApartment),
            _ => anyhow::bail!("Invalid housing type: {}", s),
        }
    }
}

impl HousingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HousingType::HouseApartment => "House / apartment",
            HousingType::WithParents => "With parents",
            HousingType::MunicipalApartment => "Municipal apartment",
            HousingType::RentedApartment => "Rented apartment",
            HousingType::OfficeApartment => "Office apartment",
            HousingType::CoOpApartment => "Co-op apartment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractType {
    CashLoans,
    RevolvingLoans,
}

impl std::str::FromStr for ContractType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Cash loans" => Ok(ContractType::CashLoans),
            "Revolving loans" => Ok(ContractType::RevolvingLoans),
            _ => anyhow::bail!("Invalid contract type: {}", s),
        }
    }
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::CashLoans => "Cash loans",
            ContractType::RevolvingLoans => "Revolving loans",
        }
    }
}

const DAYS_PER_YEAR: f64 = 365.0;

/// One row per loan applicant.
///
/// Birth and employment are stored as day offsets relative to the
/// application date (negative in the past, the dataset convention).
/// Employment is `None` for applicants with no employment on record.
/// Money fields use Decimal; statistics cross to f64 at the statistics
/// boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: u64,
    pub target: Option<Target>,
    pub income_total: Option<Decimal>,
    pub credit_amount: Option<Decimal>,
    pub annuity_amount: Option<Decimal>,
    pub goods_price: Option<Decimal>,
    pub days_birth: Option<i32>,
    pub days_employed: Option<i32>,
    pub gender: Option<Gender>,
    pub family_status: Option<FamilyStatus>,
    pub education: Option<Education>,
    pub housing: Option<HousingType>,
    pub contract_type: Option<ContractType>,
    pub occupation: Option<String>,
    pub children_count: Option<u32>,
    pub family_members: Option<f64>,
}

impl ApplicationRecord {
    /// Applicant age in years derived from the birth-date offset.
    pub fn age_years(&self) -> Option<f64> {
        self.days_birth.map(|d| -(d as f64) / DAYS_PER_YEAR)
    }

    /// Employment tenure in years. `None` when the applicant is not
    /// employed or the duration is unknown; non-negative day offsets are
    /// the dataset's unemployed sentinel and never reach this type.
    pub fn employment_years(&self) -> Option<f64> {
        match self.days_employed {
            Some(d) if d < 0 => Some(-(d as f64) / DAYS_PER_YEAR),
            _ => None,
        }
    }

    pub fn defaulted(&self) -> Option<bool> {
        self.target.map(|t| t.is_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_target_from_flag() {
        assert_eq!(Target::from_flag(0), Some(Target::Repaid));
        assert_eq!(Target::from_flag(1), Some(Target::Default));
        assert_eq!(Target::from_flag(2), None);
        assert_eq!(Target::from_flag(-1), None);
    }

    #[test]
    fn test_age_and_employment_derivation() {
        let record = ApplicationRecord {
            id: 1,
            target: Some(Target::Repaid),
            income_total: None,
            credit_amount: None,
            annuity_amount: None,
            goods_price: None,
            days_birth: Some(-14600), // 40 years
            days_employed: Some(-1825), // 5 years
            gender: None,
            family_status: None,
            education: None,
            housing: None,
            contract_type: None,
            occupation: None,
            children_count: None,
            family_members: None,
        };

        assert!((record.age_years().unwrap() - 40.0).abs() < 0.01);
        assert!((record.employment_years().unwrap() - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_non_negative_employment_offset_is_unknown() {
        let mut record = ApplicationRecord {
            id: 2,
            target: None,
            income_total: None,
            credit_amount: None,
            annuity_amount: None,
            goods_price: None,
            days_birth: None,
            days_employed: Some(365_243),
            gender: None,
            family_status: None,
            education: None,
            housing: None,
            contract_type: None,
            occupation: None,
            children_count: None,
            family_members: None,
        };

        assert_eq!(record.employment_years(), None);

        record.days_employed = None;
        assert_eq!(record.employment_years(), None);
    }

    #[test]
    fn test_categorical_round_trip() {
        for status in [
            FamilyStatus::Married,
            FamilyStatus::SingleNotMarried,
            FamilyStatus::CivilMarriage,
            FamilyStatus::Separated,
            FamilyStatus::Widow,
        ] {
            assert_eq!(FamilyStatus::from_str(status.as_str()).unwrap(), status);
        }

        assert!(Gender::from_str("XNA").is_err());
        assert!(ContractType::from_str("Payday loans").is_err());
    }
}
