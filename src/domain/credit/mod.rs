// Application record and categorical types
pub mod types;

pub use types::{
    ApplicationRecord, ContractType, Education, FamilyStatus, Gender, HousingType, Target,
};
