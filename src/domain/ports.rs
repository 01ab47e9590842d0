use anyhow::Result;

use crate::domain::credit::types::ApplicationRecord;

/// Input port for the metrics engine: any tabular source able to produce
/// application records. The engine itself never touches files, the network
/// or the environment; implementations live in the infrastructure layer.
pub trait ApplicationSource {
    fn load_applications(&self) -> Result<Vec<ApplicationRecord>>;
}
