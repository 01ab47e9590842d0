use thiserror::Error;

/// Errors raised by the metrics engine on caller misuse.
///
/// Data-absence conditions (empty input, all records excluded) are NOT
/// errors; they resolve to a null-valued, zero-count result so a consumer
/// always has something to display.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Unknown indicator: {name}")]
    UnknownIndicator { name: String },

    #[error("Invalid aggregation '{kind}': supported kinds are sum, mean, rate, count")]
    InvalidAggregation { kind: String },
}
