// Credit application domain
pub mod credit;

// Metrics engine
pub mod metrics;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
