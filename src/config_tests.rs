use crate::config::AnalysisConfig;
use rust_decimal_macros::dec;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn clear_analysis_env() {
    for key in [
        "DATA_PATH",
        "EMPLOYMENT_BUCKET_YEARS",
        "LTI_THRESHOLD",
        "DTI_THRESHOLD",
        "HIGH_CREDIT_THRESHOLD",
    ] {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_analysis_env();

    let config = AnalysisConfig::from_env().unwrap();

    assert_eq!(config.data_path.to_str().unwrap(), "data/applications.csv");
    assert_eq!(config.employment_bucket_years, vec![0.0, 1.0, 3.0, 5.0, 10.0, 20.0]);
    assert!((config.lti_threshold - 4.0).abs() < 1e-9);
    assert!((config.dti_threshold - 0.35).abs() < 1e-9);
    assert_eq!(config.high_credit_threshold, dec!(1_000_000));
}

#[test]
fn test_config_custom_buckets() {
    let _guard = get_env_lock().lock().unwrap();
    clear_analysis_env();
    unsafe { env::set_var("EMPLOYMENT_BUCKET_YEARS", "0, 2.5, 7 ,15") };

    let config = AnalysisConfig::from_env().unwrap();
    assert_eq!(config.employment_bucket_years, vec![0.0, 2.5, 7.0, 15.0]);

    clear_analysis_env();
}

#[test]
fn test_config_invalid_bucket_entry_returns_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_analysis_env();
    unsafe { env::set_var("EMPLOYMENT_BUCKET_YEARS", "0,five,10") };

    let result = AnalysisConfig::from_env();
    assert!(result.is_err());
    let err_msg = format!("{:?}", result.err().unwrap());
    assert!(err_msg.contains("EMPLOYMENT_BUCKET_YEARS"));

    clear_analysis_env();
}

#[test]
fn test_config_invalid_threshold_returns_error() {
    let _guard = get_env_lock().lock().unwrap();
    clear_analysis_env();
    unsafe { env::set_var("LTI_THRESHOLD", "very-high") };

    let result = AnalysisConfig::from_env();
    assert!(result.is_err());
    let err_msg = format!("{:?}", result.err().unwrap());
    assert!(err_msg.contains("LTI_THRESHOLD"));

    clear_analysis_env();
}
