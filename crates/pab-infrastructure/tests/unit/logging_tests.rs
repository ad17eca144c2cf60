//! Logging helper tests

use pab_domain::error::Error;
use pab_infrastructure::logging::{log_file_location, parse_log_level};
use std::ffi::OsStr;
use std::path::Path;
use tracing::Level;

#[test]
fn test_parse_log_level_accepts_known_levels() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("Error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown_levels() {
    let err = parse_log_level("verbose").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("verbose"));
}

#[test]
fn test_log_file_location_keeps_extension() {
    let (directory, prefix) = log_file_location(Path::new("logs/pab.log"));
    assert_eq!(directory, Path::new("logs"));
    assert_eq!(prefix, OsStr::new("pab.log"));
}

#[test]
fn test_log_file_location_without_directory_uses_cwd() {
    let (directory, prefix) = log_file_location(Path::new("host.log"));
    assert_eq!(directory, Path::new("."));
    assert_eq!(prefix, OsStr::new("host.log"));

    let (_, fallback) = log_file_location(Path::new(".."));
    assert_eq!(fallback, OsStr::new("pab.log"));
}
